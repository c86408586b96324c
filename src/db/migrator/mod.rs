use sea_orm_migration::prelude::*;

mod m20250509_initial;
mod m20250510_unique_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250509_initial::Migration),
            Box::new(m20250510_unique_indexes::Migration),
        ]
    }
}

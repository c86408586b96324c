use sea_orm::entity::prelude::*;

/// Per-user rating of a catalog film, 1..=10.
/// (user_id, film_id) is unique, enforced by migration index.
/// A rating of 0 is never stored; submitting 0 deletes the row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub user_id: i32,

    #[sea_orm(indexed)]
    pub film_id: i32,

    pub rating: i32,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

/// Time-bounded cache of provider responses (search pages and film
/// details), keyed by a request-derived cache key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "metadata_cache")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique per migration index.
    pub cache_key: String,

    #[sea_orm(column_type = "Text")]
    pub payload: String,

    pub created_at: String, // RFC3339; lexicographic order matches time order

    pub expires_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

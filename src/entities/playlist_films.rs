use sea_orm::entity::prelude::*;

/// Membership edge between a playlist and a catalog film.
/// (playlist_id, film_id) is unique, enforced by migration index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "playlist_films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub playlist_id: i32,

    #[sea_orm(indexed)]
    pub film_id: i32,

    pub added_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

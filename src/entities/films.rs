use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stable provider identifier (IMDb-style), globally unique.
    #[sea_orm(unique)]
    pub imdb_id: String,

    pub title: String,

    /// Provider-formatted release year, e.g. "2010" or "2019–2022".
    pub year: Option<String>,

    /// movie, series or episode.
    pub media_type: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub poster_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub plot_short: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub plot_full: Option<String>,

    pub genre: Option<String>,

    pub director: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub actors: Option<String>,

    pub runtime: Option<String>,

    pub imdb_rating: Option<String>,

    pub metascore: Option<String>,

    /// JSON array of {source, value} pairs from other rating outlets.
    #[sea_orm(column_type = "Text", nullable)]
    pub other_ratings: Option<String>,

    /// When full details were last fetched from the provider.
    /// NULL means only minimal data is known.
    pub details_fetched_at: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

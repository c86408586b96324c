use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities::{films, prelude::*};
use crate::models::film::FilmDetail;

pub struct FilmRepository {
    conn: DatabaseConnection,
}

impl FilmRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<films::Model>> {
        Ok(Films::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<films::Model>> {
        Ok(Films::find()
            .filter(films::Column::ImdbId.eq(imdb_id))
            .one(&self.conn)
            .await?)
    }

    /// Inserts or refreshes the catalog row for `detail.imdb_id`.
    /// Last write wins on fetched fields; concurrent writers are
    /// serialized by the unique constraint on `imdb_id`.
    pub async fn upsert_detail(&self, detail: &FilmDetail) -> Result<films::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let other_ratings = if detail.other_ratings.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&detail.other_ratings)?)
        };

        let model = films::ActiveModel {
            imdb_id: Set(detail.imdb_id.clone()),
            title: Set(detail.title.clone()),
            year: Set(detail.year.clone()),
            media_type: Set(detail.media_type.clone()),
            poster_url: Set(detail.poster_url.clone()),
            plot_short: Set(detail.plot_short.clone()),
            plot_full: Set(detail.plot_full.clone()),
            genre: Set(detail.genre.clone()),
            director: Set(detail.director.clone()),
            actors: Set(detail.actors.clone()),
            runtime: Set(detail.runtime.clone()),
            imdb_rating: Set(detail.imdb_rating.clone()),
            metascore: Set(detail.metascore.clone()),
            other_ratings: Set(other_ratings),
            details_fetched_at: Set(Some(now.clone())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Films::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(films::Column::ImdbId)
                    .update_columns([
                        films::Column::Title,
                        films::Column::Year,
                        films::Column::MediaType,
                        films::Column::PosterUrl,
                        films::Column::PlotShort,
                        films::Column::PlotFull,
                        films::Column::Genre,
                        films::Column::Director,
                        films::Column::Actors,
                        films::Column::Runtime,
                        films::Column::ImdbRating,
                        films::Column::Metascore,
                        films::Column::OtherRatings,
                        films::Column::DetailsFetchedAt,
                        films::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        self.find_by_imdb_id(&detail.imdb_id)
            .await?
            .context("film row missing after upsert")
    }

    /// Creates a minimal catalog row from client-supplied fields when
    /// the provider cannot resolve the id. `details_fetched_at` stays
    /// NULL to mark the row as thin. Losing an insert race to another
    /// writer is fine; the existing row is returned.
    pub async fn insert_minimal(
        &self,
        imdb_id: &str,
        title: &str,
        year: Option<String>,
        media_type: Option<String>,
        poster_url: Option<String>,
    ) -> Result<films::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = films::ActiveModel {
            imdb_id: Set(imdb_id.to_string()),
            title: Set(title.to_string()),
            year: Set(year),
            media_type: Set(media_type),
            poster_url: Set(poster_url),
            details_fetched_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let insert = Films::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(films::Column::ImdbId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        self.find_by_imdb_id(imdb_id)
            .await?
            .context("film row missing after insert")
    }
}

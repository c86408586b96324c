use std::collections::HashMap;

use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{prelude::*, user_ratings};

pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, user_id: i32, film_id: i32) -> Result<Option<i32>> {
        let row = UserRatings::find()
            .filter(user_ratings::Column::UserId.eq(user_id))
            .filter(user_ratings::Column::FilmId.eq(film_id))
            .one(&self.conn)
            .await?;

        Ok(row.map(|r| r.rating))
    }

    /// The calling user's ratings for a batch of films, keyed by film id.
    pub async fn for_films(&self, user_id: i32, film_ids: &[i32]) -> Result<HashMap<i32, i32>> {
        if film_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = UserRatings::find()
            .filter(user_ratings::Column::UserId.eq(user_id))
            .filter(user_ratings::Column::FilmId.is_in(film_ids.to_vec()))
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|r| (r.film_id, r.rating)).collect())
    }

    /// Stores or replaces the rating atomically; (user_id, film_id) is
    /// unique so concurrent submits converge on the last write.
    pub async fn upsert(&self, user_id: i32, film_id: i32, rating: i32) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = user_ratings::ActiveModel {
            user_id: Set(user_id),
            film_id: Set(film_id),
            rating: Set(rating),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        UserRatings::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    user_ratings::Column::UserId,
                    user_ratings::Column::FilmId,
                ])
                .update_columns([
                    user_ratings::Column::Rating,
                    user_ratings::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, user_id: i32, film_id: i32) -> Result<bool> {
        let result = UserRatings::delete_many()
            .filter(user_ratings::Column::UserId.eq(user_id))
            .filter(user_ratings::Column::FilmId.eq(film_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

use crate::db::Store;
use crate::services::ServiceError;

/// Personal 1-10 film ratings. A rating of zero clears the caller's
/// existing rating instead of storing a zero.
#[derive(Clone)]
pub struct RatingService {
    store: Store,
}

impl RatingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Stores, replaces, or (for zero) deletes the caller's rating.
    /// Returns the rating now in effect, None when cleared.
    pub async fn rate(
        &self,
        user_id: i32,
        film_id: i32,
        rating: i32,
    ) -> Result<Option<i32>, ServiceError> {
        if !(0..=10).contains(&rating) {
            return Err(ServiceError::validation(
                "Rating must be between 0 and 10.",
            ));
        }

        if self.store.find_film(film_id).await?.is_none() {
            return Err(ServiceError::not_found("Film not found."));
        }

        if rating == 0 {
            self.store.delete_rating(user_id, film_id).await?;
            return Ok(None);
        }

        self.store.upsert_rating(user_id, film_id, rating).await?;
        Ok(Some(rating))
    }

    pub async fn get_rating(
        &self,
        user_id: i32,
        film_id: i32,
    ) -> Result<Option<i32>, ServiceError> {
        if self.store.find_film(film_id).await?.is_none() {
            return Err(ServiceError::not_found("Film not found."));
        }

        Ok(self.store.get_rating(user_id, film_id).await?)
    }
}

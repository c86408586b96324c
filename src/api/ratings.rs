use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, RatingResponse, auth::CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

#[derive(Serialize)]
pub struct MyRatingResponse {
    pub rating: Option<i32>,
}

/// POST /films/{id}/rate (catalog id)
/// Stores or replaces the caller's 1-10 rating; a rating of 0 removes
/// any existing rating.
pub async fn rate_film(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(film_id): Path<i32>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<ApiResponse<RatingResponse>>, ApiError> {
    let rating = state.ratings.rate(user.id, film_id, payload.rating).await?;

    let message = if rating.is_some() {
        "Rating saved."
    } else {
        "Rating removed."
    };

    Ok(Json(ApiResponse::success(RatingResponse {
        message: message.to_string(),
        rating,
    })))
}

/// GET /films/{id}/my-rating (catalog id)
pub async fn get_my_rating(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(film_id): Path<i32>,
) -> Result<Json<ApiResponse<MyRatingResponse>>, ApiError> {
    let rating = state.ratings.get_rating(user.id, film_id).await?;

    Ok(Json(ApiResponse::success(MyRatingResponse { rating })))
}

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, FilmDto, auth::CurrentUser};
use crate::state::AppState;

/// GET /films/{id} (IMDb id)
/// Full film details, fetched through the provider gateway. A fresh
/// fetch refreshes the catalog row, so the response always carries a
/// catalog id usable for rating and playlist calls.
pub async fn get_film(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(imdb_id): Path<String>,
) -> Result<Json<ApiResponse<FilmDto>>, ApiError> {
    let detail = state.metadata.get_detail(&imdb_id).await?;

    let film = state
        .store
        .find_film_by_imdb_id(&detail.imdb_id)
        .await?
        .ok_or_else(|| ApiError::internal("catalog row missing after fetch"))?;

    Ok(Json(ApiResponse::success(film.into())))
}

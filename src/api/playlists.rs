use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    AddFilmResponse, ApiError, ApiResponse, MessageResponse, PlaylistDetailDto, PlaylistDto,
    auth::CurrentUser,
};
use crate::services::playlist::AddFilmInput;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PlaylistRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct AddFilmRequest {
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub poster_url: Option<String>,
}

/// GET /playlists
/// The caller's playlists with film counts and poster previews.
pub async fn list_playlists(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<PlaylistDto>>>, ApiError> {
    let summaries = state.playlists.list_for_owner(user.id).await?;

    Ok(Json(ApiResponse::success(
        summaries.into_iter().map(PlaylistDto::from).collect(),
    )))
}

/// POST /playlists
pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<PlaylistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlaylistDetailDto>>), ApiError> {
    let playlist = state
        .playlists
        .create(user.id, &payload.name, payload.description)
        .await?;

    let detail = state.playlists.get_detail(user.id, playlist.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(detail.into())),
    ))
}

/// GET /playlists/{id}
/// The playlist with its films ordered by title, each carrying the
/// caller's own rating.
pub async fn get_playlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PlaylistDetailDto>>, ApiError> {
    let detail = state.playlists.get_detail(user.id, id).await?;

    Ok(Json(ApiResponse::success(detail.into())))
}

/// PUT /playlists/{id}
pub async fn update_playlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<PlaylistRequest>,
) -> Result<Json<ApiResponse<PlaylistDetailDto>>, ApiError> {
    state
        .playlists
        .update(user.id, id, &payload.name, payload.description)
        .await?;

    let detail = state.playlists.get_detail(user.id, id).await?;

    Ok(Json(ApiResponse::success(detail.into())))
}

/// DELETE /playlists/{id}
pub async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.playlists.delete(user.id, id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Playlist deleted.",
    ))))
}

/// POST /playlists/{id}/films
/// Adds a film by external id. Re-adding a film that is already in
/// the playlist succeeds; only the message differs.
pub async fn add_film(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<AddFilmRequest>,
) -> Result<Json<ApiResponse<AddFilmResponse>>, ApiError> {
    let input = AddFilmInput {
        imdb_id: payload.imdb_id,
        title: payload.title,
        year: payload.year,
        media_type: payload.media_type,
        poster_url: payload.poster_url,
    };

    let (film, added) = state.playlists.add_film(user.id, id, input).await?;

    let message = if added {
        "Film added to playlist."
    } else {
        "Film is already in this playlist."
    };

    Ok(Json(ApiResponse::success(AddFilmResponse {
        message: message.to_string(),
        film: film.into(),
    })))
}

/// DELETE /playlists/{id}/films/{film_id}
pub async fn remove_film(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((id, film_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.playlists.remove_film(user.id, id, film_id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Film removed from playlist.",
    ))))
}

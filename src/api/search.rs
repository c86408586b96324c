use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, auth::CurrentUser};
use crate::clients::SearchFilters;
use crate::models::film::{MediaType, SearchOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub year: Option<String>,
    pub page: Option<u32>,
}

/// GET /search
/// Title search against the provider, served from the cache when
/// possible. Provider failures come back as `ok: false` in the body,
/// not as an error status.
pub async fn search_films(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchOutcome>>, ApiError> {
    let media_type = match params.media_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<MediaType>()
                .map_err(|_| ApiError::validation("Type must be movie, series, or episode"))?,
        ),
    };

    let filters = SearchFilters {
        media_type,
        year: params.year.filter(|y| !y.trim().is_empty()),
        page: params.page,
    };

    let outcome = state.metadata.search(&params.query, &filters).await?;

    Ok(Json(ApiResponse::success(outcome)))
}

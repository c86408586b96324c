use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::state::AppState;

pub mod auth;
mod error;
mod films;
mod playlists;
mod ratings;
mod search;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

pub fn router(state: Arc<AppState>) -> Router {
    let session_ttl = i64::from(state.config.server.session_ttl_minutes);

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(session_ttl)));

    let api_router = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/search", get(search::search_films))
        .route("/films/{id}", get(films::get_film))
        .route("/films/{id}/rate", post(ratings::rate_film))
        .route("/films/{id}/my-rating", get(ratings::get_my_rating))
        .route("/playlists", get(playlists::list_playlists))
        .route("/playlists", post(playlists::create_playlist))
        .route("/playlists/{id}", get(playlists::get_playlist))
        .route("/playlists/{id}", put(playlists::update_playlist))
        .route("/playlists/{id}", delete(playlists::delete_playlist))
        .route("/playlists/{id}/films", post(playlists::add_film))
        .route(
            "/playlists/{id}/films/{film_id}",
            delete(playlists::remove_film),
        )
        .route("/system/status", get(system::get_status))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_origins = &state.config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

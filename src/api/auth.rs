use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{HeaderMap, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, MessageResponse};
use crate::db::{User, is_unique_violation};
use crate::state::AppState;

const SESSION_USER_KEY: &str = "user_id";

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub api_key: String,
}

#[derive(Serialize)]
pub struct UserInfoResponse {
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The authenticated caller, resolved from (in order):
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        if let Ok(Some(user_id)) = session.get::<i32>(SESSION_USER_KEY).await
            && let Ok(Some(user)) = state.store.get_user_by_id(user_id).await
        {
            return Ok(Self(user));
        }

        if let Some(key) = extract_api_key(&parts.headers)
            && let Ok(Some(user)) = state.store.verify_api_key(&key).await
        {
            return Ok(Self(user));
        }

        Err(ApiError::unauthorized())
    }
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

/// POST /auth/register
/// Create an account and log it in. Returns the API key for
/// programmatic access.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let username = payload.username.trim();
    if !(3..=50).contains(&username.chars().count()) {
        return Err(ApiError::validation(
            "Username must be between 3 and 50 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, hyphens, and underscores",
        ));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if state.store.get_user_by_username(username).await?.is_some() {
        return Err(ApiError::Conflict("Username is already taken".to_string()));
    }

    let user = match state.store.create_user(username, &payload.password).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict("Username is already taken".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(username = %user.username, "New account registered");

    Ok(Json(ApiResponse::success(LoginResponse {
        username: user.username,
        api_key: user.api_key,
    })))
}

/// POST /auth/login
/// Authenticate with username and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let is_valid = state
        .store
        .verify_user_password(&payload.username, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = state
        .store
        .get_user_by_username(&payload.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(LoginResponse {
        username: user.username,
        api_key: user.api_key,
    })))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse::new("Logged out")))
}

/// GET /auth/me
/// Get current user information (requires authentication)
pub async fn get_current_user(
    CurrentUser(user): CurrentUser,
) -> Json<ApiResponse<UserInfoResponse>> {
    Json(ApiResponse::success(UserInfoResponse {
        username: user.username,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }))
}

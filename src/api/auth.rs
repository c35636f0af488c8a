//! Auth handlers: register, login, and the current-user endpoint.

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::auth;
use crate::db::now_ms;
use crate::error::{ApiError, ApiResult};
use crate::types::User;

/// Authenticated principal, resolved from the bearer token.
///
/// Every owner-scoped handler takes this extractor; a missing or invalid
/// token is rejected before the handler body runs.
pub struct AuthUser(pub String);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))?;

        let token = auth::bearer_token(header_value)?;
        let user_id = state.auth.verify(token)?;
        Ok(AuthUser(user_id))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn session_response(state: &AppState, user: &User) -> ApiResult<serde_json::Value> {
    let token = state.auth.issue(&user.id, chrono::Utc::now().timestamp())?;
    Ok(json!({ "token": token, "user": user }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.name.trim().is_empty() {
        return Err(ApiError::validation("name", "name is required"));
    }
    if req.email.trim().is_empty() {
        return Err(ApiError::validation("email", "email is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::validation("password", "password is required"));
    }

    let existing = state
        .db
        .find_user_by_email(&req.email)
        .map_err(ApiError::database)?;
    if existing.is_some() {
        return Err(ApiError::email_taken());
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: req.name,
        email: req.email,
        password_hash: auth::hash_password(&req.password)?,
        created_at: now_ms(),
    };
    state.db.insert_user(&user).map_err(ApiError::database)?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(session_response(&state, &user)?)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .db
        .find_user_by_email(&req.email)
        .map_err(ApiError::database)?
        .ok_or_else(ApiError::invalid_credentials)?;

    if !auth::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::invalid_credentials());
    }

    Ok(Json(session_response(&state, &user)?))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .db
        .get_user(&user_id)
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::user_not_found(&user_id))?;
    Ok(Json(user))
}

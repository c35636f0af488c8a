//! Analytics dashboard endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use chrono::Local;

use super::auth::AuthUser;
use super::AppState;
use crate::core::analytics;
use crate::error::{ApiError, ApiResult};

/// Dashboard metrics for the caller's tasks.
///
/// Responds with JSON `null` when the user has no tasks at all, so the
/// client can render its distinct empty state instead of a zeroed chart.
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let tasks = state.db.list_tasks(&owner_id).map_err(ApiError::database)?;
    Ok(Json(analytics::analyze(&tasks, Local::now())))
}

//! Task handlers: CRUD, the rendered list, and completion toggles.
//!
//! Handlers stay thin: load the owner's snapshot, run the pure core
//! function, persist the result. Ownership is enforced here, before any
//! core code sees the task.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use super::auth::AuthUser;
use super::AppState;
use crate::core::{propagate, query, update, validate};
use crate::db::now_ms;
use crate::error::{ApiError, ApiResult};
use crate::types::{Filter, Sort, Task, TaskDraft, TaskPatch};

/// View state for the rendered task list. All parts are optional;
/// the defaults are `all` / `date-desc` / no search.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<Filter>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

/// Load a task and check it belongs to the caller.
fn load_owned(state: &AppState, task_id: &str, owner_id: &str) -> ApiResult<Task> {
    let task = state
        .db
        .get_task(task_id)
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::task_not_found(task_id))?;
    if task.owner_id != owner_id {
        return Err(ApiError::forbidden(task_id));
    }
    Ok(task)
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let tasks = state.db.list_tasks(&owner_id).map_err(ApiError::database)?;

    let filter = params.filter.unwrap_or_default();
    // Unknown sort keys fall back to date-desc rather than failing.
    let sort = params.sort.as_deref().map(Sort::parse).unwrap_or_default();
    let search = params.search.as_deref().unwrap_or("");

    Ok(Json(query::render(&tasks, filter, sort, search)))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<impl IntoResponse> {
    validate::draft(&draft)?;

    let task = update::from_draft(draft, &owner_id, now_ms());
    state.db.insert_task(&task).map_err(ApiError::database)?;

    tracing::debug!(task_id = %task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(task_id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<impl IntoResponse> {
    validate::patch(&patch)?;

    let task = load_owned(&state, &task_id, &owner_id)?;
    let next = update::apply_patch(&task, patch, now_ms());
    state.db.save_task(&next).map_err(ApiError::database)?;

    Ok(Json(next))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    load_owned(&state, &task_id, &owner_id)?;
    state.db.delete_task(&task_id).map_err(ApiError::database)?;

    Ok(Json(json!({ "id": task_id, "message": "Task removed" })))
}

/// Flip a task's own completion flag, stamping or clearing `completed_at`.
pub async fn toggle(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let task = load_owned(&state, &task_id, &owner_id)?;

    let patch = TaskPatch {
        is_completed: Some(!task.is_completed),
        ..Default::default()
    };
    let next = update::apply_patch(&task, patch, now_ms());
    state.db.save_task(&next).map_err(ApiError::database)?;

    Ok(Json(next))
}

/// Flip one subtask and let completion propagate to the parent.
pub async fn toggle_subtask(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path((task_id, subtask_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let task = load_owned(&state, &task_id, &owner_id)?;

    let next = propagate::toggle_subtask(&task, &subtask_id, now_ms())?;
    state.db.save_task(&next).map_err(ApiError::database)?;

    if next.is_completed && !task.is_completed {
        tracing::debug!(task_id = %task.id, "All subtasks completed, task marked complete");
    }

    Ok(Json(next))
}

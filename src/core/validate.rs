//! Mutation validators for tasks and subtasks.
//!
//! The rules live with the core data model; the HTTP handlers invoke
//! them before anything reaches storage. Priority values arrive as
//! typed JSON and are already checked by serde.

use crate::error::{ApiError, ApiResult};
use crate::types::{SubtaskInput, TaskDraft, TaskPatch};

/// A title must be non-empty after trimming.
pub fn title(value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation("title", "title is required"));
    }
    Ok(())
}

fn subtasks(items: &[SubtaskInput]) -> ApiResult<()> {
    for sub in items {
        if sub.title.trim().is_empty() {
            return Err(ApiError::validation("subtasks", "subtask title is required"));
        }
    }
    Ok(())
}

/// Validate a task creation payload.
pub fn draft(input: &TaskDraft) -> ApiResult<()> {
    title(&input.title)?;
    subtasks(&input.subtasks)
}

/// Validate a partial update. Absent fields are not checked.
pub fn patch(input: &TaskPatch) -> ApiResult<()> {
    if let Some(ref t) = input.title {
        title(t)?;
    }
    if let Some(ref subs) = input.subtasks {
        subtasks(subs)?;
    }
    Ok(())
}

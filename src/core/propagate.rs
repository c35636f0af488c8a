//! Subtask completion propagation.
//!
//! Toggling a subtask is the only event that recomputes parent-task
//! completion. Adding or deleting subtasks deliberately does not: a task
//! whose last incomplete subtask is removed stays pending until the next
//! toggle.

use crate::error::{ApiError, ApiResult};
use crate::types::Task;

/// Flip one subtask's completion flag and derive the parent state.
///
/// Returns a new task; the input is untouched and persistence is the
/// caller's responsibility. Rules:
/// - all subtasks completed and parent pending: parent becomes completed,
///   `completed_at` stamped with `now`
/// - any subtask pending and parent completed: parent reverts to pending,
///   `completed_at` cleared
///
/// Fails with `SubtaskNotFound` when `subtask_id` is not on the task,
/// which also covers the empty-subtask-list case.
pub fn toggle_subtask(task: &Task, subtask_id: &str, now: i64) -> ApiResult<Task> {
    let mut next = task.clone();

    let subtask = next
        .subtasks
        .iter_mut()
        .find(|s| s.id == subtask_id)
        .ok_or_else(|| ApiError::subtask_not_found(subtask_id))?;
    subtask.is_completed = !subtask.is_completed;

    let all_completed = !next.subtasks.is_empty() && next.subtasks.iter().all(|s| s.is_completed);

    if all_completed && !next.is_completed {
        next.is_completed = true;
        next.completed_at = Some(now);
    } else if !all_completed && next.is_completed {
        next.is_completed = false;
        next.completed_at = None;
    }

    Ok(next)
}

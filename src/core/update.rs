//! Construction and partial updates of task records.
//!
//! Keeps the `completed_at` invariant in one place: the stamp is set on
//! the pending-to-completed transition and cleared on the reverse, never
//! supplied by the client.

use uuid::Uuid;

use crate::types::{Subtask, SubtaskInput, Task, TaskDraft, TaskPatch};

/// Turn subtask inputs into stored subtasks, assigning ids to new ones.
/// Existing ids are kept so client-side state stays addressable.
pub fn realize_subtasks(inputs: Vec<SubtaskInput>) -> Vec<Subtask> {
    inputs
        .into_iter()
        .map(|input| Subtask {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: input.title,
            is_completed: input.is_completed,
        })
        .collect()
}

/// Build a new task from a validated draft.
pub fn from_draft(draft: TaskDraft, owner_id: &str, now: i64) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        title: draft.title,
        description: draft.description,
        is_completed: false,
        created_at: now,
        due_date: draft.due_date,
        completed_at: None,
        priority: draft.priority.unwrap_or_default(),
        subtasks: realize_subtasks(draft.subtasks),
    }
}

/// Apply a validated patch, producing the next task state.
///
/// Only the enumerated mutable fields can change; `id`, `owner_id`, and
/// `created_at` pass through untouched.
pub fn apply_patch(task: &Task, patch: TaskPatch, now: i64) -> Task {
    let mut next = task.clone();

    if let Some(title) = patch.title {
        next.title = title;
    }
    if let Some(description) = patch.description {
        next.description = description;
    }
    if let Some(due_date) = patch.due_date {
        next.due_date = due_date;
    }
    if let Some(priority) = patch.priority {
        next.priority = priority;
    }
    if let Some(subtasks) = patch.subtasks {
        next.subtasks = realize_subtasks(subtasks);
    }
    if let Some(is_completed) = patch.is_completed {
        if is_completed && !next.is_completed {
            next.completed_at = Some(now);
        } else if !is_completed {
            next.completed_at = None;
        }
        next.is_completed = is_completed;
    }

    next
}

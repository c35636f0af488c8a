//! Task storage, scoped by owner.
//!
//! Subtasks are stored inline as a JSON column; they have no lifecycle
//! of their own. Ownership checks happen in the handlers, which load a
//! task by id and compare owners before mutating.

use super::Database;
use crate::types::{Priority, Subtask, Task};
use anyhow::Result;
use rusqlite::{params, Row};

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get("priority")?;
    let subtasks_json: String = row.get("subtasks")?;
    let subtasks: Vec<Subtask> = serde_json::from_str(&subtasks_json).unwrap_or_default();

    Ok(Task {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed: row.get("is_completed")?,
        created_at: row.get("created_at")?,
        due_date: row.get("due_date")?,
        completed_at: row.get("completed_at")?,
        priority: Priority::parse_lenient(&priority),
        subtasks,
    })
}

impl Database {
    /// All tasks for one owner, newest first (the API's default order).
    pub fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM tasks WHERE owner_id = ?1 ORDER BY created_at DESC")?;
            let tasks = stmt
                .query_map(params![owner_id], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
            match stmt.query_row(params![task_id], parse_task_row) {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn insert_task(&self, task: &Task) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks
                 (id, owner_id, title, description, is_completed, created_at,
                  due_date, completed_at, priority, subtasks)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    task.id,
                    task.owner_id,
                    task.title,
                    task.description,
                    task.is_completed,
                    task.created_at,
                    task.due_date,
                    task.completed_at,
                    task.priority.as_str(),
                    serde_json::to_string(&task.subtasks)?,
                ],
            )?;
            Ok(())
        })
    }

    /// Persist a task's mutable fields. `created_at` and `owner_id` are
    /// immutable and never written back.
    pub fn save_task(&self, task: &Task) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET
                   title = ?2, description = ?3, is_completed = ?4,
                   due_date = ?5, completed_at = ?6, priority = ?7, subtasks = ?8
                 WHERE id = ?1",
                params![
                    task.id,
                    task.title,
                    task.description,
                    task.is_completed,
                    task.due_date,
                    task.completed_at,
                    task.priority.as_str(),
                    serde_json::to_string(&task.subtasks)?,
                ],
            )?;
            Ok(())
        })
    }

    /// Delete a task. Returns false when no row matched.
    pub fn delete_task(&self, task_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(affected > 0)
        })
    }
}

//! Core types for the taskdeck server.

use serde::{Deserialize, Serialize};

/// Task priority. Defaults to `Medium` when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Strict parse for validation boundaries.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Lenient parse for storage rows: unknown values fall back to medium.
    pub fn parse_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

/// A subtask, owned exclusively by its parent task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

/// A task belonging to a single owner.
///
/// Invariant: `completed_at` is set if and only if `is_completed` is true.
/// All timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(rename = "user")]
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub priority: Priority,
    pub subtasks: Vec<Subtask>,
}

/// A registered user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}

/// Completion filter applied to the rendered task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

/// Sort order for the rendered task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sort {
    #[serde(rename = "date-asc")]
    DateAsc,
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    #[serde(rename = "due-date-asc")]
    DueDateAsc,
    #[serde(rename = "due-date-desc")]
    DueDateDesc,
}

impl Sort {
    /// Parse a sort key, falling back to `date-desc` for unknown values.
    pub fn parse(s: &str) -> Self {
        match s {
            "date-asc" => Sort::DateAsc,
            "date-desc" => Sort::DateDesc,
            "due-date-asc" => Sort::DueDateAsc,
            "due-date-desc" => Sort::DueDateDesc,
            _ => Sort::DateDesc,
        }
    }
}

/// Input for a subtask on task create/update.
///
/// New subtasks arrive without an id; the server assigns one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskInput {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Input for creating a task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub subtasks: Vec<SubtaskInput>,
}

/// Explicit partial update enumerating exactly the mutable task fields.
///
/// `due_date` uses a double `Option` so that an absent field leaves the
/// value untouched while an explicit JSON `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default, with = "double_option")]
    pub due_date: Option<Option<i64>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub subtasks: Option<Vec<SubtaskInput>>,
}

/// Deserialize helper distinguishing "field absent" from "field null".
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

/// One calendar-aligned analytics bucket (a day or a month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Weekday name for daily buckets ("Mon"), month name for monthly ("Jan").
    pub label: String,
    pub on_time: i64,
    pub late: i64,
}

/// Derived completion metrics for a user's task collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Percentage of tasks that are completed (with a completion stamp).
    pub completion_rate: f64,
    /// Percentage of completed-with-due-date tasks finished at or before
    /// their due date. Zero when no completed task carries a due date.
    pub on_time_rate: f64,
    /// Pending tasks whose due date is already in the past.
    pub overdue_count: i64,
    /// Exactly 7 daily buckets, oldest first, ending with today.
    pub weekly: Vec<Bucket>,
    /// Exactly 6 monthly buckets, oldest first, ending with this month.
    pub monthly: Vec<Bucket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parse_falls_back_to_date_desc() {
        assert_eq!(Sort::parse("due-date-asc"), Sort::DueDateAsc);
        assert_eq!(Sort::parse("bogus"), Sort::DateDesc);
        assert_eq!(Sort::parse(""), Sort::DateDesc);
    }

    #[test]
    fn priority_lenient_parse_defaults_to_medium() {
        assert_eq!(Priority::parse_lenient("high"), Priority::High);
        assert_eq!(Priority::parse_lenient("urgent"), Priority::Medium);
    }

    #[test]
    fn task_patch_distinguishes_null_from_absent() {
        let patch: TaskPatch = serde_json::from_str(r#"{"dueDate": null}"#).unwrap();
        assert_eq!(patch.due_date, Some(None));

        let patch: TaskPatch = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(patch.due_date, None);

        let patch: TaskPatch = serde_json::from_str(r#"{"dueDate": 42}"#).unwrap();
        assert_eq!(patch.due_date, Some(Some(42)));
    }

    #[test]
    fn task_serializes_owner_as_user() {
        let task = Task {
            id: "t1".into(),
            owner_id: "u1".into(),
            title: "Ship it".into(),
            description: String::new(),
            is_completed: false,
            created_at: 1,
            due_date: None,
            completed_at: None,
            priority: Priority::Medium,
            subtasks: vec![],
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["user"], "u1");
        assert_eq!(json["isCompleted"], false);
        assert!(json.get("dueDate").is_none());
    }
}

//! Task list rendering: filter, search, and sort.

use std::cmp::Ordering;

use crate::types::{Filter, Sort, Task};

/// Produce the view-ready task list for the given view state.
///
/// Pure: the input collection is never mutated and the result is a fresh
/// vector. The sort is stable, so tasks that compare equal (for example
/// two tasks without a due date under a due-date sort) keep their
/// incoming relative order.
pub fn render(tasks: &[Task], filter: Filter, sort: Sort, search: &str) -> Vec<Task> {
    let needle = search.trim().to_lowercase();

    let mut result: Vec<Task> = tasks
        .iter()
        .filter(|t| match filter {
            Filter::All => true,
            Filter::Completed => t.is_completed,
            Filter::Pending => !t.is_completed,
        })
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    result.sort_by(|a, b| compare(a, b, sort));
    result
}

fn compare(a: &Task, b: &Task, sort: Sort) -> Ordering {
    match sort {
        Sort::DateAsc => a.created_at.cmp(&b.created_at),
        Sort::DateDesc => b.created_at.cmp(&a.created_at),
        Sort::DueDateAsc | Sort::DueDateDesc => match (a.due_date, b.due_date) {
            // Tasks without a due date always trail, regardless of direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
            (Some(da), Some(db)) => {
                if sort == Sort::DueDateAsc {
                    da.cmp(&db)
                } else {
                    db.cmp(&da)
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    fn task(id: &str, created_at: i64, due_date: Option<i64>, completed: bool) -> Task {
        Task {
            id: id.into(),
            owner_id: "u1".into(),
            title: format!("Task {}", id),
            description: String::new(),
            is_completed: completed,
            created_at,
            due_date,
            completed_at: if completed { Some(created_at) } else { None },
            priority: Priority::Medium,
            subtasks: vec![],
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn completed_filter_keeps_only_completed() {
        let tasks = vec![
            task("a", 1, None, true),
            task("b", 2, None, false),
            task("c", 3, None, true),
        ];

        let rendered = render(&tasks, Filter::Completed, Sort::DateAsc, "");

        assert_eq!(ids(&rendered), vec!["a", "c"]);
        assert!(rendered.iter().all(|t| t.is_completed));
    }

    #[test]
    fn pending_filter_keeps_only_pending() {
        let tasks = vec![task("a", 1, None, true), task("b", 2, None, false)];

        let rendered = render(&tasks, Filter::Pending, Sort::DateAsc, "");

        assert_eq!(ids(&rendered), vec!["b"]);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut groceries = task("a", 1, None, false);
        groceries.title = "Buy Groceries".into();
        let mut report = task("b", 2, None, false);
        report.description = "quarterly GROCERIES budget".into();
        let other = task("c", 3, None, false);

        let rendered = render(
            &[groceries, report, other],
            Filter::All,
            Sort::DateAsc,
            "groceries",
        );

        assert_eq!(ids(&rendered), vec!["a", "b"]);
    }

    #[test]
    fn no_match_search_returns_empty_not_error() {
        let tasks = vec![task("a", 1, None, false)];

        let rendered = render(&tasks, Filter::All, Sort::DateDesc, "xyz-no-match");

        assert!(rendered.is_empty());
    }

    #[test]
    fn date_sorts_order_by_created_at() {
        let tasks = vec![task("a", 30, None, false), task("b", 10, None, false), task("c", 20, None, false)];

        assert_eq!(
            ids(&render(&tasks, Filter::All, Sort::DateAsc, "")),
            vec!["b", "c", "a"]
        );
        assert_eq!(
            ids(&render(&tasks, Filter::All, Sort::DateDesc, "")),
            vec!["a", "c", "b"]
        );
    }

    #[test]
    fn due_date_asc_puts_missing_due_dates_last() {
        // Spec example: [A(due=2024-01-10), B(due=none), C(due=2024-01-05)]
        let tasks = vec![
            task("a", 1, Some(1_704_844_800_000), false),
            task("b", 2, None, false),
            task("c", 3, Some(1_704_412_800_000), false),
        ];

        let rendered = render(&tasks, Filter::All, Sort::DueDateAsc, "");

        assert_eq!(ids(&rendered), vec!["c", "a", "b"]);
    }

    #[test]
    fn due_date_desc_still_trails_missing_due_dates() {
        let tasks = vec![
            task("a", 1, Some(100), false),
            task("b", 2, None, false),
            task("c", 3, Some(300), false),
        ];

        let rendered = render(&tasks, Filter::All, Sort::DueDateDesc, "");

        assert_eq!(ids(&rendered), vec!["c", "a", "b"]);
    }

    #[test]
    fn missing_due_date_tasks_keep_relative_order() {
        let tasks = vec![
            task("a", 1, None, false),
            task("b", 2, None, false),
            task("c", 3, Some(50), false),
            task("d", 4, None, false),
        ];

        let rendered = render(&tasks, Filter::All, Sort::DueDateAsc, "");

        assert_eq!(ids(&rendered), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn render_is_idempotent() {
        let tasks = vec![
            task("a", 5, Some(10), true),
            task("b", 3, None, false),
            task("c", 9, Some(2), false),
        ];

        let once = render(&tasks, Filter::All, Sort::DueDateAsc, "");
        let twice = render(&once, Filter::All, Sort::DueDateAsc, "");

        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn input_collection_is_untouched() {
        let tasks = vec![task("a", 2, None, false), task("b", 1, None, false)];
        let before = ids(&tasks).join(",");

        let _ = render(&tasks, Filter::All, Sort::DateAsc, "");

        assert_eq!(ids(&tasks).join(","), before);
    }
}

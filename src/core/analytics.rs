//! Time-bucketed completion analytics.
//!
//! All calendar arithmetic is done in local time on the injected `now`,
//! so the aggregator stays deterministic under test.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, TimeZone};

use crate::types::{Bucket, Metrics, Task};

/// Number of daily buckets in the weekly chart (today plus 6 preceding days).
const WEEKLY_DAYS: u64 = 7;
/// Number of monthly buckets (this month plus 5 preceding months).
const MONTHLY_MONTHS: u32 = 6;

/// Aggregate a task collection into dashboard metrics.
///
/// Returns `None` for an empty collection: the dashboard renders a
/// distinct empty state, which is not the same as an all-zero dashboard.
pub fn analyze(tasks: &[Task], now: DateTime<Local>) -> Option<Metrics> {
    if tasks.is_empty() {
        return None;
    }

    // A task counts as completed only with a consistent completion stamp.
    let completed: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.is_completed && t.completed_at.is_some())
        .collect();

    let completion_rate = completed.len() as f64 / tasks.len() as f64 * 100.0;

    let with_due_date = completed.iter().filter(|t| t.due_date.is_some()).count();
    let on_time = completed.iter().filter(|t| is_on_time(t)).count();
    let on_time_rate = if with_due_date > 0 {
        on_time as f64 / with_due_date as f64 * 100.0
    } else {
        0.0
    };

    let now_ms = now.timestamp_millis();
    let overdue_count = tasks
        .iter()
        .filter(|t| !t.is_completed && t.due_date.is_some_and(|d| d < now_ms))
        .count() as i64;

    let today = now.date_naive();

    let weekly = (0..WEEKLY_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|day| {
            bucket(
                day.format("%a").to_string(),
                &completed,
                |done| local_day(done) == Some(day),
            )
        })
        .collect();

    let monthly = (0..MONTHLY_MONTHS)
        .rev()
        .filter_map(|offset| today.checked_sub_months(Months::new(offset)))
        .map(|month| {
            bucket(
                month.format("%b").to_string(),
                &completed,
                |done| {
                    local_day(done)
                        .is_some_and(|d| d.year() == month.year() && d.month() == month.month())
                },
            )
        })
        .collect();

    Some(Metrics {
        completion_rate,
        on_time_rate,
        overdue_count,
        weekly,
        monthly,
    })
}

/// A completed task is on time when it has a due date and finished at or
/// before it. Completed tasks without a due date classify as late in the
/// bucket charts.
fn is_on_time(task: &Task) -> bool {
    matches!(
        (task.due_date, task.completed_at),
        (Some(due), Some(done)) if done <= due
    )
}

fn bucket<F>(label: String, completed: &[&Task], in_window: F) -> Bucket
where
    F: Fn(i64) -> bool,
{
    let members: Vec<&&Task> = completed
        .iter()
        .filter(|t| t.completed_at.is_some_and(&in_window))
        .collect();
    let on_time = members.iter().filter(|t| is_on_time(t)).count() as i64;

    Bucket {
        label,
        on_time,
        // everything completed in the window that was not on time
        late: members.len() as i64 - on_time,
    }
}

/// Local calendar day a millisecond timestamp falls on.
fn local_day(ms: i64) -> Option<NaiveDate> {
    Local.timestamp_millis_opt(ms).earliest().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 4, 17, 12, 0, 0).unwrap()
    }

    fn task(id: &str, due_date: Option<i64>, completed_at: Option<i64>) -> Task {
        Task {
            id: id.into(),
            owner_id: "u1".into(),
            title: format!("Task {}", id),
            description: String::new(),
            is_completed: completed_at.is_some(),
            created_at: 0,
            due_date,
            completed_at,
            priority: Priority::Medium,
            subtasks: vec![],
        }
    }

    #[test]
    fn empty_collection_yields_none_not_zeroes() {
        assert_eq!(analyze(&[], fixed_now()), None);
    }

    #[test]
    fn completion_rate_counts_stamped_tasks_only() {
        let now = fixed_now();
        let done = now.timestamp_millis() - 1_000;
        let mut inconsistent = task("broken", None, None);
        inconsistent.is_completed = true; // completed flag without a stamp

        let metrics = analyze(
            &[task("a", None, Some(done)), task("b", None, None), inconsistent],
            now,
        )
        .unwrap();

        assert!((metrics.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn on_time_rate_uses_due_date_boundary_inclusively() {
        let now = fixed_now();
        let due = now.timestamp_millis() - 10_000;

        // completed exactly at the due date: on time
        let metrics = analyze(&[task("a", Some(due), Some(due))], now).unwrap();
        assert_eq!(metrics.on_time_rate, 100.0);

        // completed one millisecond after: late
        let metrics = analyze(&[task("a", Some(due), Some(due + 1))], now).unwrap();
        assert_eq!(metrics.on_time_rate, 0.0);
    }

    #[test]
    fn on_time_rate_is_zero_without_due_dated_completions() {
        let now = fixed_now();
        let done = now.timestamp_millis() - 1_000;

        let metrics = analyze(&[task("a", None, Some(done))], now).unwrap();

        assert_eq!(metrics.on_time_rate, 0.0);
    }

    #[test]
    fn overdue_excludes_completed_tasks() {
        let now = fixed_now();
        let past_due = now.timestamp_millis() - 86_400_000;

        let metrics = analyze(
            &[
                task("late-pending", Some(past_due), None),
                task("late-done", Some(past_due), Some(now.timestamp_millis())),
                task("future", Some(now.timestamp_millis() + 86_400_000), None),
            ],
            now,
        )
        .unwrap();

        assert_eq!(metrics.overdue_count, 1);
    }

    #[test]
    fn weekly_always_has_seven_buckets_ending_today() {
        let now = fixed_now();

        let metrics = analyze(&[task("a", None, None)], now).unwrap();

        assert_eq!(metrics.weekly.len(), 7);
        assert_eq!(
            metrics.weekly.last().unwrap().label,
            now.date_naive().format("%a").to_string()
        );
        assert_eq!(
            metrics.weekly.first().unwrap().label,
            (now.date_naive() - Duration::days(6)).format("%a").to_string()
        );
    }

    #[test]
    fn weekly_buckets_place_completions_by_calendar_day() {
        let now = fixed_now();
        let two_days_ago = (now - Duration::days(2)).timestamp_millis();

        // completed without a due date: counts as late in its bucket
        let metrics = analyze(&[task("a", None, Some(two_days_ago))], now).unwrap();

        let bucket = &metrics.weekly[4]; // offsets 6..0, so "2 days ago" is index 4
        assert_eq!(bucket.on_time, 0);
        assert_eq!(bucket.late, 1);
        assert!(metrics.weekly.iter().map(|b| b.on_time + b.late).sum::<i64>() == 1);
    }

    #[test]
    fn weekly_on_time_and_late_split_within_a_day() {
        let now = fixed_now();
        let yesterday = (now - Duration::days(1)).timestamp_millis();

        let metrics = analyze(
            &[
                task("on-time", Some(yesterday + 60_000), Some(yesterday)),
                task("late", Some(yesterday - 60_000), Some(yesterday)),
            ],
            now,
        )
        .unwrap();

        let bucket = &metrics.weekly[5];
        assert_eq!(bucket.on_time, 1);
        assert_eq!(bucket.late, 1);
    }

    #[test]
    fn completions_older_than_the_window_do_not_appear() {
        let now = fixed_now();
        let long_ago = (now - Duration::days(30)).timestamp_millis();

        let metrics = analyze(&[task("a", None, Some(long_ago))], now).unwrap();

        assert!(metrics.weekly.iter().all(|b| b.on_time == 0 && b.late == 0));
    }

    #[test]
    fn monthly_has_six_buckets_with_month_membership() {
        let now = fixed_now(); // April
        let this_month = now.timestamp_millis() - 3_600_000;
        let two_months_ago = (now.date_naive() - Months::new(2))
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .earliest()
            .unwrap()
            .timestamp_millis();

        let metrics = analyze(
            &[
                task("recent", None, Some(this_month)),
                task("feb", None, Some(two_months_ago)),
            ],
            now,
        )
        .unwrap();

        assert_eq!(metrics.monthly.len(), 6);
        assert_eq!(metrics.monthly.last().unwrap().label, "Apr");
        assert_eq!(metrics.monthly.last().unwrap().late, 1);
        assert_eq!(metrics.monthly[3].label, "Feb");
        assert_eq!(metrics.monthly[3].late, 1);
        assert_eq!(metrics.monthly[0].label, "Nov");
    }
}

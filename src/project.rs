use chrono::{DateTime, Local};
use serde::Serialize;

use crate::model::Task;

/// Display classification for a task's deadline. Derived on every
/// projection, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueToday,
    Normal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Projected<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub due: DueStatus,
}

/// Overdue means strictly past; a deadline landing exactly on `now` still
/// counts as due today.
pub fn due_status(task: &Task, now: DateTime<Local>) -> DueStatus {
    match task.deadline {
        Some(d) if d < now => DueStatus::Overdue,
        Some(d) if d.date_naive() == now.date_naive() => DueStatus::DueToday,
        _ => DueStatus::Normal,
    }
}

/// Filter, sort and annotate the collection for display. Pure: repeated
/// calls with the same inputs yield the same sequence, ties keep input
/// order.
///
/// Sort key, ascending: undone before done, then priority rank (high
/// first), then deadline with missing deadlines last.
pub fn project<'a>(tasks: &'a [Task], search: &str, now: DateTime<Local>) -> Vec<Projected<'a>> {
    let needle = search.to_lowercase();
    let mut rows: Vec<&Task> = tasks
        .iter()
        .filter(|t| needle.is_empty() || t.text.to_lowercase().contains(&needle))
        .collect();
    rows.sort_by_key(|t| {
        (
            t.done,
            t.priority.rank(),
            t.deadline.map(|d| d.timestamp_millis()).unwrap_or(i64::MAX),
        )
    });
    rows.into_iter()
        .map(|t| Projected {
            due: due_status(t, now),
            task: t,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};
    use chrono::{Duration, TimeZone};

    fn make_task(
        id: i64,
        text: &str,
        done: bool,
        priority: Priority,
        deadline: Option<DateTime<Local>>,
    ) -> Task {
        Task {
            id,
            text: text.to_string(),
            done,
            deadline,
            priority,
            category: Category::default(),
            reminded_at: false,
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let tasks = vec![
            make_task(1, "Buy Milk", false, Priority::Low, None),
            make_task(2, "write report", false, Priority::Low, None),
        ];
        let rows = project(&tasks, "milk", noon());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.id, 1);
    }

    #[test]
    fn empty_search_keeps_all() {
        let tasks = vec![
            make_task(1, "a", false, Priority::Low, None),
            make_task(2, "b", true, Priority::Low, None),
        ];
        assert_eq!(project(&tasks, "", noon()).len(), 2);
    }

    #[test]
    fn composite_sort_order() {
        let now = noon();
        let t0 = now + Duration::hours(1);
        let t1 = now + Duration::hours(2);
        let earliest = now - Duration::days(1);
        // Undone before done regardless of deadline, then priority, then
        // deadline.
        let tasks = vec![
            make_task(1, "A", false, Priority::High, Some(t1)),
            make_task(2, "B", false, Priority::Low, Some(t0)),
            make_task(3, "C", true, Priority::High, Some(earliest)),
        ];
        let ids: Vec<i64> = project(&tasks, "", now).iter().map(|r| r.task.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn deadline_breaks_priority_ties() {
        let now = noon();
        let tasks = vec![
            make_task(1, "later", false, Priority::High, Some(now + Duration::hours(5))),
            make_task(2, "sooner", false, Priority::High, Some(now + Duration::hours(1))),
        ];
        let ids: Vec<i64> = project(&tasks, "", now).iter().map(|r| r.task.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn missing_deadline_sorts_last() {
        let now = noon();
        let tasks = vec![
            make_task(1, "no deadline", false, Priority::Low, None),
            make_task(2, "dated", false, Priority::Low, Some(now + Duration::hours(1))),
        ];
        let ids: Vec<i64> = project(&tasks, "", now).iter().map(|r| r.task.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn projection_is_idempotent() {
        let now = noon();
        let tasks = vec![
            make_task(1, "a", false, Priority::Medium, Some(now + Duration::hours(1))),
            make_task(2, "b", true, Priority::High, None),
            make_task(3, "c", false, Priority::Low, None),
        ];
        let first: Vec<i64> = project(&tasks, "", now).iter().map(|r| r.task.id).collect();
        let second: Vec<i64> = project(&tasks, "", now).iter().map(|r| r.task.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let now = noon();
        let tasks = vec![
            make_task(10, "first", false, Priority::Low, None),
            make_task(20, "second", false, Priority::Low, None),
        ];
        let ids: Vec<i64> = project(&tasks, "", now).iter().map(|r| r.task.id).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn due_status_classification() {
        let now = noon();
        let overdue = make_task(1, "t", false, Priority::Low, Some(now - Duration::minutes(1)));
        let today = make_task(2, "t", false, Priority::Low, Some(now + Duration::hours(3)));
        let later = make_task(3, "t", false, Priority::Low, Some(now + Duration::days(2)));
        let undated = make_task(4, "t", false, Priority::Low, None);
        assert_eq!(due_status(&overdue, now), DueStatus::Overdue);
        assert_eq!(due_status(&today, now), DueStatus::DueToday);
        assert_eq!(due_status(&later, now), DueStatus::Normal);
        assert_eq!(due_status(&undated, now), DueStatus::Normal);
    }

    #[test]
    fn deadline_exactly_now_is_due_today_not_overdue() {
        let now = noon();
        let task = make_task(1, "t", false, Priority::Low, Some(now));
        assert_eq!(due_status(&task, now), DueStatus::DueToday);
    }
}

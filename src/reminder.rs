use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{DateTime, Duration, Local};
use log::{info, warn};

use crate::model::TaskId;
use crate::notifier::Notifier;
use crate::store::TaskStore;

/// Window around a deadline within which a reminder counts as on time.
pub const TOLERANCE_SECS: i64 = 5;

/// Default scan period. Equal to the tolerance, so a deadline can slip
/// between two ticks without ever falling inside the window; `remind
/// --interval` lets users tighten the period.
pub const POLL_INTERVAL: StdDuration = StdDuration::from_secs(5);

/// One scheduler pass: deliver a reminder for every task whose deadline lies
/// within the tolerance window of `now` and that has not been reminded yet.
/// Delivery failure is logged, not retried, and the task is still marked
/// reminded so it is never renotified. Returns the number of tasks fired.
pub fn tick(store: &mut TaskStore, now: DateTime<Local>, notifier: &mut dyn Notifier) -> usize {
    let tolerance = Duration::seconds(TOLERANCE_SECS);
    let due: Vec<TaskId> = store
        .tasks()
        .iter()
        .filter(|t| !t.reminded_at)
        .filter(|t| matches!(t.deadline, Some(d) if (d - now).abs() <= tolerance))
        .map(|t| t.id)
        .collect();

    let mut fired = 0;
    for id in due {
        let Some(task) = store.get(id).cloned() else {
            continue;
        };
        if let Err(e) = notifier.deliver(&task) {
            warn!("reminder delivery failed for task {id}: {e:#}");
        }
        if store.mark_reminded(id).is_ok() {
            fired += 1;
        }
    }
    fired
}

/// Foreground reminder loop for `nudge remind`. Reloads the store before
/// each pass so a tick always maps over the latest on-disk state rather
/// than a stale snapshot.
pub fn run(
    store: &mut TaskStore,
    notifier: &mut dyn Notifier,
    interval: StdDuration,
    once: bool,
) -> Result<()> {
    loop {
        store.reload()?;
        let fired = tick(store, Local::now(), notifier);
        if fired > 0 {
            info!("fired {fired} reminder(s)");
        }
        if once {
            return Ok(());
        }
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority, Task};
    use crate::storage::{self, Storage};
    use anyhow::bail;

    struct Recording {
        delivered: Vec<String>,
    }

    impl Notifier for Recording {
        fn deliver(&mut self, task: &Task) -> Result<()> {
            self.delivered.push(task.text.clone());
            Ok(())
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn deliver(&mut self, _task: &Task) -> Result<()> {
            bail!("permission denied")
        }
    }

    fn store_with_deadline(offset_secs: i64) -> (TaskStore, TaskId, DateTime<Local>, tempfile::TempDir) {
        let (st, dir) = storage::temp();
        let mut store = TaskStore::open(st).unwrap();
        let now = Local::now();
        let id = store
            .create(
                "due task",
                Some(now + Duration::seconds(offset_secs)),
                Priority::Low,
                Category::Work,
                now,
            )
            .unwrap()
            .id;
        (store, id, now, dir)
    }

    #[test]
    fn fires_exactly_once_within_tolerance() {
        let (mut store, id, now, _dir) = store_with_deadline(2);
        let mut notifier = Recording { delivered: vec![] };

        assert_eq!(tick(&mut store, now, &mut notifier), 1);
        assert_eq!(notifier.delivered, vec!["due task"]);
        assert!(store.get(id).unwrap().reminded_at);

        // Second tick in the same window fires nothing.
        assert_eq!(tick(&mut store, now, &mut notifier), 0);
        assert_eq!(notifier.delivered.len(), 1);
    }

    #[test]
    fn window_boundary_fires() {
        let (mut store, _id, now, _dir) = store_with_deadline(TOLERANCE_SECS);
        let mut notifier = Recording { delivered: vec![] };
        assert_eq!(tick(&mut store, now, &mut notifier), 1);
    }

    #[test]
    fn outside_window_is_skipped() {
        let (mut store, id, now, _dir) = store_with_deadline(60);
        let mut notifier = Recording { delivered: vec![] };
        assert_eq!(tick(&mut store, now, &mut notifier), 0);
        assert!(!store.get(id).unwrap().reminded_at);
    }

    #[test]
    fn task_without_deadline_is_skipped() {
        // Undated tasks only come from legacy data, so seed the file
        // directly.
        let (st, _dir) = storage::temp();
        let path = st.path().to_path_buf();
        st.save(&[Task {
            id: 1,
            text: "undated".to_string(),
            done: false,
            deadline: None,
            priority: Priority::default(),
            category: Category::default(),
            reminded_at: false,
        }])
        .unwrap();
        let mut store = TaskStore::open(Storage::new(path)).unwrap();
        let mut notifier = Recording { delivered: vec![] };
        assert_eq!(tick(&mut store, Local::now(), &mut notifier), 0);
    }

    #[test]
    fn delivery_failure_still_marks_reminded() {
        let (mut store, id, now, _dir) = store_with_deadline(0);
        assert_eq!(tick(&mut store, now, &mut Failing), 1);
        assert!(store.get(id).unwrap().reminded_at);

        // No renotification attempt afterwards.
        let mut notifier = Recording { delivered: vec![] };
        assert_eq!(tick(&mut store, now, &mut notifier), 0);
        assert!(notifier.delivered.is_empty());
    }

    #[test]
    fn done_tasks_still_fire() {
        // Completion does not cancel a pending reminder; only reminded_at
        // does.
        let (mut store, id, now, _dir) = store_with_deadline(1);
        store.toggle_done(id).unwrap();
        let mut notifier = Recording { delivered: vec![] };
        assert_eq!(tick(&mut store, now, &mut notifier), 1);
    }
}

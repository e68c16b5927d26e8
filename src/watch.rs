use std::path::Path;
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches the task file for writes from other processes. The watcher must
/// be kept alive for events to arrive. Saves are temp-file renames, so the
/// parent directory is watched rather than the file itself.
pub fn watch_store(path: &Path) -> Result<(RecommendedWatcher, Receiver<()>)> {
    let (tx, rx) = mpsc::channel();

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if res.is_ok() {
            // Ignore send errors (receiver dropped)
            let _ = tx.send(());
        }
    })
    .context("failed to create file watcher")?;

    let watch_path = path.parent().unwrap_or(path);
    watcher
        .watch(watch_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_path.display()))?;

    Ok((watcher, rx))
}

/// Non-blocking check for pending change events. Drains the backlog so one
/// reload covers a burst of writes.
pub fn changed(rx: &Receiver<()>) -> bool {
    let mut seen = false;
    while rx.try_recv().is_ok() {
        seen = true;
    }
    seen
}

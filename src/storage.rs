use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::Task;

/// Whole-collection persistence: the task list is stored as a single JSON
/// array and rewritten in full on every save.
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. A missing file is an empty collection; a file
    /// that exists but does not parse is an error.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    /// Save the full collection. Writes to a temp file in the same directory
    /// and renames over the target, so a concurrent reader never sees a torn
    /// write.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::Builder::new()
            .prefix(".nudge-")
            .suffix(".json")
            .tempfile_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, tasks).context("failed to serialize tasks")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
pub fn temp() -> (Storage, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let storage = Storage::new(dir.path().join("tasks.json"));
    (storage, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};

    fn make_task(id: i64, text: &str) -> Task {
        Task {
            id,
            text: text.to_string(),
            done: false,
            deadline: None,
            priority: Priority::default(),
            category: Category::default(),
            reminded_at: false,
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let (storage, _dir) = temp();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _dir) = temp();
        let tasks = vec![make_task(1, "write report"), make_task(2, "buy milk")];
        storage.save(&tasks).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[1].text, "buy milk");
    }

    #[test]
    fn save_replaces_previous_contents() {
        let (storage, _dir) = temp();
        storage.save(&[make_task(1, "a"), make_task(2, "b")]).unwrap();
        storage.save(&[make_task(3, "c")]).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (storage, _dir) = temp();
        fs::write(storage.path(), "not json").unwrap();
        assert!(storage.load().is_err());
    }
}

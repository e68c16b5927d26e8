use chrono::{DateTime, Local};
use log::{debug, error};
use thiserror::Error;

use crate::model::{Category, Priority, Task, TaskId};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task text must not be empty")]
    EmptyText,
    #[error("deadline must not be empty")]
    EmptyDeadline,
    #[error("deadline must not be in the past")]
    PastDeadline,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no task with id {0}")]
    NotFound(TaskId),
}

/// Owns the task collection and writes it through to storage on every
/// mutation. A failed save is logged and never fails the mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Storage,
}

impl TaskStore {
    pub fn open(storage: Storage) -> anyhow::Result<Self> {
        let tasks = storage.load()?;
        Ok(Self { tasks, storage })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn path(&self) -> &std::path::Path {
        self.storage.path()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Re-read the collection from storage, discarding the in-memory copy.
    /// Used when another process may have written the file.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        self.tasks = self.storage.load()?;
        Ok(())
    }

    pub fn create(
        &mut self,
        text: &str,
        deadline: Option<DateTime<Local>>,
        priority: Priority,
        category: Category,
        now: DateTime<Local>,
    ) -> Result<&Task, StoreError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        let deadline = deadline.ok_or(ValidationError::EmptyDeadline)?;
        if deadline < now {
            return Err(ValidationError::PastDeadline.into());
        }
        let id = self.next_id(now);
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            done: false,
            deadline: Some(deadline),
            priority,
            category,
            reminded_at: false,
        });
        self.persist();
        debug!("created task {id}");
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Replace text, deadline, priority and category of an existing task,
    /// preserving `done` and `reminded_at`. Unlike `create`, a deadline in
    /// the past is accepted so overdue tasks stay editable.
    pub fn update(
        &mut self,
        id: TaskId,
        text: &str,
        deadline: Option<DateTime<Local>>,
        priority: Priority,
        category: Category,
    ) -> Result<&Task, StoreError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        let deadline = deadline.ok_or(ValidationError::EmptyDeadline)?;
        let idx = self.position(id)?;
        let task = &mut self.tasks[idx];
        task.text = text.to_string();
        task.deadline = Some(deadline);
        task.priority = priority;
        task.category = category;
        self.persist();
        debug!("updated task {id}");
        Ok(&self.tasks[idx])
    }

    pub fn toggle_done(&mut self, id: TaskId) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.tasks[idx].done = !self.tasks[idx].done;
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, id: TaskId) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.tasks.remove(idx);
        self.persist();
        debug!("deleted task {id}");
        Ok(())
    }

    /// Record that a reminder fired. The flag only ever moves false -> true;
    /// calling this on an already-reminded task is a no-op.
    pub fn mark_reminded(&mut self, id: TaskId) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        if !self.tasks[idx].reminded_at {
            self.tasks[idx].reminded_at = true;
            self.persist();
        }
        Ok(())
    }

    fn position(&self, id: TaskId) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Ids come from the creation wall clock in milliseconds, bumped past
    /// the current maximum so two creations in the same millisecond stay
    /// unique and monotonic.
    fn next_id(&self, now: DateTime<Local>) -> TaskId {
        let candidate = now.timestamp_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if candidate <= max => max + 1,
            _ => candidate,
        }
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.tasks) {
            error!("failed to persist tasks: {e:#}");
        }
    }
}

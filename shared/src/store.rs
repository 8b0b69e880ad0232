use std::collections::HashSet;
use std::fmt;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::storage::{Storage, StorageError};
use crate::task::{NewTask, Task};

/// Non-fatal condition found while opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// The stored blob could not be decoded and was discarded.
    CorruptedStorage { reason: String },
}

impl fmt::Display for StoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreWarning::CorruptedStorage { reason } => {
                write!(f, "stored tasks were corrupted and have been reset: {reason}")
            }
        }
    }
}

/// Authoritative task list, written through to `S` after every mutation.
///
/// A mutation that returns `Err` has still been applied in memory; only
/// durability failed.
#[derive(Debug)]
pub struct TaskStore<S> {
    tasks: Vec<Task>,
    storage: S,
}

impl<S: Storage> TaskStore<S> {
    /// Rehydrates from `storage`. A blob that does not decode into a valid
    /// task list is cleared and reported as a warning.
    pub fn open(mut storage: S) -> Result<(Self, Option<StoreWarning>), StorageError> {
        let mut warning = None;
        let tasks = match storage.read()? {
            None => Vec::new(),
            Some(blob) => match decode(&blob) {
                Ok(tasks) => tasks,
                Err(reason) => {
                    warn!("Discarding corrupted task storage: {}", reason);
                    if let Err(e) = storage.clear() {
                        warn!("Failed to clear corrupted task storage: {}", e);
                    }
                    warning = Some(StoreWarning::CorruptedStorage { reason });
                    Vec::new()
                }
            },
        };
        info!("Loaded {} tasks", tasks.len());
        Ok((Self { tasks, storage }, warning))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn create(&mut self, new_task: NewTask) -> Result<Task, StorageError> {
        let id = self.fresh_id();
        let task = Task {
            id,
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            due_date: new_task.due_date,
            subtasks: Vec::new(),
        };
        self.tasks.push(task.clone());
        debug!("Created task {}", id);
        self.persist()?;
        Ok(task)
    }

    /// Replaces the task with the same id, keeping its position.
    pub fn update(&mut self, task: Task) -> Result<(), StorageError> {
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            debug!("Ignoring update of unknown task {}", task.id);
            return Ok(());
        };
        *slot = task;
        self.persist()
    }

    pub fn delete(&mut self, id: Uuid) -> Result<(), StorageError> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!("Ignoring delete of unknown task {}", id);
            return Ok(());
        };
        self.tasks.remove(index);
        self.persist()
    }

    pub fn toggle_status(&mut self, id: Uuid) -> Result<(), StorageError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!("Ignoring toggle of unknown task {}", id);
            return Ok(());
        };
        task.status = task.status.toggled();
        self.persist()
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let blob = serde_json::to_string_pretty(&self.tasks)
            .map_err(|e| StorageError::Unavailable(format!("failed to encode tasks: {e}")))?;
        self.storage.write(&blob).map_err(|e| {
            warn!("Failed to persist {} tasks: {}", self.tasks.len(), e);
            e
        })
    }
}

fn decode(blob: &str) -> Result<Vec<Task>, String> {
    let tasks: Vec<Task> = serde_json::from_str(blob).map_err(|e| e.to_string())?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(format!("duplicate task id {}", task.id));
        }
    }
    Ok(tasks)
}

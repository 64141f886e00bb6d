use chrono::Utc;

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::task::{Subtask, Task, TaskId};
use crate::ops::due;

/// Storage key holding the serialized task collection
pub const TASKS_KEY: &str = "tasks";

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("subtask {index} out of range: task {task_id} has {len} subtasks")]
    IndexOutOfRange {
        task_id: TaskId,
        index: usize,
        len: usize,
    },
    #[error("could not persist tasks: {0}")]
    PersistenceFailed(#[from] StorageError),
    /// The task already left the in-memory collection; only the write failed.
    #[error("task {id} deleted but not persisted: {source}", id = .task.id)]
    DeleteNotPersisted {
        task: Box<Task>,
        source: StorageError,
    },
}

impl StoreError {
    /// The task a delete removed before its write failed
    pub fn deleted_task(&self) -> Option<&Task> {
        match self {
            StoreError::DeleteNotPersisted { task, .. } => Some(task),
            _ => None,
        }
    }
}

/// What went wrong while loading; the store still starts (empty).
#[derive(Debug)]
pub struct LoadIssue {
    pub error: StoreError,
    /// The stored text that could not be decoded, if any was read
    pub raw: Option<String>,
}

/// The owned, ordered task collection and its persistence.
///
/// Every mutating operation validates first, then mutates, then writes the
/// full collection under `tasks`. A failed write is returned as
/// `PersistenceFailed` but the mutation stays applied; `save()` retries.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    storage: S,
    revision: u64,
    unsaved: bool,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// An empty store over `storage` (nothing is read)
    pub fn new(storage: S) -> Self {
        TaskStore {
            tasks: Vec::new(),
            storage,
            revision: 0,
            unsaved: false,
        }
    }

    /// Load the collection from `storage`. Absent data is an empty collection;
    /// unreadable data is also an empty collection, reported as a `LoadIssue`.
    pub fn load(storage: S) -> (Self, Option<LoadIssue>) {
        let mut store = Self::new(storage);
        let raw = match store.storage.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (store, None),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored tasks, starting empty");
                let issue = LoadIssue {
                    error: e.into(),
                    raw: None,
                };
                return (store, Some(issue));
            }
        };
        match serde_json::from_str::<Option<Vec<Task>>>(&raw) {
            Ok(tasks) => {
                store.tasks = tasks.unwrap_or_default();
                tracing::debug!(count = store.tasks.len(), "tasks loaded");
                (store, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored tasks are malformed, starting empty");
                let issue = LoadIssue {
                    error: StorageError::Json(e).into(),
                    raw: Some(raw),
                };
                (store, Some(issue))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Bumped after every applied mutation; views re-project when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True after a mutation whose write failed and has not been retried
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// For keys owned by other collaborators (e.g. `theme`)
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // -----------------------------------------------------------------------
    // Task operations
    // -----------------------------------------------------------------------

    /// Append a new active task. Text is trimmed; the due date is normalized.
    pub fn add_task(&mut self, text: &str, due_date: &str) -> Result<Task, StoreError> {
        let text = required_text(text, "task text is empty")?;
        let due_date = required_due(due_date)?;
        let task = Task::new(self.fresh_id(), text, due_date);
        self.tasks.push(task.clone());
        tracing::debug!(id = task.id, "task added");
        self.commit()?;
        Ok(task)
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let task = self.task_mut(id)?;
        task.is_completed = !task.is_completed;
        let task = task.clone();
        tracing::debug!(id, completed = task.is_completed, "task toggled");
        self.commit()?;
        Ok(task)
    }

    /// Replace text and due date; subtasks are untouched.
    pub fn update_task(&mut self, id: TaskId, text: &str, due_date: &str) -> Result<Task, StoreError> {
        let text = required_text(text, "task text is empty")?;
        let due_date = required_due(due_date)?;
        let task = self.task_mut(id)?;
        task.text = text;
        task.due_date = due_date;
        let task = task.clone();
        tracing::debug!(id, "task updated");
        self.commit()?;
        Ok(task)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = self.tasks.remove(pos);
        tracing::debug!(id, "task deleted");
        match self.commit() {
            Ok(()) => Ok(removed),
            Err(StoreError::PersistenceFailed(source)) => Err(StoreError::DeleteNotPersisted {
                task: Box::new(removed),
                source,
            }),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Subtask operations (positional, 0-based)
    // -----------------------------------------------------------------------

    pub fn add_subtask(&mut self, task_id: TaskId, text: &str) -> Result<Task, StoreError> {
        let text = required_text(text, "subtask text is empty")?;
        let task = self.task_mut(task_id)?;
        task.subtasks.push(Subtask::new(text));
        let task = task.clone();
        tracing::debug!(task_id, index = task.subtasks.len() - 1, "subtask added");
        self.commit()?;
        Ok(task)
    }

    pub fn toggle_subtask(&mut self, task_id: TaskId, index: usize, done: bool) -> Result<Task, StoreError> {
        let subtask = self.subtask_mut(task_id, index)?;
        subtask.done = done;
        tracing::debug!(task_id, index, done, "subtask toggled");
        self.commit_returning(task_id)
    }

    pub fn edit_subtask(&mut self, task_id: TaskId, index: usize, text: &str) -> Result<Task, StoreError> {
        // Resolve the target first so a bad id/index wins over bad text
        self.subtask_mut(task_id, index)?;
        let text = required_text(text, "subtask text is empty")?;
        let subtask = self.subtask_mut(task_id, index)?;
        subtask.text = text;
        tracing::debug!(task_id, index, "subtask edited");
        self.commit_returning(task_id)
    }

    /// Remove a subtask; later subtasks shift down one position.
    pub fn delete_subtask(&mut self, task_id: TaskId, index: usize) -> Result<Task, StoreError> {
        let task = self.task_mut(task_id)?;
        let len = task.subtasks.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange {
                task_id,
                index,
                len,
            });
        }
        task.subtasks.remove(index);
        tracing::debug!(task_id, index, "subtask deleted");
        self.commit_returning(task_id)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the full collection under `tasks`.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.tasks).map_err(StorageError::Json)?;
        match self.storage.set(TASKS_KEY, &json) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                self.unsaved = true;
                tracing::warn!(error = %e, "could not persist tasks; in-memory state kept");
                Err(e.into())
            }
        }
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.revision += 1;
        self.save()
    }

    fn commit_returning(&mut self, task_id: TaskId) -> Result<Task, StoreError> {
        self.commit()?;
        self.get(task_id).cloned().ok_or(StoreError::NotFound(task_id))
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn subtask_mut(&mut self, task_id: TaskId, index: usize) -> Result<&mut Subtask, StoreError> {
        let task = self.task_mut(task_id)?;
        let len = task.subtasks.len();
        task.subtasks
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange {
                task_id,
                index,
                len,
            })
    }

    /// Current epoch milliseconds, bumped past every existing id. When the
    /// largest id cannot be bumped, the lowest unused positive id.
    fn fresh_id(&self) -> TaskId {
        let now = Utc::now().timestamp_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) if max >= now => max.checked_add(1).unwrap_or_else(|| self.lowest_free_id()),
            _ => now,
        }
    }

    fn lowest_free_id(&self) -> TaskId {
        let mut ids: Vec<TaskId> = self.tasks.iter().map(|t| t.id).filter(|&id| id > 0).collect();
        ids.sort_unstable();
        ids.dedup();
        // `candidate` never exceeds ids.len() + 1
        let mut candidate = 1;
        for id in ids {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }
}

fn required_text(text: &str, what: &'static str) -> Result<String, StoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StoreError::ValidationFailed(what));
    }
    Ok(trimmed.to_string())
}

fn required_due(due_date: &str) -> Result<String, StoreError> {
    if due_date.trim().is_empty() {
        return Err(StoreError::ValidationFailed("due date is empty"));
    }
    due::normalize(due_date).ok_or(StoreError::ValidationFailed("due date is not a valid date"))
}

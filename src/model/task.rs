use serde::{Deserialize, Serialize};

/// Task identifier. Time-derived (epoch milliseconds) but only uniqueness matters.
pub type TaskId = i64;

/// A checklist item under a task. Addressed by position, not by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Subtask {
            text: text.into(),
            done: false,
        }
    }
}

/// A task as it is stored under the `tasks` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Title text (never empty after trimming)
    pub text: String,
    /// Due date-time in one of the accepted ISO forms (see `ops::due`)
    pub due_date: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Create an active task with no subtasks
    pub fn new(id: TaskId, text: impl Into<String>, due_date: impl Into<String>) -> Self {
        Task {
            id,
            text: text.into(),
            due_date: due_date.into(),
            is_completed: false,
            subtasks: Vec::new(),
        }
    }

    /// `(done, total)` subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.done).count();
        (done, self.subtasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut task = Task::new(1700000000000, "Buy milk", "2026-10-18T14:30");
        task.subtasks.push(Subtask::new("skim"));
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":1700000000000,"text":"Buy milk","dueDate":"2026-10-18T14:30","isCompleted":false,"subtasks":[{"text":"skim","done":false}]}"#
        );
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"id":5,"text":"Old","dueDate":"2024-01-01"}"#).unwrap();
        assert!(!task.is_completed);
        assert!(task.subtasks.is_empty());

        let sub: Subtask = serde_json::from_str(r#"{"text":"x"}"#).unwrap();
        assert!(!sub.done);
    }

    #[test]
    fn subtask_progress_counts_done() {
        let mut task = Task::new(1, "t", "2026-01-01");
        task.subtasks = vec![Subtask::new("a"), Subtask::new("b"), Subtask::new("c")];
        task.subtasks[1].done = true;
        assert_eq!(task.subtask_progress(), (1, 3));
    }
}

use serde::Serialize;

use crate::model::task::{Subtask, Task, TaskId};
use crate::ops::view::{self, ViewRow};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowJson<'a> {
    pub number: usize,
    #[serde(flatten)]
    pub task: &'a Task,
    /// Resolved due instant (RFC 3339), absent when the stored date is unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    pub countdown: &'a str,
}

#[derive(Serialize)]
pub struct CountdownJson<'a> {
    pub id: TaskId,
    pub countdown: &'a str,
}

#[derive(Serialize)]
pub struct ThemeJson<'a> {
    pub theme: &'a str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn row_to_json(row: &ViewRow) -> RowJson<'_> {
    RowJson {
        number: row.number,
        task: &row.task,
        due_at: row.due.map(|d| d.to_rfc3339()),
        countdown: &row.countdown,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(done: bool) -> char {
    if done { 'x' } else { ' ' }
}

/// Due date plus time and countdown, or the raw text when unreadable
pub fn format_due(row: &ViewRow) -> String {
    match &row.due {
        Some(due) => format!("{} {}", view::format_due_date(due), view::due_label(row)),
        None => format!("{} ({})", row.task.due_date, row.countdown),
    }
}

/// One-line summary of a visible row
pub fn format_row_line(row: &ViewRow) -> String {
    let progress = match row.task.subtask_progress() {
        (_, 0) => String::new(),
        (done, total) => format!(" [{}/{}]", done, total),
    };
    format!(
        "{:>3}. [{}] {}{}  {}  (id {})",
        row.number,
        check_char(row.task.is_completed),
        row.task.text,
        progress,
        format_due(row),
        row.task.id
    )
}

/// Subtasks numbered from 1, indented
pub fn format_subtasks(subtasks: &[Subtask], indent: usize) -> Vec<String> {
    let prefix = " ".repeat(indent);
    subtasks
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}{}. [{}] {}", prefix, i + 1, check_char(s.done), s.text))
        .collect()
}

/// Format the visible list, with subtasks under each row
pub fn format_listing(rows: &[ViewRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No tasks".to_string()];
    }
    let mut lines = Vec::new();
    for row in rows {
        lines.push(format_row_line(row));
        lines.extend(format_subtasks(&row.task.subtasks, 9));
    }
    lines
}

/// Format detailed task view
pub fn format_task_detail(row: &ViewRow) -> Vec<String> {
    let task = &row.task;
    let mut lines = vec![
        format!("[{}] {}", check_char(task.is_completed), task.text),
        format!("id: {}", task.id),
        format!("due: {}", format_due(row)),
        format!(
            "status: {}",
            if task.is_completed { "completed" } else { "active" }
        ),
    ];
    if !task.subtasks.is_empty() {
        let (done, total) = task.subtask_progress();
        lines.push(String::new());
        lines.push(format!("subtasks ({}/{}):", done, total));
        lines.extend(format_subtasks(&task.subtasks, 2));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::ViewFilters;
    use chrono::{TimeZone, Utc};

    fn row(task: Task) -> ViewRow {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        view::project(&[task], &ViewFilters::default(), &now).remove(0)
    }

    #[test]
    fn row_line_shows_progress_and_countdown() {
        let mut task = Task::new(42, "Buy milk", "2026-10-18T14:30");
        task.subtasks = vec![Subtask::new("a"), Subtask { text: "b".into(), done: true }];
        assert_eq!(
            format_row_line(&row(task)),
            "  1. [ ] Buy milk [1/2]  Oct 18, 2026 02:30 PM — 2h 30m 0s left  (id 42)"
        );
    }

    #[test]
    fn unreadable_due_shows_raw_text() {
        let mut task = Task::new(1, "x", "someday");
        task.is_completed = true;
        assert_eq!(
            format_row_line(&row(task)),
            "  1. [x] x  someday (Invalid date)  (id 1)"
        );
    }

    #[test]
    fn detail_lists_numbered_subtasks() {
        let mut task = Task::new(7, "Trip", "2026-10-17");
        task.subtasks = vec![Subtask::new("pack"), Subtask::new("book")];
        let lines = format_task_detail(&row(task));
        assert_eq!(lines[0], "[ ] Trip");
        assert_eq!(lines[2], "due: Oct 17, 2026 12:00 AM — Expired");
        assert_eq!(lines[5], "subtasks (0/2):");
        assert_eq!(lines[6], "  1. [ ] pack");
        assert_eq!(lines[7], "  2. [ ] book");
    }

    #[test]
    fn row_json_flattens_task() {
        let json = serde_json::to_value(row_to_json(&row(Task::new(3, "x", "2026-10-19")))).unwrap();
        assert_eq!(json["number"], 1);
        assert_eq!(json["id"], 3);
        assert_eq!(json["dueDate"], "2026-10-19");
        assert_eq!(json["dueAt"], "2026-10-19T00:00:00+00:00");
        assert_eq!(json["countdown"], "12h 0m 0s left");
    }

    #[test]
    fn empty_listing() {
        assert_eq!(format_listing(&[]), vec!["No tasks"]);
    }
}

use chrono::{DateTime, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::storage::FileStore;
use crate::io::store_io::open_task_store;
use crate::model::config::{AppConfig, TimeZonePolicy};
use crate::model::task::Task;
use crate::ops::task_store::{TASKS_KEY, TaskStore};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Noon UTC on 2026-10-18, the instant every render test projects at
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

/// App with `(text, due)` tasks, projected at `fixed_now()` in UTC
pub fn app_at(tasks: &[(&str, &str)]) -> (App, TempDir) {
    let tmp = TempDir::new().unwrap();
    let mut store = open_task_store(&tmp.path().join("storage.json"), usize::MAX);
    for (text, due) in tasks {
        store.add_task(text, due).unwrap();
    }
    (utc_app(store), tmp)
}

/// App over a storage file written by hand, so records that `add_task`
/// would reject (bad dates) can be loaded
pub fn app_from_stored(tasks: &[Task]) -> (App, TempDir) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("storage.json");
    let record = serde_json::json!({ TASKS_KEY: serde_json::to_string(tasks).unwrap() });
    std::fs::write(&path, record.to_string()).unwrap();
    (utc_app(open_task_store(&path, usize::MAX)), tmp)
}

fn utc_app(store: TaskStore<FileStore>) -> App {
    let mut config = AppConfig::default();
    config.view.time_zone = TimeZonePolicy::Utc;
    let mut app = App::new(store, config);
    app.refresh_at(&fixed_now());
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::render;

    #[test]
    fn full_screen_layout() {
        let (mut app, _tmp) = app_at(&[("Buy milk", "2026-10-18T14:30")]);
        let output = render_to_string(TERM_W, TERM_H, |frame, _area| {
            render(frame, &mut app);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("Tasks"));
        assert!(lines[1].starts_with("\u{2500}\u{2500}"));
        assert!(lines[3].contains("Buy milk"));
        assert!(lines[4].contains("2h 30m 0s left"));
        assert!(lines[(TERM_H - 1) as usize].contains("? help"));
    }
}

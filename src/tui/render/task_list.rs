use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::ops::view::{ViewRow, format_due_date, format_due_time};
use crate::tui::app::{App, OpenActions};
use crate::util::unicode;

use super::helpers::{check_symbol, spans_width};
use super::{push_highlighted_spans, search_regex};

/// ` 12. [x] `
const PREFIX_WIDTH: usize = 10;
/// `  Oct 18, 2026  ▸ `
const SUFFIX_WIDTH: usize = 18;
const DATE_WIDTH: usize = 12;

/// Render the column header and the visible rows, scrolled so the cursor
/// row is on screen
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut lines: Vec<Line> = vec![header_line(app, width)];

    if app.view.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  No tasks found.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    let height = (area.height as usize).saturating_sub(1);
    adjust_scroll(app, height);

    let search_re = search_regex(&app.filters.search);
    for (i, row) in app.view.rows.iter().enumerate().skip(app.scroll_offset) {
        if lines.len() > height {
            break;
        }
        lines.extend(row_lines(app, row, i == app.cursor, width, search_re.as_ref()));
    }
    lines.truncate(height + 1);

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Number of screen lines a row takes
fn row_height(app: &App, row: &ViewRow) -> usize {
    let actions = usize::from(app.open_actions.is_open(row.id()));
    2 + row.task.subtasks.len() + actions
}

fn adjust_scroll(app: &mut App, height: usize) {
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    }
    let rows = &app.view.rows;
    let mut offset = app.scroll_offset.min(rows.len().saturating_sub(1));
    while offset < app.cursor {
        let used: usize = rows[offset..=app.cursor]
            .iter()
            .map(|r| row_height(app, r))
            .sum();
        if used <= height {
            break;
        }
        offset += 1;
    }
    app.scroll_offset = offset;
}

fn header_line(app: &App, width: usize) -> Line<'static> {
    let style = Style::default()
        .fg(app.theme.dim)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    let arrow = if app.open_actions == OpenActions::All {
        "\u{25BE}"
    } else {
        "\u{25B8}"
    };
    let text_width = width.saturating_sub(PREFIX_WIDTH + SUFFIX_WIDTH);
    Line::from(vec![
        Span::styled("   #      ", style),
        Span::styled(unicode::pad_to_width("Task", text_width), style),
        Span::styled("  ", style),
        Span::styled(unicode::pad_to_width("Due", DATE_WIDTH), style),
        Span::styled(format!("  {} ", arrow), style),
    ])
}

fn row_lines(
    app: &App,
    row: &ViewRow,
    selected: bool,
    width: usize,
    search_re: Option<&Regex>,
) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let task = &row.task;
    let base = Style::default().bg(bg);
    let text_style = if task.is_completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let indent = || Span::styled(" ".repeat(PREFIX_WIDTH), base);
    let open = app.open_actions.is_open(row.id());
    let mut lines = Vec::new();

    // Title line
    let mut spans = vec![
        Span::styled(format!(" {:>3}. ", row.number), base.fg(theme.dim)),
        Span::styled(
            check_symbol(task.is_completed),
            base.fg(if task.is_completed { theme.green } else { theme.text }),
        ),
        Span::styled(" ", base),
    ];
    let progress = match task.subtask_progress() {
        (_, 0) => String::new(),
        (done, total) => format!(" ({}/{})", done, total),
    };
    let text_width = width.saturating_sub(PREFIX_WIDTH + SUFFIX_WIDTH);
    let title = unicode::fit_to_width(
        &task.text,
        text_width.saturating_sub(unicode::display_width(&progress)),
    );
    let before = spans.len();
    push_highlighted_spans(&mut spans, &title, text_style, match_style, search_re);
    spans.push(Span::styled(progress, base.fg(theme.dim)));
    let used = spans_width(&spans[before..]);
    spans.push(Span::styled(" ".repeat(text_width.saturating_sub(used) + 2), base));
    let date = match &row.due {
        Some(due) => format_due_date(due),
        None => row.countdown.clone(),
    };
    spans.push(Span::styled(
        unicode::pad_to_width(&date, DATE_WIDTH),
        base.fg(theme.text),
    ));
    spans.push(Span::styled(
        format!("  {} ", if open { "\u{25BE}" } else { "\u{25B8}" }),
        base.fg(theme.dim),
    ));
    lines.push(Line::from(spans));

    // Time and countdown
    let countdown_style = base.fg(theme.countdown_color(&row.countdown));
    let mut spans = vec![indent()];
    if let Some(due) = &row.due {
        spans.push(Span::styled(format_due_time(due), base.fg(theme.dim)));
        spans.push(Span::styled(" \u{2014} ", base.fg(theme.dim)));
    }
    spans.push(Span::styled(row.countdown.clone(), countdown_style));
    pad_line(&mut spans, width, base);
    lines.push(Line::from(spans));

    for subtask in &task.subtasks {
        let style = if subtask.done {
            base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
        } else {
            base.fg(theme.text)
        };
        let mut spans = vec![
            indent(),
            Span::styled(
                format!("{} ", check_symbol(subtask.done)),
                base.fg(if subtask.done { theme.green } else { theme.dim }),
            ),
        ];
        let avail = width.saturating_sub(PREFIX_WIDTH + 4);
        push_highlighted_spans(
            &mut spans,
            &unicode::fit_to_width(&subtask.text, avail),
            style,
            match_style,
            search_re,
        );
        pad_line(&mut spans, width, base);
        lines.push(Line::from(spans));
    }

    if open {
        let complete = if task.is_completed { "reopen" } else { "complete" };
        let mut spans = vec![indent()];
        for (key, label, color) in [
            ("c", complete, theme.green),
            ("e", "edit", theme.cyan),
            ("d", "delete", theme.red),
        ] {
            push_action(&mut spans, key, label, color, base);
        }
        pad_line(&mut spans, width, base);
        lines.push(Line::from(spans));
    }

    lines
}

fn push_action(spans: &mut Vec<Span<'static>>, key: &str, label: &str, color: Color, base: Style) {
    spans.push(Span::styled(
        format!("[{}]", key),
        base.fg(color).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(format!(" {}  ", label), base.fg(color)));
}

/// Fill the rest of the line so the row background spans the full width
fn pad_line(spans: &mut Vec<Span<'static>>, width: usize, base: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use crate::tui::render::test_helpers::*;

    fn render_list(app: &mut App, h: u16) -> String {
        render_to_string(TERM_W, h, |frame, area| {
            render_task_list(frame, app, area);
        })
    }

    #[test]
    fn empty_list_message() {
        let (mut app, _tmp) = app_at(&[]);
        let output = render_list(&mut app, 6);
        assert!(output.contains("No tasks found."));
    }

    #[test]
    fn row_shows_date_time_and_countdown() {
        let (mut app, _tmp) = app_at(&[("Buy milk", "2026-10-18T14:30")]);
        let output = render_list(&mut app, 6);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("   #      Task"));
        assert!(lines[1].starts_with("   1. [ ] Buy milk"));
        assert!(lines[1].ends_with("Oct 18, 2026  \u{25B8}"));
        assert_eq!(lines[2].trim(), "02:30 PM \u{2014} 2h 30m 0s left");
    }

    #[test]
    fn expired_and_invalid_rows() {
        let (mut app, _tmp) = app_from_stored(&[
            Task::new(1, "late", "2026-10-18T09:00"),
            Task::new(2, "broken", "not a date"),
        ]);
        assert_eq!(app.store.len(), 2);
        let output = render_list(&mut app, 8);
        assert!(output.contains("09:00 AM \u{2014} Expired"));
        let broken = output.lines().find(|l| l.contains("broken")).unwrap();
        assert!(broken.contains("Invalid date"), "{}", broken);
    }

    #[test]
    fn subtasks_and_progress() {
        let (mut app, _tmp) = app_at(&[("Trip", "2026-10-20")]);
        let id = app.store.tasks()[0].id;
        app.store.add_subtask(id, "passport").unwrap();
        app.store.add_subtask(id, "tickets").unwrap();
        app.store.toggle_subtask(id, 0, true).unwrap();
        app.refresh_at(&fixed_now());
        let output = render_list(&mut app, 8);
        assert!(output.contains("Trip (1/2)"));
        assert!(output.contains("[x] passport"));
        assert!(output.contains("[ ] tickets"));
    }

    #[test]
    fn action_strip_for_open_row() {
        let (mut app, _tmp) = app_at(&[("a", "2026-10-20"), ("b", "2026-10-21")]);
        app.open_actions = OpenActions::Row(app.view.rows[1].id());
        let output = render_list(&mut app, 10);
        assert_eq!(output.matches("[c] complete").count(), 1);
        assert!(output.contains("[e] edit  [d] delete"));

        app.open_actions = OpenActions::All;
        let output = render_list(&mut app, 10);
        assert_eq!(output.matches("[c] complete").count(), 2);
        assert!(output.lines().next().unwrap().ends_with("\u{25BE}"));
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let tasks: Vec<(String, String)> = (1..=8)
            .map(|i| (format!("task {}", i), format!("2026-10-{:02}", 18 + i)))
            .collect();
        let refs: Vec<(&str, &str)> = tasks.iter().map(|(t, d)| (t.as_str(), d.as_str())).collect();
        let (mut app, _tmp) = app_at(&refs);
        app.cursor = 7;
        let output = render_list(&mut app, 7);
        assert!(output.contains("task 8"));
        assert!(!output.contains("task 1 "));
        assert_eq!(app.scroll_offset, 5);
    }
}

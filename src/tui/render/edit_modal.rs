use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, EditField, EditModal};
use crate::tui::text_input::TextInput;

use super::helpers::{centered_rect, check_symbol};

/// Render the edit modal over the task list
pub fn render_edit_modal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(modal) = app.edit_modal.as_ref() else {
        return;
    };
    let overlay_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();
    lines.push(field_label(app, modal, EditField::Title, " Title"));
    lines.push(input_line(app, &modal.title, modal.focus == EditField::Title));
    lines.push(Line::from(""));
    lines.push(field_label(app, modal, EditField::Due, " Due"));
    lines.push(input_line(app, &modal.due, modal.focus == EditField::Due));
    lines.push(Line::from(""));
    lines.push(field_label(app, modal, EditField::Subtasks, " Subtasks"));
    subtask_lines(app, modal, &mut lines);
    lines.push(Line::from(""));
    lines.push(field_label(app, modal, EditField::NewSubtask, " New subtask"));
    lines.push(input_line(
        app,
        &modal.new_subtask,
        modal.focus == EditField::NewSubtask,
    ));

    let block = Block::default()
        .title(" Edit task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn field_label(app: &App, modal: &EditModal, field: EditField, text: &'static str) -> Line<'static> {
    let bg = app.theme.background;
    let style = if modal.focus == field {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    Line::from(Span::styled(text, style))
}

fn input_line(app: &App, input: &TextInput, focused: bool) -> Line<'static> {
    let bg = app.theme.background;
    let text = Style::default().fg(app.theme.text_bright).bg(bg);
    if !focused {
        return Line::from(Span::styled(format!("   {}", input.as_str()), text));
    }
    let before = input.before_cursor();
    Line::from(vec![
        Span::styled(format!("   {}", before), text),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(input.as_str()[before.len()..].to_string(), text),
    ])
}

fn subtask_lines(app: &App, modal: &EditModal, lines: &mut Vec<Line<'static>>) {
    let bg = app.theme.background;
    let subtasks = app
        .store
        .get(modal.task_id)
        .map(|t| t.subtasks.as_slice())
        .unwrap_or_default();
    if subtasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "   (none)",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
        return;
    }

    let focused = modal.focus == EditField::Subtasks;
    for (i, subtask) in subtasks.iter().enumerate() {
        let at_cursor = focused && i == modal.subtask_cursor;
        let row_bg = if at_cursor { app.theme.selection_bg } else { bg };
        let marker = if at_cursor { " \u{25B8} " } else { "   " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
            Span::styled(
                format!("{} ", check_symbol(subtask.done)),
                Style::default().fg(app.theme.dim).bg(row_bg),
            ),
        ];
        match modal.editing_subtask.as_ref() {
            Some(input) if at_cursor => {
                let style = Style::default().fg(app.theme.text_bright).bg(row_bg);
                let before = input.before_cursor();
                spans.push(Span::styled(before.to_string(), style));
                spans.push(Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(row_bg),
                ));
                spans.push(Span::styled(input.as_str()[before.len()..].to_string(), style));
            }
            _ => {
                let style = if subtask.done {
                    Style::default()
                        .fg(app.theme.dim)
                        .bg(row_bg)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(app.theme.text).bg(row_bg)
                };
                spans.push(Span::styled(subtask.text.clone(), style));
            }
        }
        lines.push(Line::from(spans));
    }
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{AddStep, App, Mode};
use crate::tui::text_input::TextInput;

use super::helpers::spans_width;

const NAVIGATE_HINT: &str = "a add  c done  e edit  d del  / search  f due  t theme  ? help";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if app.store.has_unsaved_changes() {
                spans.push(Span::styled(
                    " \u{25CF} unsaved (s to retry) ",
                    Style::default().fg(app.theme.red).bg(bg),
                ));
            }
            let hint = if app.show_key_hints { NAVIGATE_HINT } else { "" };
            (spans, hint)
        }
        Mode::Search => (
            prompt_spans(app, "/", &app.search_input),
            "Enter keep  Esc clear",
        ),
        Mode::Add => match &app.add_prompt {
            Some(prompt) if prompt.step == AddStep::Due => (
                prompt_spans(app, "Due (YYYY-MM-DD HH:MM): ", &prompt.input),
                "Enter add  Esc cancel",
            ),
            Some(prompt) => (
                prompt_spans(app, "New task: ", &prompt.input),
                "Enter next  Esc cancel",
            ),
            None => (Vec::new(), ""),
        },
        Mode::Edit => (Vec::new(), "Tab field  Enter save  Esc close"),
    };

    // A toast takes the place of the hint
    let right = match &app.toast {
        Some(toast) => Span::styled(
            format!("{} ", toast.message),
            Style::default()
                .fg(if toast.is_error {
                    app.theme.red
                } else {
                    app.theme.green
                })
                .bg(bg),
        ),
        None => Span::styled(
            format!("{} ", hint),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    };

    let content_width = spans_width(&spans);
    let right_width = spans_width(std::slice::from_ref(&right));
    if content_width + right_width < width {
        let padding = width - content_width - right_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(right);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// `label` + input text with a block cursor at the edit position
fn prompt_spans<'a>(app: &App, label: &'a str, input: &TextInput) -> Vec<Span<'a>> {
    let bg = app.theme.background;
    let text = Style::default().fg(app.theme.text_bright).bg(bg);
    let before = input.before_cursor();
    vec![
        Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(before.to_string(), text),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(input.as_str()[before.len()..].to_string(), text),
    ]
}

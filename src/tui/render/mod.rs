pub mod edit_modal;
pub mod help_overlay;
pub mod helpers;
pub mod status_row;
pub mod tab_bar;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::App;

/// Main render function; dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | task list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);

    if app.edit_modal.is_some() {
        edit_modal::render_edit_modal(frame, app, frame.area());
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Case-insensitive literal matcher for the current search keyword
pub(super) fn search_regex(keyword: &str) -> Option<Regex> {
    if keyword.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(keyword))).ok()
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    let mut has_match = false;
    for m in re.find_iter(text) {
        has_match = true;
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if !has_match {
        spans.push(Span::styled(text.to_string(), base_style));
    } else if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn contents(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn highlights_matches_case_insensitively() {
        let re = search_regex("MILK");
        let hl = Style::default().bg(Color::Cyan);
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "Buy milk, more milk", Style::default(), hl, re.as_ref());
        assert_eq!(contents(&spans), vec!["Buy ", "milk", ", more ", "milk"]);
        assert_eq!(spans[1].style, hl);
    }

    #[test]
    fn no_keyword_is_one_span() {
        assert!(search_regex("").is_none());
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "Buy milk", Style::default(), Style::default(), None);
        assert_eq!(contents(&spans), vec!["Buy milk"]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let re = search_regex("a.b");
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "axb a.b", Style::default(), Style::default(), re.as_ref());
        assert_eq!(contents(&spans), vec!["axb ", "a.b"]);
    }
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::filter::StatusFilter;
use crate::tui::app::{App, Mode};
use crate::tui::theme::ThemeMode;
use crate::util::unicode;

use super::helpers::spans_width;

/// Render the tab bar: title, status tabs, due filter and theme, with a
/// separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled(
            "\u{25B6} Tasks ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        sep.clone(),
    ];

    for status in StatusFilter::ALL {
        spans.push(Span::styled(
            format!(" {} ", status.label()),
            tab_style(app, app.filters.status == status),
        ));
        spans.push(sep.clone());
    }

    // Right side: due filter and theme
    let theme_icon = match app.theme.mode {
        ThemeMode::Dark => "\u{263E}",
        ThemeMode::Light => "\u{2600}",
    };
    let right: Vec<Span> = vec![
        Span::styled("due: ", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            app.filters.detail.label(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(
            format!("  {} {} ", theme_icon, app.theme.mode),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    let width = area.width as usize;
    let used = spans_width(&spans) + spans_width(&right);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), bg_style));
        spans.extend(right);
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
}

fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

/// Horizontal rule; an applied search shows at its right end
fn render_separator(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let rule_style = Style::default().fg(app.theme.dim).bg(bg);

    let search = &app.filters.search;
    let line = if !search.is_empty() && app.mode != Mode::Search {
        let indicator = unicode::fit_to_width(&format!(" /{} ", search), width / 2);
        let rule = width.saturating_sub(unicode::display_width(&indicator) + 1);
        Line::from(vec![
            Span::styled("\u{2500}".repeat(rule), rule_style),
            Span::styled(indicator, Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled("\u{2500}", rule_style),
        ])
    } else {
        Line::from(Span::styled("\u{2500}".repeat(width), rule_style))
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tabs_show_status_due_filter_and_theme() {
        let (mut app, _tmp) = app_at(&[]);
        app.filters.status = StatusFilter::Active;
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let first = output.lines().next().unwrap();
        assert!(first.starts_with(" \u{25B6} Tasks \u{2502} All \u{2502} Active \u{2502} Completed \u{2502}"));
        assert!(first.ends_with("due: Any date  \u{263E} dark"));
    }

    #[test]
    fn separator_shows_applied_search() {
        let (mut app, _tmp) = app_at(&[]);
        app.filters.search = "milk".into();
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let second = output.lines().nth(1).unwrap();
        assert!(second.ends_with(" /milk \u{2500}"));
    }
}

use crossterm::event::{KeyCode, KeyEvent};

use crate::model::filter::StatusFilter;
use crate::tui::app::{AddPrompt, AddStep, App, Mode, OpenActions};
use crate::tui::text_input::TextInput;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything; ? and Esc close it
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Cursor
        KeyCode::Down | KeyCode::Char('j') => move_cursor(app, 1),
        KeyCode::Up | KeyCode::Char('k') => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.view.len().saturating_sub(1);
        }

        // Task actions
        KeyCode::Char('a') => {
            app.add_prompt = Some(AddPrompt {
                step: AddStep::Text,
                text: String::new(),
                input: TextInput::default(),
            });
            app.mode = Mode::Add;
        }
        KeyCode::Char(' ') | KeyCode::Char('c') => app.toggle_selected(),
        KeyCode::Enter | KeyCode::Char('e') => app.open_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('s') => retry_save(app),

        // Action strips
        KeyCode::Char('o') => toggle_row_actions(app),
        KeyCode::Char('O') => {
            app.open_actions = match app.open_actions {
                OpenActions::All => OpenActions::None,
                _ => OpenActions::All,
            };
        }

        // Filters
        KeyCode::BackTab => {
            // Two steps forward is one step back in a cycle of three
            app.filters.status = app.filters.status.next().next();
        }
        KeyCode::Tab => app.filters.status = app.filters.status.next(),
        KeyCode::Char('1') => app.filters.status = StatusFilter::All,
        KeyCode::Char('2') => app.filters.status = StatusFilter::Active,
        KeyCode::Char('3') => app.filters.status = StatusFilter::Completed,
        KeyCode::Char('f') => app.filters.detail = app.filters.detail.next(),
        KeyCode::Char('/') => {
            app.search_input = TextInput::new(&app.filters.search);
            app.mode = Mode::Search;
        }

        KeyCode::Char('t') => app.toggle_theme(),

        KeyCode::Esc => {
            if app.open_actions != OpenActions::None {
                app.open_actions = OpenActions::None;
            } else if !app.filters.search.is_empty() {
                app.filters.search.clear();
                app.search_input.clear();
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    if app.view.is_empty() {
        return;
    }
    let max = app.view.len() - 1;
    app.cursor = app.cursor.saturating_add_signed(delta).min(max);
}

fn toggle_row_actions(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    app.open_actions = match app.open_actions {
        OpenActions::Row(open) if open == id => OpenActions::None,
        _ => OpenActions::Row(id),
    };
}

fn retry_save(app: &mut App) {
    if !app.store.has_unsaved_changes() {
        app.toast("Nothing to save.");
        return;
    }
    let result = app.store.save();
    app.report(result, "Saved.");
}

use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{AddStep, App, Mode};
use crate::tui::text_input::TextInput;

/// Search prompt: every edit re-filters the list
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Esc => {
            app.search_input.clear();
            app.filters.search.clear();
            app.mode = Mode::Navigate;
        }
        _ => {
            if app.search_input.handle_key(key) {
                app.filters.search = app.search_input.as_str().to_string();
            }
        }
    }
}

/// Add prompt: title, Enter, due date, Enter
pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.add_prompt.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.add_prompt = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => match prompt.step {
            AddStep::Text => {
                if prompt.input.as_str().trim().is_empty() {
                    app.toast_error("Please fill all fields!");
                    return;
                }
                prompt.text = prompt.input.as_str().to_string();
                prompt.input = TextInput::default();
                prompt.step = AddStep::Due;
            }
            AddStep::Due => {
                let text = prompt.text.clone();
                let due = prompt.input.as_str().to_string();
                let result = app.store.add_task(&text, &due);
                if let Some(task) = app.report(result, "Task added!") {
                    app.add_prompt = None;
                    app.mode = Mode::Navigate;
                    app.refresh();
                    if let Some(pos) = app.view.position(task.id) {
                        app.cursor = pos;
                    }
                }
            }
        },
        _ => {
            prompt.input.handle_key(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::super::handle_key;
    use super::super::test_support::*;
    use crate::tui::app::{AddStep, Mode};

    #[test]
    fn search_filters_live_and_esc_clears() {
        let (mut app, _tmp) = app_with(&[("Buy Milk", "2026-10-18"), ("Walk dog", "2026-10-18")]);
        handle_key(&mut app, ch('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "milk");
        assert_eq!(app.filters.search, "milk");
        app.sync_view();
        assert_eq!(app.view.len(), 1);
        assert_eq!(app.view.rows[0].task.text, "Buy Milk");

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.filters.search.is_empty());
        app.sync_view();
        assert_eq!(app.view.len(), 2);
    }

    #[test]
    fn enter_keeps_search() {
        let (mut app, _tmp) = app_with(&[("Buy Milk", "2026-10-18")]);
        handle_key(&mut app, ch('/'));
        type_str(&mut app, "dog");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.filters.search, "dog");
    }

    #[test]
    fn add_prompt_takes_title_then_due() {
        let (mut app, _tmp) = app_with(&[("first", "2026-10-18")]);
        handle_key(&mut app, ch('a'));
        assert_eq!(app.mode, Mode::Add);
        type_str(&mut app, "Buy milk");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.add_prompt.as_ref().unwrap().step, AddStep::Due);
        type_str(&mut app, "2026-10-20 09:00");
        handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.len(), 2);
        let added = &app.store.tasks()[1];
        assert_eq!(added.text, "Buy milk");
        assert_eq!(added.due_date, "2026-10-20T09:00");
        assert_eq!(app.toast.as_ref().unwrap().message, "Task added!");
        assert_eq!(app.selected_id(), Some(added.id));
    }

    #[test]
    fn add_prompt_rejects_empty_fields() {
        let (mut app, _tmp) = app_with(&[]);
        handle_key(&mut app, ch('a'));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.add_prompt.as_ref().unwrap().step, AddStep::Text);
        assert!(app.toast.as_ref().unwrap().is_error);

        type_str(&mut app, "x");
        handle_key(&mut app, press(KeyCode::Enter));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Add);
        assert!(app.store.is_empty());

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.add_prompt.is_none());
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, EditField, EditModal, Mode};
use crate::tui::text_input::TextInput;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let Some(modal) = app.edit_modal.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    // Inline subtask edit takes every key until Enter or Esc
    if let Some(input) = modal.editing_subtask.as_mut() {
        match key.code {
            KeyCode::Esc => modal.editing_subtask = None,
            KeyCode::Enter => {
                let text = input.as_str().to_string();
                let (task_id, index) = (modal.task_id, modal.subtask_cursor);
                let result = app.store.edit_subtask(task_id, index, &text);
                if app.report(result, "Subtask updated.").is_some()
                    && let Some(modal) = app.edit_modal.as_mut()
                {
                    modal.editing_subtask = None;
                }
            }
            _ => {
                input.handle_key(key);
            }
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        save(app);
        return;
    }

    match key.code {
        KeyCode::Esc => close(app),
        KeyCode::Tab => modal.focus = modal.focus.next(),
        KeyCode::BackTab => modal.focus = modal.focus.prev(),
        _ => match modal.focus {
            EditField::Title | EditField::Due => {
                if key.code == KeyCode::Enter {
                    save(app);
                } else {
                    field_input(modal).handle_key(key);
                }
            }
            EditField::Subtasks => handle_subtasks(app, key),
            EditField::NewSubtask => {
                if key.code == KeyCode::Enter {
                    let text = modal.new_subtask.as_str().to_string();
                    let task_id = modal.task_id;
                    let result = app.store.add_subtask(task_id, &text);
                    if let Some(task) = app.report(result, "Subtask added.")
                        && let Some(modal) = app.edit_modal.as_mut()
                    {
                        modal.new_subtask.clear();
                        modal.subtask_cursor = task.subtasks.len() - 1;
                    }
                } else {
                    modal.new_subtask.handle_key(key);
                }
            }
        },
    }
}

fn field_input(modal: &mut EditModal) -> &mut TextInput {
    match modal.focus {
        EditField::Due => &mut modal.due,
        _ => &mut modal.title,
    }
}

fn handle_subtasks(app: &mut App, key: KeyEvent) {
    let Some(modal) = app.edit_modal.as_ref() else {
        return;
    };
    let task_id = modal.task_id;
    let index = modal.subtask_cursor;
    let Some(task) = app.store.get(task_id) else {
        close(app);
        return;
    };
    let len = task.subtasks.len();
    let current = task.subtasks.get(index).cloned();

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => move_subtask_cursor(app, 1, len),
        KeyCode::Up | KeyCode::Char('k') => move_subtask_cursor(app, -1, len),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            let Some(subtask) = current else { return };
            let result = app.store.toggle_subtask(task_id, index, !subtask.done);
            app.report(result, "Subtask updated.");
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            let Some(subtask) = current else { return };
            if let Some(modal) = app.edit_modal.as_mut() {
                modal.editing_subtask = Some(TextInput::new(&subtask.text));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if current.is_none() {
                return;
            }
            let result = app.store.delete_subtask(task_id, index);
            if let Some(task) = app.report(result, "Subtask deleted.")
                && let Some(modal) = app.edit_modal.as_mut()
            {
                modal.subtask_cursor = index.min(task.subtasks.len().saturating_sub(1));
            }
        }
        _ => {}
    }
}

fn move_subtask_cursor(app: &mut App, delta: isize, len: usize) {
    if let Some(modal) = app.edit_modal.as_mut()
        && len > 0
    {
        modal.subtask_cursor = modal
            .subtask_cursor
            .saturating_add_signed(delta)
            .min(len - 1);
    }
}

/// Apply title and due date, then close
fn save(app: &mut App) {
    let Some(modal) = app.edit_modal.as_ref() else {
        return;
    };
    let (task_id, title, due) = (
        modal.task_id,
        modal.title.as_str().to_string(),
        modal.due.as_str().to_string(),
    );
    let result = app.store.update_task(task_id, &title, &due);
    if app.report(result, "Task updated!").is_some() {
        close(app);
    }
}

fn close(app: &mut App) {
    app.edit_modal = None;
    app.mode = Mode::Navigate;
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::super::handle_key;
    use super::super::test_support::*;
    use crate::tui::app::{EditField, Mode};

    fn focus(app: &mut crate::tui::app::App, field: EditField) {
        while app.edit_modal.as_ref().unwrap().focus != field {
            handle_key(app, press(KeyCode::Tab));
        }
    }

    #[test]
    fn enter_saves_title_and_due() {
        let (mut app, _tmp) = app_with(&[("Buy milk", "2026-10-18")]);
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);

        type_str(&mut app, " and eggs");
        focus(&mut app, EditField::Due);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_str(&mut app, "2026-10-19T08:15");
        handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.edit_modal.is_none());
        let task = &app.store.tasks()[0];
        assert_eq!(task.text, "Buy milk and eggs");
        assert_eq!(task.due_date, "2026-10-19T08:15");
        assert_eq!(app.toast.as_ref().unwrap().message, "Task updated!");
    }

    #[test]
    fn invalid_edit_keeps_modal_open() {
        let (mut app, _tmp) = app_with(&[("Buy milk", "2026-10-18")]);
        handle_key(&mut app, ch('e'));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);
        assert!(app.toast.as_ref().unwrap().is_error);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn esc_discards_title_changes() {
        let (mut app, _tmp) = app_with(&[("Buy milk", "2026-10-18")]);
        handle_key(&mut app, ch('e'));
        type_str(&mut app, "!!!");
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn subtasks_are_added_toggled_edited_and_deleted() {
        let (mut app, _tmp) = app_with(&[("Trip", "2026-10-18")]);
        handle_key(&mut app, ch('e'));
        focus(&mut app, EditField::NewSubtask);
        type_str(&mut app, "passport");
        handle_key(&mut app, press(KeyCode::Enter));
        type_str(&mut app, "tickets");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.store.tasks()[0].subtasks.len(), 2);
        assert!(app.edit_modal.as_ref().unwrap().new_subtask.as_str().is_empty());

        focus(&mut app, EditField::Subtasks);
        handle_key(&mut app, ch('k'));
        handle_key(&mut app, ch(' '));
        assert!(app.store.tasks()[0].subtasks[0].done);

        handle_key(&mut app, ch('e'));
        type_str(&mut app, " + visa");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.store.tasks()[0].subtasks[0].text, "passport + visa");
        assert!(app.edit_modal.as_ref().unwrap().editing_subtask.is_none());

        handle_key(&mut app, ch('d'));
        let subtasks = &app.store.tasks()[0].subtasks;
        assert_eq!(subtasks.len(), 1);
        assert_eq!(subtasks[0].text, "tickets");
        assert_eq!(app.edit_modal.as_ref().unwrap().subtask_cursor, 0);
    }

    #[test]
    fn esc_cancels_inline_subtask_edit_first() {
        let (mut app, _tmp) = app_with(&[("Trip", "2026-10-18")]);
        let id = app.store.tasks()[0].id;
        app.store.add_subtask(id, "passport").unwrap();
        handle_key(&mut app, ch('e'));
        focus(&mut app, EditField::Subtasks);
        handle_key(&mut app, ch('e'));
        type_str(&mut app, "zzz");
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.store.tasks()[0].subtasks[0].text, "passport");
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode;

/// Single-line editable text with a byte-offset cursor on a grapheme boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub buffer: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(text: &str) -> Self {
        TextInput {
            buffer: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Text before the cursor, for placing the terminal cursor
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.cursor]
    }

    pub fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Apply an editing key. Returns false for keys that are not edits, so
    /// the caller can handle Enter, Esc, Tab and the like.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => self.delete_word(),
            KeyCode::Backspace if alt => self.delete_word(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.buffer.len(),
            KeyCode::Char(c) if !ctrl && !alt => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp));
            }
            KeyCode::Backspace => {
                if let Some(prev) = unicode::prev_boundary(&self.buffer, self.cursor) {
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if let Some(next) = unicode::next_boundary(&self.buffer, self.cursor) {
                    self.buffer.drain(self.cursor..next);
                }
            }
            KeyCode::Left => {
                if let Some(prev) = unicode::prev_boundary(&self.buffer, self.cursor) {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = unicode::next_boundary(&self.buffer, self.cursor) {
                    self.cursor = next;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => return false,
        }
        true
    }

    fn delete_word(&mut self) {
        let start = unicode::word_start_before(&self.buffer, self.cursor);
        self.buffer.drain(start..self.cursor);
        self.cursor = start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn typed(s: &str) -> TextInput {
        let mut input = TextInput::default();
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input
    }

    #[test]
    fn typing_and_backspace() {
        let mut input = typed("milk");
        assert_eq!(input.as_str(), "milk");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.as_str(), "mil");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn cursor_movement_and_insert() {
        let mut input = typed("bk");
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('o')));
        input.handle_key(key(KeyCode::Char('o')));
        assert_eq!(input.as_str(), "book");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.as_str(), "ook");
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut input = TextInput::new("cafe\u{301}");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.as_str(), "caf");
    }

    #[test]
    fn ctrl_shortcuts() {
        let mut input = typed("buy some milk");
        input.handle_key(ctrl('w'));
        assert_eq!(input.as_str(), "buy some ");
        input.handle_key(ctrl('u'));
        assert_eq!(input.as_str(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn non_edit_keys_are_passed_through() {
        let mut input = typed("x");
        assert!(!input.handle_key(key(KeyCode::Enter)));
        assert!(!input.handle_key(key(KeyCode::Esc)));
        assert!(!input.handle_key(key(KeyCode::Tab)));
        assert_eq!(input.as_str(), "x");
    }
}

//! Single-line text input with cursor management.
//!
//! Used by the panel forms for the attachment path, the core plot and the
//! custom revision request. Cursor positions are byte offsets kept on
//! char boundaries, so CJK input is safe.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::tui::theme;

#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and put the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len())
    }

    /// Apply an editing key. Returns `true` if the content changed.
    ///
    /// Cursor keys are applied too but report no change. Keys with Ctrl
    /// or Alt held are left to the caller.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                let before = self.content.len();
                self.backspace();
                before != self.content.len()
            }
            KeyCode::Delete => {
                let before = self.content.len();
                self.delete();
                before != self.content.len()
            }
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.move_home();
                false
            }
            KeyCode::End => {
                self.move_end();
                false
            }
            _ => false,
        }
    }

    /// Whether `key` is one [`handle_key`](Self::handle_key) acts on.
    pub fn is_edit_key(key: &KeyEvent) -> bool {
        !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            && matches!(
                key.code,
                KeyCode::Char(_)
                    | KeyCode::Backspace
                    | KeyCode::Delete
                    | KeyCode::Left
                    | KeyCode::Right
                    | KeyCode::Home
                    | KeyCode::End
            )
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Render as a line: the placeholder when empty, and a block cursor when focused.
    pub fn to_line(&self, placeholder: &str, focused: bool) -> Line<'static> {
        if self.content.is_empty() && !focused {
            return Line::from(Span::styled(placeholder.to_string(), theme::dim()));
        }
        let (before, after) = self.content.split_at(self.cursor);
        let mut spans = vec![Span::styled(before.to_string(), Style::default().fg(theme::TEXT))];
        if focused {
            let mut rest = after.chars();
            let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
            spans.push(Span::styled(under, Style::default().fg(theme::BG_BASE).bg(theme::PRIMARY)));
            spans.push(Span::styled(rest.as_str().to_string(), Style::default().fg(theme::TEXT)));
        } else {
            spans.push(Span::styled(after.to_string(), Style::default().fg(theme::TEXT)));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_cursor() {
        let mut buf = InputBuffer::new();
        buf.insert_char('核');
        buf.insert_char('心');
        assert_eq!(buf.text(), "核心");
        assert_eq!(buf.cursor_position(), "核心".len());
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut buf = InputBuffer::new();
        buf.set_text("甜宠a");
        buf.backspace();
        buf.backspace();
        assert_eq!(buf.text(), "甜");
        assert_eq!(buf.cursor_position(), "甜".len());
    }

    #[test]
    fn test_movement_and_delete() {
        let mut buf = InputBuffer::new();
        buf.set_text("abc");
        buf.move_home();
        assert_eq!(buf.cursor_position(), 0);
        buf.move_right();
        buf.delete();
        assert_eq!(buf.text(), "ac");
        buf.move_end();
        assert_eq!(buf.cursor_position(), 2);
    }

    #[test]
    fn test_handle_key_reports_changes() {
        let mut buf = InputBuffer::new();
        assert!(buf.handle_key(&key(KeyCode::Char('x'))));
        assert!(!buf.handle_key(&key(KeyCode::Left)));
        assert!(!buf.handle_key(&key(KeyCode::Backspace)));
        assert!(buf.handle_key(&key(KeyCode::Delete)));
        assert!(buf.text().is_empty());
        let ctrl = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!buf.handle_key(&ctrl));
        assert!(!InputBuffer::is_edit_key(&ctrl));
    }

    #[test]
    fn test_take_resets() {
        let mut buf = InputBuffer::new();
        buf.insert_char('x');
        assert_eq!(buf.take(), "x");
        assert!(buf.text().is_empty());
        assert_eq!(buf.cursor_position(), 0);
    }

    #[test]
    fn test_is_empty_trims() {
        let mut buf = InputBuffer::new();
        assert!(buf.is_empty());
        buf.insert_char(' ');
        assert!(buf.is_empty());
        buf.insert_char('a');
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_placeholder_when_empty_and_unfocused() {
        let buf = InputBuffer::new();
        let line = buf.to_line("例如：请让女主的性格更活泼一点...", false);
        assert_eq!(line.spans.len(), 1);
        assert!(line.spans[0].content.starts_with("例如"));
    }
}

//! Main text pane: the active chapter's draft in a `TextArea`.
//!
//! While the refiner panel is open the pane is read-only: the draft is
//! shown wrapped and only scrolls; edits are dropped.

use std::cell::Cell;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use ratatui_textarea::TextArea;

use super::max_scroll;
use crate::core::document::{self, Document};
use crate::tui::theme;

/// What an input did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorInput {
    Ignored,
    Moved,
    Edited,
}

pub struct EditorView {
    textarea: TextArea<'static>,
    chapter_id: u32,
    /// Scroll offset of the read-only view.
    scroll: u16,
    /// Read-only ceiling measured by the last render.
    max_scroll: Cell<Option<u16>>,
}

impl EditorView {
    pub fn new(document: &Document) -> Self {
        let mut view = Self {
            textarea: TextArea::default(),
            chapter_id: document.active_id(),
            scroll: 0,
            max_scroll: Cell::new(None),
        };
        view.load(document);
        view
    }

    /// Replace the buffer with the document's active draft.
    pub fn load(&mut self, document: &Document) {
        let lines: Vec<String> = document.text().split('\n').map(str::to_string).collect();
        let mut textarea = TextArea::new(lines);
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("开始写作...");
        textarea.set_placeholder_style(theme::dim());
        self.textarea = textarea;
        self.chapter_id = document.active_id();
        self.scroll = 0;
        self.max_scroll.set(None);
        self.set_focused(false);
    }

    pub fn chapter_id(&self) -> u32 {
        self.chapter_id
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_focused(&mut self, focused: bool) {
        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    pub fn handle_input(&mut self, event: &Event, read_only: bool) -> EditorInput {
        let Event::Key(key) = event else {
            return EditorInput::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return EditorInput::Ignored;
        }
        if read_only {
            self.scroll = match key.code {
                KeyCode::Up => self.scroll.saturating_sub(1),
                KeyCode::Down => self.scroll.saturating_add(1),
                KeyCode::PageUp => self.scroll.saturating_sub(10),
                KeyCode::PageDown => self.scroll.saturating_add(10),
                KeyCode::Home => 0,
                _ => return EditorInput::Ignored,
            };
            if let Some(max) = self.max_scroll.get() {
                self.scroll = self.scroll.min(max);
            }
            return EditorInput::Moved;
        }
        if self.textarea.input(event.clone()) {
            EditorInput::Edited
        } else {
            EditorInput::Moved
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, read_only: bool) {
        let text = self.text();
        let mut title = vec![
            Span::styled(" 原始文本 ", theme::heading()),
            Span::styled(
                format!("{} 字 ", document::word_count(&text)),
                theme::muted(),
            ),
        ];
        if read_only {
            title.push(Span::styled(" 只读 ", theme::locked_badge()));
            title.push(Span::raw(" "));
        }

        let border = if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::from(title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if read_only {
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(theme::TEXT_MUTED))
                .wrap(Wrap { trim: false });
            let max = max_scroll(&paragraph, inner);
            self.max_scroll.set(Some(max));
            frame.render_widget(paragraph.scroll((self.scroll.min(max), 0)), inner);
        } else {
            frame.render_widget(&self.textarea, inner);
        }
    }
}

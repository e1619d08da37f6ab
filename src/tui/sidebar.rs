//! Collapsible left sidebar listing the chapters of the book.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::layout::SidebarVisibility;
use super::theme;
use crate::core::chapters::{self, Chapter, BOOK_TITLE, VOLUME_TITLE};

/// Sidebar navigation state.
pub struct SidebarState {
    /// Whether the user has toggled collapse (Ctrl+B).
    pub user_collapsed: bool,
    /// Highlighted row (index into the catalog).
    pub selected: usize,
}

impl SidebarState {
    pub fn new() -> Self {
        let mut state = Self {
            user_collapsed: false,
            selected: 0,
        };
        state.sync_to_chapter(chapters::INITIAL_ACTIVE_CHAPTER);
        state
    }

    pub fn toggle_collapse(&mut self) {
        self.user_collapsed = !self.user_collapsed;
    }

    pub fn select_next(&mut self) {
        let len = chapters::catalog().len();
        self.selected = (self.selected + 1) % len;
    }

    pub fn select_prev(&mut self) {
        let len = chapters::catalog().len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn selected_chapter(&self) -> Option<&'static Chapter> {
        chapters::catalog().get(self.selected)
    }

    /// Move the highlight onto `id` (e.g., after the editor switched chapter).
    pub fn sync_to_chapter(&mut self, id: u32) {
        if let Some(idx) = chapters::catalog().iter().position(|c| c.id == id) {
            self.selected = idx;
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        visibility: SidebarVisibility,
        active_id: u32,
        focused: bool,
    ) {
        match visibility {
            SidebarVisibility::Hidden => {}
            SidebarVisibility::Collapsed => self.render_collapsed(frame, area, active_id, focused),
            SidebarVisibility::Expanded => self.render_expanded(frame, area, active_id, focused),
        }
    }

    fn row_style(&self, idx: usize, chapter: &Chapter, active_id: u32, focused: bool) -> (&'static str, Style) {
        let is_active = chapter.id == active_id;
        let is_selected = focused && idx == self.selected;
        match (is_selected, is_active) {
            (true, true) => ("▸ ", theme::highlight()),
            (true, false) => (
                "▸ ",
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
            (false, true) => ("┃ ", theme::highlight()),
            (false, false) => ("  ", theme::muted()),
        }
    }

    fn render_collapsed(&self, frame: &mut Frame, area: Rect, active_id: u32, focused: bool) {
        let lines: Vec<Line> = chapters::catalog()
            .iter()
            .enumerate()
            .take(area.height as usize)
            .map(|(idx, chapter)| {
                let (_, style) = self.row_style(idx, chapter, active_id, focused);
                Line::from(Span::styled(format!(" {:>2}", chapter.id), style))
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }

    fn render_expanded(&self, frame: &mut Frame, area: Rect, active_id: u32, focused: bool) {
        let width = area.width as usize;
        let mut lines: Vec<Line> = vec![
            Line::from(vec![
                Span::styled(" 作品管理 ", theme::muted()),
                Span::styled(BOOK_TITLE, theme::heading()),
            ]),
            Line::raw(""),
            Line::from(Span::styled(
                format!(" ▾ {VOLUME_TITLE}"),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        for (idx, chapter) in chapters::catalog().iter().enumerate() {
            let (prefix, style) = self.row_style(idx, chapter, active_id, focused);
            let count = chapter.word_count.to_string();
            let label = format!("{prefix}{}", chapter.title);
            let used = display_width(&label) + count.len() + 1;
            let pad = width.saturating_sub(used);
            lines.push(Line::from(vec![
                Span::styled(label, style),
                Span::raw(" ".repeat(pad)),
                Span::styled(count, theme::dim()),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!(" 共 {}字", chapters::total_word_count()),
            theme::dim(),
        )));

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }
}

/// Terminal columns taken by `s`; CJK characters are double-width.
pub fn display_width(s: &str) -> usize {
    Span::raw(s).width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_selection_is_active_chapter() {
        let state = SidebarState::new();
        assert!(!state.user_collapsed);
        assert_eq!(state.selected_chapter().map(|c| c.id), Some(6));
    }

    #[test]
    fn test_select_next_wraps() {
        let mut state = SidebarState::new();
        state.select_next();
        assert_eq!(state.selected_chapter().map(|c| c.id), Some(1));
    }

    #[test]
    fn test_select_prev_wraps() {
        let mut state = SidebarState::new();
        state.sync_to_chapter(1);
        state.select_prev();
        assert_eq!(state.selected_chapter().map(|c| c.id), Some(6));
    }

    #[test]
    fn test_toggle_collapse() {
        let mut state = SidebarState::new();
        state.toggle_collapse();
        assert!(state.user_collapsed);
        state.toggle_collapse();
        assert!(!state.user_collapsed);
    }

    #[test]
    fn test_sync_ignores_unknown_id() {
        let mut state = SidebarState::new();
        state.sync_to_chapter(3);
        state.sync_to_chapter(42);
        assert_eq!(state.selected_chapter().map(|c| c.id), Some(3));
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("ab"), 2);
        assert_eq!(display_width("第一章"), 6);
        assert_eq!(display_width("第一章 云端"), 11);
    }
}

//! VIP editor connection modal.
//!
//! Opened from the audit form. The chosen editor survives closing the
//! modal; confirming only produces a notification.

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::vip::{PlatformEditor, VipRequest};
use crate::tui::app::centered_rect;
use crate::tui::theme;

/// Result of a key press inside the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VipOutcome {
    Consumed,
    Closed,
    /// Request submitted; carries the message to show.
    Confirmed(&'static str),
}

#[derive(Default)]
pub struct VipModalState {
    open: bool,
    request: VipRequest,
}

impl VipModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn preference(&self) -> PlatformEditor {
        self.request.preference
    }

    pub fn handle_input(&mut self, event: &Event) -> VipOutcome {
        let Event::Key(key) = event else {
            return VipOutcome::Consumed;
        };
        if key.kind != KeyEventKind::Press {
            return VipOutcome::Consumed;
        }
        match key.code {
            KeyCode::Esc => {
                self.close();
                VipOutcome::Closed
            }
            KeyCode::Up => {
                self.request.preference = self.request.preference.prev();
                VipOutcome::Consumed
            }
            KeyCode::Down => {
                self.request.preference = self.request.preference.next();
                VipOutcome::Consumed
            }
            KeyCode::Enter => {
                let message = self.request.confirm();
                self.close();
                VipOutcome::Confirmed(message)
            }
            _ => VipOutcome::Consumed,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(50, 60, area);
        frame.render_widget(Clear, modal);

        let mut lines = vec![
            Line::from(Span::styled("为您匹配到以下在线编辑，请选择：", theme::heading())),
            Line::raw(""),
        ];
        for editor in PlatformEditor::ALL {
            let chosen = editor == self.request.preference;
            let (radio, style) = if chosen {
                ("◉ ", Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
            } else {
                ("○ ", Style::default().fg(theme::TEXT))
            };
            lines.push(Line::from(vec![
                Span::styled(radio, style),
                Span::styled(editor.name(), style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", editor.specialty()),
                theme::muted(),
            )));
        }
        lines.push(Line::raw(""));
        lines.push(
            Line::from(Span::styled(
                "  确认连线 (当前排队: 1人)  ",
                Style::default()
                    .fg(theme::BG_BASE)
                    .bg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        );
        lines.push(
            Line::from(vec![
                Span::styled("↑/↓", theme::key_hint()),
                Span::styled(" 选择  ", theme::muted()),
                Span::styled("Enter", theme::key_hint()),
                Span::styled(" 确认  ", theme::muted()),
                Span::styled("Esc", theme::key_hint()),
                Span::styled(" 关闭", theme::muted()),
            ])
            .alignment(Alignment::Center),
        );

        let block = Block::default()
            .title(" 👑 专属人工编辑连线 ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::BG_BASE));
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vip::CONFIRMATION;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_choose_and_confirm() {
        let mut modal = VipModalState::new();
        modal.open();
        modal.handle_input(&press(KeyCode::Down));
        assert_eq!(modal.preference(), PlatformEditor::Zhihu);
        assert_eq!(modal.handle_input(&press(KeyCode::Enter)), VipOutcome::Confirmed(CONFIRMATION));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_preference_survives_close() {
        let mut modal = VipModalState::new();
        modal.open();
        modal.handle_input(&press(KeyCode::Up));
        assert_eq!(modal.handle_input(&press(KeyCode::Esc)), VipOutcome::Closed);
        modal.open();
        assert_eq!(modal.preference(), PlatformEditor::Qidian);
    }
}

//! Revision result (wizard step 3): stat gauges, change cards and the diff.

use std::cell::Cell;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{max_scroll, PanelOutcome};
use crate::core::revision::{ChangeKind, FinalRevision, SegmentKind};
use crate::tui::events::Action;
use crate::tui::theme;
use crate::tui::widgets::progress;

const GAUGE_WIDTH: usize = 30;

#[derive(Default)]
pub struct RevisionResultView {
    scroll: u16,
    /// Ceiling measured by the last render; `None` before the first one.
    max_scroll: Cell<Option<u16>>,
}

impl RevisionResultView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
        self.max_scroll.set(None);
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// `Enter` accepts, `b`/`Backspace` goes back to the report, `Esc`
    /// cancels; arrows and paging scroll.
    pub fn handle_input(&mut self, event: &Event) -> PanelOutcome {
        let Event::Key(key) = event else {
            return PanelOutcome::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return PanelOutcome::Ignored;
        }
        match key.code {
            KeyCode::Enter => return PanelOutcome::Action(Action::AcceptRevision),
            KeyCode::Char('b') | KeyCode::Backspace => {
                return PanelOutcome::Action(Action::BackToReport);
            }
            KeyCode::Esc => return PanelOutcome::Action(Action::CancelRevision),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Home => self.scroll = 0,
            _ => return PanelOutcome::Ignored,
        }
        if let Some(max) = self.max_scroll.get() {
            self.scroll = self.scroll.min(max);
        }
        PanelOutcome::Consumed
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, revision: Option<&FinalRevision>) {
        let lines = match revision {
            Some(revision) => result_lines(revision),
            None => vec![Line::from(Span::styled("未找到修改结果。", theme::muted()))],
        };
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let max = max_scroll(&paragraph, area);
        self.max_scroll.set(Some(max));
        frame.render_widget(paragraph.scroll((self.scroll.min(max), 0)), area);
    }
}

fn change_icon(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Logic => "🔧",
        ChangeKind::Character | ChangeKind::Pacing => "⚡",
    }
}

pub fn result_lines(revision: &FinalRevision) -> Vec<Line<'static>> {
    let stats = revision.stats;
    let mut lines = vec![
        Line::from(Span::styled(
            "✅ 改稿完成",
            Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("已完成逻辑优化与文字润色，请查看修改详情。", theme::muted())),
        Line::raw(""),
        Line::from(Span::styled("📈 质量指标对比", theme::heading())),
    ];
    for (label, pair, color) in [
        ("剧情逻辑", stats.logic, theme::STAT_LOGIC),
        ("阅读期待", stats.expectation, theme::STAT_EXPECTATION),
        ("节奏把控", stats.pacing, theme::STAT_PACING),
    ] {
        lines.extend(progress::comparison_bar(label, pair.before, pair.after, GAUGE_WIDTH, color));
    }
    lines.push(Line::raw(""));

    lines.push(Line::from(Span::styled("🛠️ 主要修改点", theme::heading())));
    for card in &revision.changes {
        let color = theme::change_color(card.kind);
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", change_icon(card.kind))),
            Span::styled(card.title.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("   {}", card.before), theme::dim()),
            Span::styled(" ➔ ", theme::muted()),
            Span::styled(card.after.clone(), Style::default().fg(color)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", card.description),
            theme::muted(),
        )));
    }
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("📝 修改对比   ", theme::heading()),
        Span::styled("■", Style::default().fg(theme::BG_REVISED)),
        Span::styled(" 修改处  ", theme::dim()),
        Span::styled("■", Style::default().fg(theme::INFO)),
        Span::styled(" 修改说明", theme::dim()),
    ]));
    for segment in &revision.revised_text {
        let style = match segment.kind {
            SegmentKind::Original => Style::default().fg(theme::TEXT_MUTED),
            SegmentKind::Revised => theme::revised_text(),
        };
        for text in segment.content.split('\n') {
            lines.push(Line::from(Span::styled(text.to_string(), style)));
        }
        if let Some(reason) = &segment.reason {
            lines.push(Line::from(vec![
                Span::styled("💡 修改说明: ", Style::default().fg(theme::INFO).add_modifier(Modifier::BOLD)),
                Span::styled(reason.clone(), Style::default().fg(theme::INFO)),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_keys_map_to_actions() {
        let mut view = RevisionResultView::new();
        assert_eq!(view.handle_input(&press(KeyCode::Enter)), PanelOutcome::Action(Action::AcceptRevision));
        assert_eq!(view.handle_input(&press(KeyCode::Char('b'))), PanelOutcome::Action(Action::BackToReport));
        assert_eq!(view.handle_input(&press(KeyCode::Esc)), PanelOutcome::Action(Action::CancelRevision));
        assert_eq!(view.handle_input(&press(KeyCode::Char('x'))), PanelOutcome::Ignored);
    }

    #[test]
    fn test_scrolling() {
        let mut view = RevisionResultView::new();
        view.handle_input(&press(KeyCode::PageDown));
        view.handle_input(&press(KeyCode::Up));
        assert_eq!(view.scroll(), 9);
        view.reset();
        assert_eq!(view.scroll(), 0);
    }

    #[test]
    fn test_paging_past_the_end_keeps_diff_visible() {
        let revision = FinalRevision::mock();
        let mut view = RevisionResultView::new();
        for _ in 0..30 {
            view.handle_input(&press(KeyCode::PageDown));
        }

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area(), Some(&revision)))
            .unwrap();
        let visible = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count();
        assert!(visible > 0);

        // The stored offset settles at the measured ceiling, so one Up moves the view.
        view.handle_input(&press(KeyCode::PageDown));
        let ceiling = view.scroll();
        assert!(ceiling < 300);
        view.handle_input(&press(KeyCode::Up));
        assert_eq!(view.scroll(), ceiling.saturating_sub(1));
    }

    #[test]
    fn test_every_reason_is_listed() {
        let revision = FinalRevision::mock();
        let lines = result_lines(&revision);
        let reasons = lines
            .iter()
            .filter(|l| l.spans.first().is_some_and(|s| s.content.starts_with("💡 修改说明")))
            .count();
        assert_eq!(reasons, revision.revised_segments().count());
    }

    #[test]
    fn test_gains_shown() {
        let text: String = result_lines(&FinalRevision::mock())
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("(+43)"));
        assert!(text.contains("(+35)"));
        assert!(text.contains("(+34)"));
    }
}

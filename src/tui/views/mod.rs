//! Views: the editor pane, the refiner panel and its stages, and the VIP modal.

pub mod audit_form;
pub mod editor;
pub mod panel;
pub mod pipeline;
pub mod report;
pub mod revision_result;
pub mod revision_setup;
pub mod vip_modal;

use ratatui::{layout::Rect, widgets::Paragraph};

use super::events::{Action, NotificationLevel};

/// What a panel view did with an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    /// Not handled; the app may apply its global bindings.
    Ignored,
    /// Handled; nothing further to do.
    Consumed,
    /// Handled; the app should run this action.
    Action(Action),
    /// Handled; show a notification.
    Notify(String, NotificationLevel),
}

/// Line offset that keeps `focus_line` visible in a viewport of `height` rows.
pub fn scroll_to_show(focus_line: usize, height: u16, lead: usize) -> u16 {
    let height = usize::from(height);
    let wanted = (focus_line + lead + 1).saturating_sub(height);
    u16::try_from(wanted).unwrap_or(u16::MAX)
}

/// Largest scroll offset that still leaves the last wrapped row of
/// `paragraph` on the bottom row of `area`.
pub fn max_scroll(paragraph: &Paragraph<'_>, area: Rect) -> u16 {
    let total = paragraph.line_count(area.width);
    let wanted = total.saturating_sub(usize::from(area.height));
    u16::try_from(wanted).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{text::Line, widgets::Wrap};

    #[test]
    fn test_scroll_to_show() {
        assert_eq!(scroll_to_show(0, 10, 0), 0);
        assert_eq!(scroll_to_show(9, 10, 0), 0);
        assert_eq!(scroll_to_show(10, 10, 0), 1);
        assert_eq!(scroll_to_show(10, 10, 3), 4);
    }

    #[test]
    fn test_max_scroll_counts_wrapped_rows() {
        let area = Rect::new(0, 0, 10, 5);
        let short = Paragraph::new(vec![Line::raw("a"), Line::raw("b")]).wrap(Wrap { trim: false });
        assert_eq!(max_scroll(&short, area), 0);

        let tall: Vec<Line> = (0..20).map(|i| Line::raw(i.to_string())).collect();
        let tall = Paragraph::new(tall).wrap(Wrap { trim: false });
        assert_eq!(max_scroll(&tall, area), 15);

        let wrapped = Paragraph::new(vec![Line::raw("a".repeat(25)); 3]).wrap(Wrap { trim: false });
        assert_eq!(max_scroll(&wrapped, area), 4);
    }
}

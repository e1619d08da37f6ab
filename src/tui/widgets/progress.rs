//! Text progress bars for the pipeline visualizer and the revision stats.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::tui::theme;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Number of filled cells for `percent` over `width` cells.
pub fn filled_cells(percent: u8, width: usize) -> usize {
    (usize::from(percent.min(100)) * width + 50) / 100
}

/// A `width`-cell bar filled to `percent`.
pub fn bar(percent: u8, width: usize, color: Color) -> Vec<Span<'static>> {
    let filled = filled_cells(percent, width);
    vec![
        Span::styled(FILLED.to_string().repeat(filled), Style::default().fg(color)),
        Span::styled(EMPTY.to_string().repeat(width - filled), theme::dim()),
    ]
}

/// `label ████░░░ 42%`
pub fn labelled_bar(label: &str, percent: u8, width: usize, color: Color) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("{label} "), theme::muted())];
    spans.extend(bar(percent, width, color));
    spans.push(Span::styled(format!(" {percent:>3}%"), Style::default().fg(color)));
    Line::from(spans)
}

/// Before/after bar: the `before` share dim, the gain in `color`.
///
/// `剧情逻辑  55 → 98 (+43)` followed by the bar on the next line.
pub fn comparison_bar(label: &str, before: u8, after: u8, width: usize, color: Color) -> Vec<Line<'static>> {
    let before_cells = filled_cells(before, width);
    let after_cells = filled_cells(after, width).max(before_cells);
    let gain = i16::from(after) - i16::from(before);
    vec![
        Line::from(vec![
            Span::styled(format!("{label}  "), theme::heading()),
            Span::styled(format!("{before}"), theme::muted()),
            Span::raw(" → "),
            Span::styled(format!("{after}"), Style::default().fg(color)),
            Span::styled(format!(" ({gain:+})"), Style::default().fg(theme::SUCCESS)),
        ]),
        Line::from(vec![
            Span::styled(FILLED.to_string().repeat(before_cells), theme::muted()),
            Span::styled(
                FILLED.to_string().repeat(after_cells - before_cells),
                Style::default().fg(color),
            ),
            Span::styled(EMPTY.to_string().repeat(width - after_cells), theme::dim()),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_of(spans: &[Span]) -> usize {
        spans.iter().map(|s| s.content.chars().count()).sum()
    }

    #[test]
    fn test_filled_cells_bounds() {
        assert_eq!(filled_cells(0, 20), 0);
        assert_eq!(filled_cells(100, 20), 20);
        assert_eq!(filled_cells(50, 20), 10);
        assert_eq!(filled_cells(255, 20), 20);
    }

    #[test]
    fn test_bar_keeps_width() {
        for p in [0u8, 7, 33, 99, 100] {
            assert_eq!(width_of(&bar(p, 24, theme::PRIMARY)), 24);
        }
    }

    #[test]
    fn test_comparison_bar_shows_gain() {
        let lines = comparison_bar("剧情逻辑", 55, 98, 30, theme::STAT_LOGIC);
        let header: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(header.contains("(+43)"));
        assert_eq!(width_of(&lines[1].spans), 30);
    }
}

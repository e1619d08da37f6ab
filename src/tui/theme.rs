//! Ink & Amber color theme for the editor.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};

use crate::core::report::Severity;
use crate::core::revision::ChangeKind;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Amber: active chapter, focused borders, primary buttons.
pub const PRIMARY: Color = Color::Rgb(0xF4, 0xA2, 0x61);
/// Light amber: hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xF6, 0xBD, 0x60);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Violet: VIP offer and modal.
pub const ACCENT: Color = Color::Rgb(0x9B, 0x5D, 0xE5);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Ink: base background.
pub const BG_BASE: Color = Color::Rgb(0x1B, 0x1B, 0x1F);
/// Surface: sidebar, panel.
pub const BG_SURFACE: Color = Color::Rgb(0x26, 0x26, 0x2C);
/// Revised segment background in the diff.
pub const BG_REVISED: Color = Color::Rgb(0x1E, 0x3A, 0x2B);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE6, 0xE1, 0xD6);
pub const TEXT_MUTED: Color = Color::Rgb(0x9C, 0x97, 0x8C);
pub const TEXT_DIM: Color = Color::Rgb(0x5C, 0x59, 0x54);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x44, 0x44);
pub const SUCCESS: Color = Color::Rgb(0x10, 0xB9, 0x81);
pub const WARNING: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
pub const INFO: Color = Color::Rgb(0x3B, 0x82, 0xF6);

// ── Domain ──────────────────────────────────────────────────────────────────

/// Reader emotion curve.
pub const CURVE: Color = Color::Rgb(0xF4, 0xA2, 0x61);
/// Platform baseline curve.
pub const BASELINE: Color = Color::Rgb(0x6B, 0x72, 0x80);

/// Revision stat gauges.
pub const STAT_LOGIC: Color = SUCCESS;
pub const STAT_EXPECTATION: Color = WARNING;
pub const STAT_PACING: Color = INFO;

/// Tag color of a change card.
pub fn change_color(kind: ChangeKind) -> Color {
    match kind {
        ChangeKind::Logic => SUCCESS,
        ChangeKind::Character => ACCENT,
        ChangeKind::Pacing => INFO,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Severe => ERROR,
        Severity::Moderate => WARNING,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Bold accent text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Read-only badge shown while the panel locks the editor.
pub fn locked_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(TEXT_MUTED)
        .add_modifier(Modifier::BOLD)
}

/// Primary call-to-action button.
pub fn button(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BG_BASE)
            .bg(PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    }
}

/// Rewritten text in the diff.
pub fn revised_text() -> Style {
    Style::default().fg(TEXT).bg(BG_REVISED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_helpers_return_non_default() {
        assert_ne!(title(), Style::default());
        assert_ne!(heading(), Style::default());
        assert_ne!(highlight(), Style::default());
        assert_ne!(muted(), Style::default());
        assert_ne!(button(true), button(false));
    }

    #[test]
    fn test_semantic_colors_are_distinct() {
        assert_ne!(change_color(ChangeKind::Logic), change_color(ChangeKind::Character));
        assert_ne!(severity_color(Severity::Severe), severity_color(Severity::Moderate));
    }
}

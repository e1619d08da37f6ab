//! Root layout: chapter sidebar, toolbar, editor, refiner panel, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the expanded sidebar (titles and word counts).
pub const SIDEBAR_EXPANDED_WIDTH: u16 = 28;
/// Width of the collapsed sidebar (chapter numbers only).
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 4;
/// Auto-collapse sidebar below this terminal width.
pub const AUTO_COLLAPSE_THRESHOLD: u16 = 90;
/// Hide sidebar entirely below this terminal width.
pub const HIDE_SIDEBAR_THRESHOLD: u16 = 40;
/// Height of the toolbar row.
pub const TOOLBAR_HEIGHT: u16 = 1;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Sidebar area (None if hidden).
    pub sidebar: Option<Rect>,
    pub toolbar: Rect,
    pub editor: Rect,
    /// Refiner panel (None while closed).
    pub panel: Option<Rect>,
    /// Status bar (bottom row).
    pub status: Rect,
}

/// Sidebar visibility state derived from terminal width and user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVisibility {
    Expanded,
    Collapsed,
    Hidden,
}

impl AppLayout {
    /// Compute layout regions from the terminal area.
    ///
    /// `user_collapsed`: user has toggled collapse with Ctrl+B.
    /// `panel_open`: the refiner panel takes the right half of the work area.
    pub fn compute(area: Rect, user_collapsed: bool, panel_open: bool) -> (Self, SidebarVisibility) {
        let visibility = if area.width < HIDE_SIDEBAR_THRESHOLD {
            SidebarVisibility::Hidden
        } else if user_collapsed || area.width < AUTO_COLLAPSE_THRESHOLD {
            SidebarVisibility::Collapsed
        } else {
            SidebarVisibility::Expanded
        };

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        let content_area = rows[0];
        let status = rows[1];

        let (sidebar, work) = match visibility {
            SidebarVisibility::Hidden => (None, content_area),
            SidebarVisibility::Collapsed | SidebarVisibility::Expanded => {
                let width = if visibility == SidebarVisibility::Collapsed {
                    SIDEBAR_COLLAPSED_WIDTH
                } else {
                    SIDEBAR_EXPANDED_WIDTH
                };
                let cols = Layout::horizontal([Constraint::Length(width), Constraint::Min(1)])
                    .split(content_area);
                (Some(cols[0]), cols[1])
            }
        };

        let work_rows =
            Layout::vertical([Constraint::Length(TOOLBAR_HEIGHT), Constraint::Min(1)]).split(work);
        let toolbar = work_rows[0];

        let (editor, panel) = if panel_open {
            let cols = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(work_rows[1]);
            (cols[0], Some(cols[1]))
        } else {
            (work_rows[1], None)
        };

        (
            AppLayout {
                sidebar,
                toolbar,
                editor,
                panel,
                status,
            },
            visibility,
        )
    }
}

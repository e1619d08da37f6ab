/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for the simulators, notification TTLs, etc.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper and the panel views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusNext,
    FocusPrev,
    FocusEditor,
    ToggleSidebar,
    OpenChapter(u32),

    // Refiner wizard
    ToggleRefiner,
    SubmitAudit,
    SubmitRevision,
    BackToReport,
    AcceptRevision,
    CancelRevision,
    RetryAudit,

    // Modals
    OpenVip,
    ShowHelp,
    CloseHelp,

    // Application
    Export,
    Quit,
}

/// Which area has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Sidebar,
    Editor,
    Panel,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Sidebar, Focus::Editor, Focus::Panel];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Sidebar => "章节",
            Focus::Editor => "原始文本",
            Focus::Panel => "改稿精修器",
        }
    }

    /// Next focus area; the panel is skipped while it is closed.
    pub fn next(self, panel_open: bool) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        let next = Focus::ALL[(idx + 1) % Focus::ALL.len()];
        if next == Focus::Panel && !panel_open {
            next.next(panel_open)
        } else {
            next
        }
    }

    pub fn prev(self, panel_open: bool) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        let prev = Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()];
        if prev == Focus::Panel && !panel_open {
            prev.prev(panel_open)
        } else {
            prev
        }
    }
}

/// Buttons of the editor toolbar. Only the refiner does anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Outline,
    Refiner,
    Expand,
    Rewrite,
    Polish,
    Tutorials,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Outline,
        Tool::Refiner,
        Tool::Expand,
        Tool::Rewrite,
        Tool::Polish,
        Tool::Tutorials,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Outline => "AI小说大纲",
            Tool::Refiner => "小说改稿精修器",
            Tool::Expand => "小说扩写",
            Tool::Rewrite => "小说改写",
            Tool::Polish => "小说润色",
            Tool::Tutorials => "小说视频教程",
        }
    }

    pub fn is_interactive(self) -> bool {
        self == Tool::Refiner
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, Focus, Notification, NotificationLevel, Tool};
use super::layout::AppLayout;
use super::sidebar::SidebarState;
use super::theme;
use super::views::editor::{EditorInput, EditorView};
use super::views::panel::PanelState;
use super::views::vip_modal::{VipModalState, VipOutcome};
use super::views::PanelOutcome;
use crate::config::AppConfig;
use crate::core::document::Document;
use crate::core::pipeline::SimulatorEvent;
use crate::core::wizard::{Stage, Wizard};

/// Ticks a notification stays on screen.
const NOTIFICATION_TTL: u32 = 100;
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Area with input focus.
    pub focus: Focus,
    /// Chapter drafts; the editor writes through to the active one.
    pub document: Document,
    pub editor: EditorView,
    /// Audit and revision wizard behind the refiner panel.
    pub wizard: Wizard,
    pub panel: PanelState,
    pub vip: VipModalState,
    pub sidebar: SidebarState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    export_dir: PathBuf,
    /// Stage the panel views were last prepared for.
    last_stage: Stage,
    last_tick: Instant,
    /// Receiver for events from outside the loop (signals).
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl AppState {
    pub fn new(config: &AppConfig, event_rx: mpsc::UnboundedReceiver<AppEvent>) -> Self {
        let document = Document::new();
        let mut editor = EditorView::new(&document);
        editor.set_focused(true);
        let wizard = Wizard::new(config.simulator.timing(), config.picker.effective_page_size());
        let last_stage = wizard.stage();
        Self {
            running: true,
            focus: Focus::Editor,
            document,
            editor,
            wizard,
            panel: PanelState::new(),
            vip: VipModalState::new(),
            sidebar: SidebarState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            export_dir: config.export_dir(),
            last_stage,
            last_tick: Instant::now(),
            event_rx,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();
        self.last_tick = Instant::now();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(&crossterm_event),
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                log::info!("Quit requested");
                self.running = false;
            }
        }
        self.sync_stage();
    }

    fn handle_input(&mut self, event: &Event) {
        // Priority 1: VIP modal consumes all input when open
        if self.vip.is_open() {
            if let VipOutcome::Confirmed(message) = self.vip.handle_input(event) {
                log::info!("VIP request submitted: {}", self.vip.preference().id());
                self.push_notification(message.to_string(), NotificationLevel::Success);
            }
            return;
        }

        // Priority 2: Help modal
        if self.show_help {
            if let Some(action) = self.map_help_input(event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 3: Chords that work everywhere, text fields included
        if let Some(action) = map_chord(event) {
            self.handle_action(action);
            return;
        }

        // Priority 4: Focused area
        let consumed = match self.focus {
            Focus::Sidebar => self.handle_sidebar_input(event),
            Focus::Editor => self.handle_editor_input(event),
            Focus::Panel => self.handle_panel_input(event),
        };
        if consumed {
            return;
        }

        // Priority 5: Plain-key bindings
        if let Some(action) = self.map_input_to_action(event) {
            self.handle_action(action);
        }
    }

    fn handle_sidebar_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        if !modifiers.is_empty() {
            return false;
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.sidebar.select_next();
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.sidebar.select_prev();
                true
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                if let Some(chapter) = self.sidebar.selected_chapter() {
                    self.handle_action(Action::OpenChapter(chapter.id));
                }
                true
            }
            KeyCode::Char('q') => {
                self.handle_action(Action::Quit);
                true
            }
            _ => false,
        }
    }

    fn handle_editor_input(&mut self, event: &Event) -> bool {
        match self.editor.handle_input(event, self.wizard.is_open()) {
            EditorInput::Ignored => false,
            EditorInput::Moved => true,
            EditorInput::Edited => {
                self.document.replace_text(self.editor.text());
                true
            }
        }
    }

    fn handle_panel_input(&mut self, event: &Event) -> bool {
        if !self.wizard.is_open() {
            return false;
        }
        match self.panel.handle_input(event, &mut self.wizard) {
            PanelOutcome::Ignored => false,
            PanelOutcome::Consumed => true,
            PanelOutcome::Action(action) => {
                self.handle_action(action);
                true
            }
            PanelOutcome::Notify(message, level) => {
                self.push_notification(message, level);
                true
            }
        }
    }

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            match (modifiers, code) {
                (m, KeyCode::Char('c') | KeyCode::Char('q')) if m.contains(KeyModifiers::CONTROL) => {
                    Some(Action::Quit)
                }
                (_, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')) => {
                    Some(Action::CloseHelp)
                }
                _ => None,
            }
        } else {
            None
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Char('?') if !self.is_text_input() => Some(Action::ShowHelp),
            KeyCode::Esc if self.focus != Focus::Editor => Some(Action::FocusEditor),
            _ => None,
        }
    }

    /// Whether printable keys are being typed into something.
    fn is_text_input(&self) -> bool {
        match self.focus {
            Focus::Sidebar => false,
            Focus::Editor => !self.wizard.is_open(),
            Focus::Panel => self.panel.is_text_field(&self.wizard),
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                log::info!("Quit requested");
                self.running = false;
            }
            Action::FocusNext => self.set_focus(self.focus.next(self.wizard.is_open())),
            Action::FocusPrev => self.set_focus(self.focus.prev(self.wizard.is_open())),
            Action::FocusEditor => self.set_focus(Focus::Editor),
            Action::ToggleSidebar => self.sidebar.toggle_collapse(),
            Action::OpenChapter(id) => match self.document.switch_to(id) {
                Ok(()) => {
                    self.editor.load(&self.document);
                    self.sidebar.sync_to_chapter(id);
                    self.set_focus(Focus::Editor);
                }
                Err(e) => {
                    log::warn!("Cannot open chapter: {e}");
                    self.push_notification(e.to_string(), NotificationLevel::Error);
                }
            },

            Action::ToggleRefiner => {
                self.wizard.toggle();
                if self.wizard.is_open() {
                    self.panel.reset(&self.wizard);
                    self.last_stage = self.wizard.stage();
                    self.set_focus(Focus::Panel);
                } else {
                    self.on_panel_closed();
                }
            }
            Action::SubmitAudit => {
                self.wizard.submit_audit();
            }
            Action::SubmitRevision => {
                self.wizard.submit_revision();
            }
            Action::BackToReport => {
                self.wizard.back_to_report();
            }
            Action::AcceptRevision => {
                if let Some(text) = self.wizard.accept() {
                    self.document.replace_text(text);
                    self.editor.load(&self.document);
                    self.vip.close();
                    self.set_focus(Focus::Editor);
                    self.push_notification("已应用修改".to_string(), NotificationLevel::Success);
                }
            }
            Action::CancelRevision => {
                self.wizard.close();
                self.on_panel_closed();
            }
            Action::RetryAudit => {
                self.wizard.retry();
                self.panel.enter_stage(Stage::Audit, &self.wizard);
                self.last_stage = Stage::Audit;
            }

            Action::OpenVip => self.vip.open(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,

            Action::Export => match self.document.export_active(&self.export_dir) {
                Ok(path) => {
                    self.push_notification(
                        format!("已导出到 {}", path.display()),
                        NotificationLevel::Success,
                    );
                }
                Err(e) => {
                    log::warn!("Export failed: {e}");
                    self.push_notification(format!("导出失败: {e}"), NotificationLevel::Error);
                }
            },
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.editor.set_focused(focus == Focus::Editor);
    }

    fn on_panel_closed(&mut self) {
        self.vip.close();
        if self.focus == Focus::Panel {
            self.set_focus(Focus::Editor);
        }
    }

    /// Prepare the panel view when the wizard moved on by itself.
    fn sync_stage(&mut self) {
        let stage = self.wizard.stage();
        if stage != self.last_stage {
            self.panel.enter_stage(stage, &self.wizard);
            self.last_stage = stage;
        }
    }

    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: feed wall-clock time to the wizard, expire notifications.
    fn on_tick(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(delta);

        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    /// Advance the running simulation by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        let kind = self.wizard.simulator().map(|sim| sim.kind());
        let events = self.wizard.advance_by(delta);
        if let Some(kind) = kind {
            if events.contains(&SimulatorEvent::Completed) {
                self.push_notification(kind.done_title().to_string(), NotificationLevel::Success);
            }
        }
        self.sync_stage();
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

        let (layout, visibility) =
            AppLayout::compute(area, self.sidebar.user_collapsed, self.wizard.is_open());

        if let Some(sidebar_area) = layout.sidebar {
            self.sidebar.render(
                frame,
                sidebar_area,
                visibility,
                self.document.active_id(),
                self.focus == Focus::Sidebar,
            );
        }

        self.render_toolbar(frame, layout.toolbar);
        self.editor.render(
            frame,
            layout.editor,
            self.focus == Focus::Editor,
            self.wizard.is_open(),
        );
        if let Some(panel_area) = layout.panel {
            self.panel
                .render(frame, panel_area, &self.wizard, self.focus == Focus::Panel);
        }
        self.render_status_bar(frame, layout.status);

        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
        if self.vip.is_open() {
            self.vip.render(frame, area);
        }
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for tool in Tool::ALL {
            let style = if !tool.is_interactive() {
                theme::dim()
            } else if self.wizard.is_open() {
                theme::button(true)
            } else {
                theme::highlight()
            };
            spans.push(Span::styled(format!(" {} ", tool.label()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let export = Line::from(vec![
            Span::styled("Ctrl+E", theme::key_hint()),
            Span::styled(" 导出 ", theme::muted()),
        ])
        .alignment(Alignment::Right);
        frame.render_widget(Paragraph::new(export), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let chapter = self
            .document
            .active_chapter()
            .map(|c| c.title)
            .unwrap_or_default();
        let panel_state = if self.wizard.is_loading() {
            Span::styled("处理中", Style::default().fg(theme::PRIMARY_LIGHT))
        } else if self.wizard.is_open() {
            Span::styled(self.wizard.stage().title(), Style::default().fg(theme::TEXT_MUTED))
        } else {
            Span::styled("未开启", Style::default().fg(theme::TEXT_DIM))
        };

        let status = Line::from(vec![
            Span::styled(" 小说改稿精修器 ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(chapter, Style::default().fg(theme::TEXT)),
            Span::styled(
                format!(" {} 字", self.document.active_word_count()),
                theme::muted(),
            ),
            Span::raw(" │ "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("精修器:", theme::key_hint()),
            Span::raw(" "),
            panel_state,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":切换 "),
            Span::styled("Ctrl+R", theme::key_hint()),
            Span::raw(":精修器 "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(":侧栏 "),
            Span::styled("F1", theme::key_hint()),
            Span::raw(":帮助 "),
            Span::styled("Ctrl+Q", theme::key_hint()),
            Span::raw(":退出"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = (self.notifications.len() as u16).min(area.height);
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1.min(area.height.saturating_sub(height));

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            notification_area,
        );
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("全局:", ""),
            ("Ctrl+Q / Ctrl+C", "退出"),
            ("F1 / ?", "显示/关闭帮助"),
            ("Tab / Shift+Tab", "切换焦点区域"),
            ("Ctrl+R", "打开/关闭改稿精修器"),
            ("Ctrl+E", "导出当前章节"),
            ("Ctrl+B", "折叠/展开侧栏"),
            ("Esc", "关闭弹窗 / 回到正文"),
            ("", ""),
            ("章节侧栏:", ""),
            ("j/k 或 ↑/↓", "选择章节"),
            ("Enter", "打开章节"),
            ("", ""),
            ("正文:", ""),
            ("精修器关闭时", "直接编辑"),
            ("精修器开启时", "只读，↑/↓ 滚动"),
            ("", ""),
            ("改稿精修器:", ""),
            ("↑/↓", "切换选项"),
            ("←/→", "切换取值"),
            ("Space", "勾选章节 / 标签"),
            ("Enter", "确认 / 提交"),
            ("PgUp/PgDn", "滚动诊断报告"),
            ("b / Esc", "返回报告 / 取消修改"),
        ];

        let lines: Vec<Line> = keybindings
            .iter()
            .map(|(key, desc)| {
                if desc.is_empty() {
                    Line::from(Span::styled(*key, theme::heading()))
                } else {
                    Line::from(vec![
                        Span::styled(format!("  {key:<18}"), theme::key_hint()),
                        Span::styled(*desc, Style::default().fg(theme::TEXT)),
                    ])
                }
            })
            .collect();

        let block = Block::default()
            .title(" 快捷键 ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_BASE));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Ctrl chords, focus cycling and F1; resolved before any view sees the key.
fn map_chord(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::ToggleRefiner),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('b') => Some(Action::ToggleSidebar),
            _ => None,
        };
    }

    match code {
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::F(1) => Some(Action::ShowHelp),
        _ => None,
    }
}

/// Centered rectangle taking `percent_x` by `percent_y` of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::revision::FinalRevision;
    use crate::core::vip::CONFIRMATION;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> AppState {
        let mut config = AppConfig::default();
        config.data.data_dir = Some(dir.path().to_path_buf());
        let (_tx, rx) = mpsc::unbounded_channel();
        AppState::new(&config, rx)
    }

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Input(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)))
    }

    fn long() -> Duration {
        Duration::from_secs(60)
    }

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let r = centered_rect(60, 80, area);
        assert_eq!(r.width, 60);
        assert_eq!(r.height, 40);
        assert!(r.x >= area.x && r.right() <= area.right());
        assert!(r.y >= area.y && r.bottom() <= area.bottom());
    }

    #[test]
    fn test_notifications_dedup_and_cap() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.push_notification("a".into(), NotificationLevel::Info);
        app.push_notification("a".into(), NotificationLevel::Info);
        assert_eq!(app.notifications.len(), 1);
        for m in ["b", "c", "d"] {
            app.push_notification(m.into(), NotificationLevel::Info);
        }
        let messages: Vec<&str> = app.notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_ctrl_r_toggles_panel_and_focus() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_event(ctrl('r'));
        assert!(app.wizard.is_open());
        assert_eq!(app.focus, Focus::Panel);

        app.handle_event(ctrl('r'));
        assert!(!app.wizard.is_open());
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn test_full_flow_applies_revision() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_action(Action::ToggleRefiner);
        app.handle_action(Action::SubmitAudit);
        assert_eq!(app.wizard.stage(), Stage::LoadingReport);

        app.advance(long());
        assert_eq!(app.wizard.stage(), Stage::ReportAndRevisionSetup);
        assert_eq!(app.notifications.len(), 1);
        assert_eq!(app.notifications[0].level, NotificationLevel::Success);

        app.handle_action(Action::SubmitRevision);
        app.advance(long());
        assert_eq!(app.wizard.stage(), Stage::Result);

        app.handle_action(Action::AcceptRevision);
        let expected = FinalRevision::mock().accepted_text();
        assert!(!app.wizard.is_open());
        assert_eq!(app.document.text(), expected);
        assert_eq!(app.editor.text(), expected);
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn test_cancel_keeps_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let before = app.document.text().to_string();
        app.handle_action(Action::ToggleRefiner);
        app.handle_action(Action::SubmitAudit);
        app.advance(long());
        app.handle_action(Action::SubmitRevision);
        app.advance(long());
        app.handle_action(Action::CancelRevision);
        assert!(!app.wizard.is_open());
        assert_eq!(app.document.text(), before);
    }

    #[test]
    fn test_closing_mid_run_cancels() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_action(Action::ToggleRefiner);
        app.handle_action(Action::SubmitAudit);
        app.advance(Duration::from_millis(500));
        app.handle_action(Action::ToggleRefiner);
        assert!(!app.wizard.is_loading());
        app.advance(long());
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_editor_writable_only_while_panel_closed() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_event(press(KeyCode::Char('x')));
        assert!(app.document.text().starts_with('x'));

        app.handle_action(Action::ToggleRefiner);
        app.handle_action(Action::FocusEditor);
        let before = app.document.text().to_string();
        app.handle_event(press(KeyCode::Char('y')));
        assert_eq!(app.document.text(), before);
    }

    #[test]
    fn test_tab_skips_closed_panel() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_event(press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Sidebar);
        app.handle_event(press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn test_sidebar_opens_chapter() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_action(Action::FocusPrev);
        assert_eq!(app.focus, Focus::Sidebar);
        app.handle_event(press(KeyCode::Down));
        app.handle_event(press(KeyCode::Enter));
        assert_eq!(app.document.active_id(), 1);
        assert_eq!(app.editor.chapter_id(), 1);
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn test_unknown_chapter_notifies() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_action(Action::OpenChapter(99));
        assert_eq!(app.document.active_id(), 6);
        assert_eq!(app.notifications[0].level, NotificationLevel::Error);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_event(ctrl('e'));
        let path = dir.path().join("exports").join("第六章 书店来客.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), app.document.text());
        assert_eq!(app.notifications[0].level, NotificationLevel::Success);
    }

    #[test]
    fn test_vip_confirmation_notifies() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_action(Action::ToggleRefiner);
        app.handle_action(Action::OpenVip);
        app.handle_event(press(KeyCode::Enter));
        assert!(!app.vip.is_open());
        assert_eq!(app.notifications[0].message, CONFIRMATION);
    }

    #[test]
    fn test_help_modal_swallows_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_event(press(KeyCode::F(1)));
        assert!(app.show_help);
        app.handle_event(press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Editor);
        app.handle_event(press(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_render_every_stage() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        app.handle_action(Action::ToggleRefiner);
        terminal.draw(|f| app.render(f)).unwrap();
        app.handle_action(Action::SubmitAudit);
        app.advance(Duration::from_millis(900));
        terminal.draw(|f| app.render(f)).unwrap();
        app.advance(long());
        terminal.draw(|f| app.render(f)).unwrap();
        app.handle_action(Action::SubmitRevision);
        app.advance(long());
        app.handle_action(Action::ShowHelp);
        terminal.draw(|f| app.render(f)).unwrap();
        assert_eq!(app.wizard.stage(), Stage::Result);
    }
}

//! Right-hand refiner panel: routes input and rendering to the view of the
//! wizard's current stage.

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::audit_form::AuditFormState;
use super::pipeline;
use super::report::ReportView;
use super::revision_result::RevisionResultView;
use super::revision_setup::{RevisionSetupState, FORM_HEIGHT};
use super::PanelOutcome;
use crate::core::wizard::{Stage, Wizard};
use crate::tui::events::Action;
use crate::tui::theme;

const REPORT_PAGE: i32 = 10;

#[derive(Default)]
pub struct PanelState {
    pub audit_form: AuditFormState,
    pub report: ReportView,
    pub setup: RevisionSetupState,
    pub result: RevisionResultView,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-view state after the wizard was (re)opened.
    pub fn reset(&mut self, wizard: &Wizard) {
        self.audit_form.reset();
        self.report.refresh();
        self.setup.reset(wizard.revision_setup());
        self.result.reset();
    }

    /// Prepare the view of a stage the wizard just moved into.
    pub fn enter_stage(&mut self, stage: Stage, wizard: &Wizard) {
        match stage {
            Stage::Audit => self.audit_form.reset(),
            Stage::ReportAndRevisionSetup => {
                self.report.scroll_home();
                self.setup.reset(wizard.revision_setup());
            }
            Stage::Result => self.result.reset(),
            Stage::LoadingReport => self.report.refresh(),
            Stage::LoadingRevision => {}
        }
    }

    /// Whether printable keys belong to a text input right now.
    pub fn is_text_field(&self, wizard: &Wizard) -> bool {
        if wizard.error().is_some() {
            return false;
        }
        match wizard.stage() {
            Stage::Audit => self.audit_form.is_text_field(),
            Stage::ReportAndRevisionSetup => self.setup.is_text_field(),
            _ => false,
        }
    }

    pub fn handle_input(&mut self, event: &Event, wizard: &mut Wizard) -> PanelOutcome {
        if wizard.error().is_some() {
            return match event {
                Event::Key(key)
                    if key.kind == KeyEventKind::Press
                        && matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) =>
                {
                    PanelOutcome::Action(Action::RetryAudit)
                }
                _ => PanelOutcome::Ignored,
            };
        }

        match wizard.stage() {
            Stage::Audit => self.audit_form.handle_input(event, wizard.audit_mut()),
            Stage::LoadingReport | Stage::LoadingRevision => PanelOutcome::Ignored,
            Stage::ReportAndRevisionSetup => {
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::PageUp => {
                                self.report.scroll_by(-REPORT_PAGE);
                                return PanelOutcome::Consumed;
                            }
                            KeyCode::PageDown => {
                                self.report.scroll_by(REPORT_PAGE);
                                return PanelOutcome::Consumed;
                            }
                            _ => {}
                        }
                    }
                }
                self.setup.handle_input(event, wizard.revision_setup_mut())
            }
            Stage::Result => self.result.handle_input(event),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, wizard: &Wizard, focused: bool) {
        let stage = wizard.stage();
        let mut title = Vec::new();
        if stage == Stage::Result {
            title.push(Span::styled(" ← ", theme::key_hint()));
        }
        let heading = if stage == Stage::Audit {
            "AI审稿智能团队"
        } else {
            "诊断与修改"
        };
        title.push(Span::styled(format!(" {heading} "), theme::title()));
        title.push(Span::styled(format!(" {} ", stage.title()), theme::muted()));

        let mut block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
            .style(Style::default().bg(theme::BG_SURFACE));
        if stage == Stage::Result && wizard.error().is_none() {
            block = block.title(
                Line::from(vec![
                    Span::styled(" 取消 ", theme::muted()),
                    Span::styled(" 确认修改 ", theme::button(focused)),
                    Span::raw(" "),
                ])
                .right_aligned(),
            );
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        let body = rows[0];
        frame.render_widget(Paragraph::new(hint_line(wizard)), rows[1]);

        if let Some(error) = wizard.error() {
            render_error(frame, body, error);
            return;
        }

        match stage {
            Stage::Audit => self.audit_form.render(frame, body, wizard.audit(), focused),
            Stage::LoadingReport | Stage::LoadingRevision => match wizard.simulator() {
                Some(sim) => pipeline::render(frame, body, sim),
                None => pipeline::render_busy(frame, body),
            },
            Stage::ReportAndRevisionSetup => {
                let parts =
                    Layout::vertical([Constraint::Min(5), Constraint::Length(FORM_HEIGHT)]).split(body);
                self.report.render(frame, parts[0]);
                self.setup.render(frame, parts[1], wizard.revision_setup(), focused);
            }
            Stage::Result => self.result.render(frame, body, wizard.final_revision()),
        }
    }
}

type Hints = &'static [(&'static str, &'static str)];

const ERROR_HINTS: Hints = &[("Enter", "返回重试")];
const AUDIT_HINTS: Hints = &[("↑/↓", "切换"), ("←/→", "选择"), ("Space", "勾选"), ("Enter", "确认")];
const LOADING_HINTS: Hints = &[("Ctrl+R", "关闭面板并取消")];
const REPORT_HINTS: Hints = &[("PgUp/PgDn", "滚动报告"), ("↑/↓", "切换"), ("Enter", "确认")];
const RESULT_HINTS: Hints = &[("↑/↓", "滚动"), ("b", "返回报告"), ("Esc", "取消"), ("Enter", "确认修改")];

fn hint_line(wizard: &Wizard) -> Line<'static> {
    let pairs = if wizard.error().is_some() {
        ERROR_HINTS
    } else {
        match wizard.stage() {
            Stage::Audit => AUDIT_HINTS,
            Stage::LoadingReport | Stage::LoadingRevision => LOADING_HINTS,
            Stage::ReportAndRevisionSetup => REPORT_HINTS,
            Stage::Result => RESULT_HINTS,
        }
    };
    let mut spans = Vec::new();
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {key}"), theme::key_hint()));
        spans.push(Span::styled(format!(":{label} "), theme::dim()));
    }
    Line::from(spans)
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(format!("⚠ {error}"), Style::default().fg(theme::ERROR))),
        Line::raw(""),
        Line::from(Span::styled("  返回重试  ", theme::button(true))),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

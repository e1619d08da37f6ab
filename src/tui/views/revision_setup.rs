//! Revision style form (wizard step 2, lower half).

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::PanelOutcome;
use crate::core::revision::RevisionSetup;
use crate::tui::events::Action;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

/// Rows the form needs, borders included.
pub const FORM_HEIGHT: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Style,
    Request,
    Submit,
}

impl SetupField {
    fn next(self) -> Self {
        match self {
            SetupField::Style => SetupField::Request,
            SetupField::Request | SetupField::Submit => SetupField::Submit,
        }
    }

    fn prev(self) -> Self {
        match self {
            SetupField::Style | SetupField::Request => SetupField::Style,
            SetupField::Submit => SetupField::Request,
        }
    }
}

pub struct RevisionSetupState {
    field: SetupField,
    request_input: InputBuffer,
}

impl Default for RevisionSetupState {
    fn default() -> Self {
        Self::new()
    }
}

impl RevisionSetupState {
    pub fn new() -> Self {
        Self {
            field: SetupField::Style,
            request_input: InputBuffer::new(),
        }
    }

    /// Reload from `setup`, which outlives the panel.
    pub fn reset(&mut self, setup: &RevisionSetup) {
        self.field = SetupField::Style;
        self.request_input.set_text(setup.custom_request.clone());
    }

    pub fn field(&self) -> SetupField {
        self.field
    }

    pub fn is_text_field(&self) -> bool {
        self.field == SetupField::Request
    }

    pub fn handle_input(&mut self, event: &Event, setup: &mut RevisionSetup) -> PanelOutcome {
        let Event::Key(key) = event else {
            return PanelOutcome::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return PanelOutcome::Ignored;
        }

        match key.code {
            KeyCode::Up => self.field = self.field.prev(),
            KeyCode::Down => self.field = self.field.next(),
            _ => match self.field {
                SetupField::Style => match key.code {
                    KeyCode::Left => setup.style = setup.style.prev(),
                    KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                        setup.style = setup.style.next();
                    }
                    _ => return PanelOutcome::Ignored,
                },
                SetupField::Request => {
                    if key.code == KeyCode::Enter {
                        self.field = SetupField::Submit;
                    } else if InputBuffer::is_edit_key(key) {
                        if self.request_input.handle_key(key) {
                            setup.custom_request = self.request_input.text().to_string();
                        }
                    } else {
                        return PanelOutcome::Ignored;
                    }
                }
                SetupField::Submit => {
                    if key.code == KeyCode::Enter {
                        return PanelOutcome::Action(Action::SubmitRevision);
                    }
                    return PanelOutcome::Ignored;
                }
            },
        }
        PanelOutcome::Consumed
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, setup: &RevisionSetup, focused: bool) {
        let active = |field: SetupField| focused && self.field == field;
        let marker = |field: SetupField| {
            if active(field) {
                Span::styled("▸ ", theme::highlight())
            } else {
                Span::raw("  ")
            }
        };
        let label_style = |field: SetupField| {
            if active(field) {
                theme::highlight()
            } else {
                theme::heading()
            }
        };

        let mut request = vec![Span::raw("  ")];
        request.extend(
            self.request_input
                .to_line("例如：请让女主的性格更活泼一点...", active(SetupField::Request))
                .spans,
        );

        let lines = vec![
            Line::from(vec![
                marker(SetupField::Style),
                Span::styled("改稿风格", label_style(SetupField::Style)),
                Span::styled("  根据诊断结果，选择适合的改稿方向", theme::dim()),
            ]),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("‹ {} ›", setup.style.label()), label_style(SetupField::Style)),
            ]),
            Line::raw(""),
            Line::from(vec![
                marker(SetupField::Request),
                Span::styled("自定义需求", label_style(SetupField::Request)),
                Span::styled("  输入您的具体要求，改稿更精准", theme::dim()),
            ]),
            Line::from(request),
            Line::raw(""),
            Line::from(vec![
                marker(SetupField::Submit),
                Span::styled("  开始智能改稿  ", theme::button(active(SetupField::Submit))),
            ]),
        ];

        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" STEP 2 ", theme::brand_badge()),
                Span::styled(" 选择改稿风格 ", theme::heading()),
            ]))
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

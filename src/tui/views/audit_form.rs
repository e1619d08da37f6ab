//! Audit configuration form (wizard step 1).
//!
//! The form edits the wizard's [`AuditConfig`] in place. Only navigation
//! state lives here: which field is focused, the chapter picker popup and
//! the two text inputs.
//!
//! Keys: `↑/↓` move between fields, `←/→` change the focused choice,
//! `Space`/`Enter` toggle or activate. Inside the chapter picker `←/→`
//! turn pages and `Esc`/`Enter` close it.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{scroll_to_show, PanelOutcome};
use crate::core::audit::{AuditConfig, TAG_CATALOG};
use crate::tui::events::{Action, NotificationLevel};
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

/// Focusable rows of the form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditField {
    Focus,
    Vip,
    Chapters,
    Files,
    Tags,
    Channel,
    CorePlot,
    Submit,
}

impl AuditField {
    pub const ALL: [AuditField; 8] = [
        AuditField::Focus,
        AuditField::Vip,
        AuditField::Chapters,
        AuditField::Files,
        AuditField::Tags,
        AuditField::Channel,
        AuditField::CorePlot,
        AuditField::Submit,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&f| f == self).unwrap_or(0)
    }

    /// Field below, stopping at the submit button.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// Field above, stopping at the first.
    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

pub struct AuditFormState {
    field: AuditField,
    picker_open: bool,
    /// Row within the picker's current page.
    picker_cursor: usize,
    file_input: InputBuffer,
    tag_cursor: usize,
    core_plot_input: InputBuffer,
}

impl Default for AuditFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditFormState {
    pub fn new() -> Self {
        Self {
            field: AuditField::Focus,
            picker_open: false,
            picker_cursor: 0,
            file_input: InputBuffer::new(),
            tag_cursor: 0,
            core_plot_input: InputBuffer::new(),
        }
    }

    /// Back to a blank form, matching a freshly reset [`AuditConfig`].
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn field(&self) -> AuditField {
        self.field
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    /// Whether the focused field takes free text (the app then leaves
    /// printable keys alone).
    pub fn is_text_field(&self) -> bool {
        !self.picker_open && matches!(self.field, AuditField::Files | AuditField::CorePlot)
    }

    pub fn handle_input(&mut self, event: &Event, audit: &mut AuditConfig) -> PanelOutcome {
        let Event::Key(key) = event else {
            return PanelOutcome::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return PanelOutcome::Ignored;
        }

        if self.picker_open {
            return self.handle_picker_key(key, audit);
        }

        let text_outcome = match self.field {
            AuditField::Files => self.handle_file_key(key, audit),
            AuditField::CorePlot => self.handle_core_plot_key(key, audit),
            _ => None,
        };
        if let Some(outcome) = text_outcome {
            return outcome;
        }

        match key.code {
            KeyCode::Up => {
                self.field = self.field.prev();
                PanelOutcome::Consumed
            }
            KeyCode::Down => {
                self.field = self.field.next();
                PanelOutcome::Consumed
            }
            _ => self.handle_field_key(key, audit),
        }
    }

    fn handle_field_key(&mut self, key: &KeyEvent, audit: &mut AuditConfig) -> PanelOutcome {
        let activate = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        match self.field {
            AuditField::Focus => match key.code {
                KeyCode::Left => audit.editor = audit.editor.prev(),
                KeyCode::Right => audit.editor = audit.editor.next(),
                _ if activate => audit.editor = audit.editor.next(),
                _ => return PanelOutcome::Ignored,
            },
            AuditField::Vip if activate => return PanelOutcome::Action(Action::OpenVip),
            AuditField::Chapters if activate => {
                self.picker_open = true;
                self.picker_cursor = 0;
            }
            AuditField::Tags => match key.code {
                KeyCode::Left => {
                    self.tag_cursor = (self.tag_cursor + TAG_CATALOG.len() - 1) % TAG_CATALOG.len();
                }
                KeyCode::Right => self.tag_cursor = (self.tag_cursor + 1) % TAG_CATALOG.len(),
                _ if activate => {
                    audit.book_settings.toggle_tag(TAG_CATALOG[self.tag_cursor]);
                }
                _ => return PanelOutcome::Ignored,
            },
            AuditField::Channel => {
                let settings = &mut audit.book_settings;
                match key.code {
                    KeyCode::Left => settings.channel = settings.channel.prev(),
                    KeyCode::Right => settings.channel = settings.channel.next(),
                    _ if activate => settings.channel = settings.channel.next(),
                    _ => return PanelOutcome::Ignored,
                }
            }
            AuditField::Submit if key.code == KeyCode::Enter => {
                return PanelOutcome::Action(Action::SubmitAudit);
            }
            _ => return PanelOutcome::Ignored,
        }
        PanelOutcome::Consumed
    }

    fn handle_picker_key(&mut self, key: &KeyEvent, audit: &mut AuditConfig) -> PanelOutcome {
        let picker = &mut audit.link_chapters;
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.picker_open = false,
            KeyCode::Up => self.picker_cursor = self.picker_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.picker_cursor + 1 < picker.current_page().len() {
                    self.picker_cursor += 1;
                }
            }
            KeyCode::Left => {
                picker.prev_page();
                self.picker_cursor = 0;
            }
            KeyCode::Right => {
                picker.next_page();
                self.picker_cursor = 0;
            }
            KeyCode::Char(' ') => {
                if let Some(chapter) = picker.current_page().get(self.picker_cursor).copied() {
                    picker.toggle(chapter.id);
                }
            }
            _ => {}
        }
        PanelOutcome::Consumed
    }

    fn handle_file_key(&mut self, key: &KeyEvent, audit: &mut AuditConfig) -> Option<PanelOutcome> {
        match key.code {
            KeyCode::Enter => Some(self.attach(audit)),
            KeyCode::Delete if self.file_input.text().is_empty() => {
                let removed = audit
                    .uploaded_files
                    .len()
                    .checked_sub(1)
                    .and_then(|last| audit.remove_file(last));
                Some(match removed {
                    Some(file) => {
                        PanelOutcome::Notify(format!("已移除 {}", file.name), NotificationLevel::Info)
                    }
                    None => PanelOutcome::Consumed,
                })
            }
            _ if InputBuffer::is_edit_key(key) => {
                self.file_input.handle_key(key);
                Some(PanelOutcome::Consumed)
            }
            _ => None,
        }
    }

    fn attach(&mut self, audit: &mut AuditConfig) -> PanelOutcome {
        let path = self.file_input.text().trim().to_string();
        if path.is_empty() {
            return PanelOutcome::Notify("请输入文件路径".to_string(), NotificationLevel::Warning);
        }
        match audit.attach_file(&path) {
            Ok(file) => {
                let message = format!("已上传 {}", file.name);
                self.file_input.clear();
                PanelOutcome::Notify(message, NotificationLevel::Success)
            }
            Err(e) => PanelOutcome::Notify(format!("上传失败: {e}"), NotificationLevel::Error),
        }
    }

    fn handle_core_plot_key(
        &mut self,
        key: &KeyEvent,
        audit: &mut AuditConfig,
    ) -> Option<PanelOutcome> {
        let settings = &mut audit.book_settings;
        match key.code {
            KeyCode::Enter => Some(if settings.confirm_core_plot() {
                PanelOutcome::Notify("核心梗已确认".to_string(), NotificationLevel::Success)
            } else {
                PanelOutcome::Notify("请先填写核心梗".to_string(), NotificationLevel::Warning)
            }),
            _ if InputBuffer::is_edit_key(key) => {
                if self.core_plot_input.handle_key(key) {
                    settings.set_core_plot(self.core_plot_input.text());
                }
                Some(PanelOutcome::Consumed)
            }
            _ => None,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, audit: &AuditConfig, focused: bool) {
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled("👩‍💻 欢迎使用小说改稿精修器！", theme::title())),
            Line::from(Span::styled("我是您的专属写作顾问。我们的流程是：", theme::muted())),
            Line::from(vec![
                Span::styled("① 深度审稿诊断", theme::heading()),
                Span::styled(" → ", theme::dim()),
                Span::styled("② 匹配大神风格", theme::heading()),
                Span::styled(" → ", theme::dim()),
                Span::styled("③ 手把手精修", theme::heading()),
            ]),
            Line::raw(""),
            Line::from(Span::styled("本次诊断将包含：", theme::dim())),
            Line::from(Span::styled("✅ 核心爽点/毒点分析  ✅ 读者心理曲线模拟", theme::muted())),
            Line::from(Span::styled("✅ 对标爆款书分析    ✅ 剧情逻辑硬伤检测", theme::muted())),
            Line::raw(""),
        ];

        let mut focus_range = (0, 0);
        for field in AuditField::ALL {
            let start = lines.len();
            let active = focused && field == self.field;
            self.field_lines(field, audit, active, &mut lines);
            if field == self.field {
                focus_range = (start, lines.len().saturating_sub(1));
            }
            if field != AuditField::Submit {
                lines.push(Line::raw(""));
            }
        }

        let scroll = scroll_to_show(focus_range.1, area.height, 0).min(focus_range.0 as u16);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
    }

    fn field_lines(
        &self,
        field: AuditField,
        audit: &AuditConfig,
        active: bool,
        lines: &mut Vec<Line<'static>>,
    ) {
        match field {
            AuditField::Focus => {
                lines.push(header("1. 选择改稿方向", active));
                lines.push(hint("根据您的需求，选择最适合的诊断侧重点"));
                lines.push(Line::from(vec![
                    Span::raw("   "),
                    Span::styled(format!("‹ {} ›", audit.editor.label()), choice(active)),
                ]));
                lines.push(hint(&format!("侧重：{}", audit.editor.emphasis())));
            }
            AuditField::Vip => {
                lines.push(Line::from(vec![
                    marker(active),
                    Span::styled(
                        "👑 【VIP 进阶版】",
                        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(hint("AI审稿差点意思？想拥有专属小编？"));
                lines.push(hint("这里直接帮你在线对接专业编辑，人工帮你审稿！"));
                lines.push(Line::from(vec![
                    Span::raw("   "),
                    Span::styled(" 立即连线 → ", vip_button(active)),
                ]));
            }
            AuditField::Chapters => {
                lines.push(header("2. 关联章节", active));
                lines.push(hint("💡 官方提示：默认仅诊断当前章节。"));
                lines.push(hint("如需更准确的上下文逻辑诊断（如伏笔回收），"));
                lines.push(hint("请勾选关联章节可提升40%准确率。"));
                let arrow = if self.picker_open { "▴" } else { "▾" };
                lines.push(Line::from(vec![
                    Span::raw("   "),
                    Span::styled(
                        format!("{} {arrow}", audit.link_chapters.describe_selection()),
                        choice(active),
                    ),
                ]));
                if self.picker_open {
                    self.picker_lines(audit, lines);
                }
            }
            AuditField::Files => {
                lines.push(header("3. 上传平台数据 (可选)", active));
                lines.push(hint("上传后台数据截图，AI将结合真实留存率进行精准建议"));
                let mut input = vec![Span::styled("   路径: ", theme::muted())];
                input.extend(
                    self.file_input
                        .to_line("输入文件路径后按 Enter 上传", active)
                        .spans,
                );
                lines.push(Line::from(input));
                for file in &audit.uploaded_files {
                    lines.push(Line::from(vec![
                        Span::styled("   📄 ", theme::dim()),
                        Span::styled(file.name.clone(), Style::default().fg(theme::TEXT)),
                        Span::styled(format!("  {}", format_size(file.size_bytes)), theme::dim()),
                    ]));
                }
                if active && !audit.uploaded_files.is_empty() {
                    lines.push(hint("输入为空时按 Delete 移除最后一个文件"));
                }
            }
            AuditField::Tags => {
                lines.push(header("4. 作品设定 (可选)", active));
                let mut spans = vec![Span::raw("   ")];
                for (idx, tag) in TAG_CATALOG.iter().enumerate() {
                    let picked = audit.book_settings.has_tag(tag);
                    let text = if picked { format!("[✓{tag}]") } else { format!("[ {tag}]") };
                    let mut style = if picked { theme::highlight() } else { theme::muted() };
                    if active && idx == self.tag_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    spans.push(Span::styled(text, style));
                    spans.push(Span::raw(" "));
                    if idx == TAG_CATALOG.len() / 2 - 1 {
                        lines.push(Line::from(std::mem::replace(&mut spans, vec![Span::raw("   ")])));
                    }
                }
                lines.push(Line::from(spans));
            }
            AuditField::Channel => {
                lines.push(Line::from(vec![
                    marker(active),
                    Span::styled("频道  ", theme::heading()),
                    Span::styled(
                        format!("‹ {} ›", audit.book_settings.channel.label()),
                        choice(active),
                    ),
                ]));
            }
            AuditField::CorePlot => {
                let settings = &audit.book_settings;
                let mut spans = vec![marker(active), Span::styled("核心梗  ", theme::heading())];
                spans.extend(
                    self.core_plot_input
                        .to_line("一句话概括本书的核心梗", active)
                        .spans,
                );
                lines.push(Line::from(spans));
                let status = if settings.core_plot_confirmed {
                    Span::styled("   ✓ 已确认", Style::default().fg(theme::SUCCESS))
                } else if settings.core_plot.trim().is_empty() {
                    Span::styled("   未填写", theme::dim())
                } else {
                    Span::styled("   按 Enter 确认", theme::key_hint())
                };
                lines.push(Line::from(status));
            }
            AuditField::Submit => {
                lines.push(Line::from(vec![
                    Span::raw("   "),
                    Span::styled("  开始深度诊断  ", theme::button(active)),
                ]));
            }
        }
    }

    fn picker_lines(&self, audit: &AuditConfig, lines: &mut Vec<Line<'static>>) {
        let picker = &audit.link_chapters;
        let prev = if picker.has_prev_page() { "‹" } else { " " };
        let next = if picker.has_next_page() { "›" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("     {prev} "), theme::key_hint()),
            Span::styled(
                format!("第 {} / {} 页", picker.page_index() + 1, picker.total_pages()),
                theme::dim(),
            ),
            Span::styled(format!(" {next}"), theme::key_hint()),
        ]));
        for (idx, chapter) in picker.current_page().iter().enumerate() {
            let selected = picker.is_selected(chapter.id);
            let check = if selected { "[✓] " } else { "[ ] " };
            let mut style = if selected {
                Style::default().fg(theme::INFO).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::TEXT)
            };
            if idx == self.picker_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(vec![
                Span::raw("     "),
                Span::styled(format!("{check}{}", chapter.title), style),
            ]));
        }
        lines.push(hint("  Space 勾选 · ←/→ 翻页 · Enter 完成"));
    }
}

fn marker(active: bool) -> Span<'static> {
    if active {
        Span::styled("▸ ", theme::highlight())
    } else {
        Span::raw("  ")
    }
}

fn header(text: &str, active: bool) -> Line<'static> {
    let style = if active { theme::highlight() } else { theme::heading() };
    Line::from(vec![marker(active), Span::styled(text.to_string(), style)])
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("   {text}"), theme::dim()))
}

fn choice(active: bool) -> Style {
    if active {
        theme::highlight()
    } else {
        Style::default().fg(theme::TEXT)
    }
}

fn vip_button(active: bool) -> Style {
    if active {
        Style::default()
            .fg(theme::BG_BASE)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

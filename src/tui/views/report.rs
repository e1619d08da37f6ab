//! Diagnostic report (wizard step 2, upper half).
//!
//! The reader-retention chart sits on top, the report text scrolls below it.

use std::cell::Cell;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use super::max_scroll;
use crate::core::report::{DiagnosticReport, ReaderCurve};
use crate::tui::theme;

const CHART_HEIGHT: u16 = 12;
const MAX_RATING: u8 = 5;

pub struct ReportView {
    report: DiagnosticReport,
    curve: ReaderCurve,
    generated_on: NaiveDate,
    scroll: u16,
    /// Ceiling measured by the last render; `None` before the first one.
    max_scroll: Cell<Option<u16>>,
}

impl Default for ReportView {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportView {
    pub fn new() -> Self {
        Self {
            report: DiagnosticReport::mock(),
            curve: ReaderCurve::mock(),
            generated_on: chrono::Local::now().date_naive(),
            scroll: 0,
            max_scroll: Cell::new(None),
        }
    }

    /// Re-date the report and scroll back to the top.
    pub fn refresh(&mut self) {
        self.generated_on = chrono::Local::now().date_naive();
        self.scroll = 0;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let ceiling = self.max_scroll.get().unwrap_or(u16::MAX);
        let next = i32::from(self.scroll) + delta;
        self.scroll = next.clamp(0, i32::from(ceiling)) as u16;
    }

    pub fn scroll_home(&mut self) {
        self.scroll = 0;
    }

    pub fn report_lines(&self) -> Vec<Line<'static>> {
        let r = &self.report;
        let rating = MAX_RATING.min(r.rating);
        let stars = format!(
            "{}{}",
            "★".repeat(usize::from(rating)),
            "☆".repeat(usize::from(MAX_RATING - rating))
        );

        let mut lines = vec![
            Line::from(vec![
                Span::styled("平台痛点诊断: ", Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD)),
                Span::styled(self.curve.pain_point, theme::muted()),
            ]),
            Line::from(vec![
                Span::styled("吸睛指数: ", Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD)),
                Span::styled(self.curve.hook_score, theme::muted()),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::styled(format!("📝 {}", r.title), theme::title()),
                Span::styled(format!("   综合评分 {stars}"), Style::default().fg(theme::WARNING)),
            ]),
            Line::from(Span::styled(
                format!("诊断时间: {}", self.generated_on.format("%Y/%-m/%-d")),
                theme::dim(),
            )),
            Line::raw(""),
            Line::from(vec![
                Span::styled("📋 诊断摘要：", theme::highlight()),
                Span::styled(r.summary, Style::default().fg(theme::TEXT)),
            ]),
            Line::raw(""),
            section("第一部分：核心卖点识别"),
            Line::from(Span::styled("🧩 核心梗概提炼", theme::heading())),
            Line::from(Span::styled(format!("“{}”", r.core_trope), Style::default().fg(theme::TEXT))),
            Line::from(
                r.trope_tags
                    .iter()
                    .map(|t| Span::styled(format!("#{t} "), Style::default().fg(theme::INFO)))
                    .collect::<Vec<_>>(),
            ),
            Line::from(vec![
                Span::styled("卖点分析：", theme::heading()),
                Span::styled(r.selling_point, theme::muted()),
            ]),
            Line::raw(""),
            Line::from(Span::styled("📚 对标作品分析", theme::heading())),
        ];

        for book in &r.benchmarks {
            lines.push(Line::from(vec![
                Span::styled(book.title, Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" [{}]", book.similarity), Style::default().fg(theme::SUCCESS)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  相似点：{}", book.similar_points),
                theme::muted(),
            )));
            lines.push(Line::from(Span::styled(
                format!("  成功关键：{}", book.success_key),
                Style::default().fg(theme::INFO),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("💡 建议：{}", r.benchmark_advice),
            Style::default().fg(theme::PRIMARY),
        )));
        lines.push(Line::raw(""));

        lines.push(section("第二部分：问题定位与修改建议"));
        for issue in &r.issues {
            let mut head = Vec::new();
            if let Some(severity) = issue.severity {
                head.push(Span::styled(
                    format!("[{}] ", severity.label()),
                    Style::default()
                        .fg(theme::severity_color(severity))
                        .add_modifier(Modifier::BOLD),
                ));
            }
            head.push(Span::styled(issue.title, theme::heading()));
            lines.push(Line::from(head));
            lines.push(Line::from(vec![
                Span::styled("  ❌ 现状：", theme::dim()),
                Span::styled(issue.current, theme::muted()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  ✅ 建议：", theme::dim()),
                Span::styled(issue.suggestion, Style::default().fg(theme::TEXT)),
            ]));
        }
        lines.push(Line::raw(""));

        lines.push(Line::from(Span::styled("👥 人物塑造分析", theme::heading())));
        for note in &r.characters {
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", note.icon)),
                Span::styled(note.headline, Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(Span::styled(format!("   {}", note.detail), theme::muted())));
            lines.push(Line::from(Span::styled(
                format!("   → {}", note.action),
                Style::default().fg(theme::INFO),
            )));
        }
        lines.push(Line::raw(""));

        lines.push(Line::from(Span::styled("📌 总结", theme::highlight())));
        lines.push(Line::from(Span::styled(r.conclusion, Style::default().fg(theme::TEXT))));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("👇 请在下方选择改稿风格", theme::key_hint())));
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks =
            Layout::vertical([Constraint::Length(CHART_HEIGHT), Constraint::Min(3)]).split(area);
        self.render_chart(frame, chunks[0]);

        let report = Paragraph::new(self.report_lines()).wrap(Wrap { trim: false });
        let max = max_scroll(&report, chunks[1]);
        self.max_scroll.set(Some(max));
        frame.render_widget(report.scroll((self.scroll.min(max), 0)), chunks[1]);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let curve = &self.curve;
        let drop_off = [(curve.drop_off.x, curve.drop_off.y)];
        let peak = [(curve.peak.x, curve.peak.y)];

        let datasets = vec![
            Dataset::default()
                .name("情绪值")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::CURVE))
                .data(&curve.emotion),
            Dataset::default()
                .name("留存基准")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::BASELINE))
                .data(&curve.baseline),
            Dataset::default()
                .name(curve.drop_off.label)
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme::ERROR))
                .data(&drop_off),
            Dataset::default()
                .name(curve.peak.label)
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme::SUCCESS))
                .data(&peak),
        ];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(" 📉 读者留存与情绪监控 ")
                    .borders(Borders::ALL)
                    .border_style(theme::border_default()),
            )
            .x_axis(
                Axis::default()
                    .bounds([0.0, 100.0])
                    .style(theme::dim())
                    .labels(["开篇", "中段", "结尾"]),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, 100.0])
                    .style(theme::dim())
                    .labels(["0", "50", "100"]),
            );
        frame.render_widget(chart, area);
    }
}

fn section(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("━━ {text} ━━"),
        Style::default().fg(theme::PRIMARY).add_modifier(Modifier::BOLD),
    ))
}

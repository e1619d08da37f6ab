//! Step-by-step progress view shown while a simulated pipeline runs.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::pipeline::{ProgressSimulator, StepStatus};
use crate::tui::theme;
use crate::tui::widgets::progress;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const BAR_WIDTH: usize = 24;

fn spinner_frame(sim: &ProgressSimulator) -> &'static str {
    let idx = (sim.elapsed().as_millis() / 100) as usize % SPINNER.len();
    SPINNER[idx]
}

/// Lines for the whole visualizer: heading, overall bar, then one block per step.
pub fn pipeline_lines(sim: &ProgressSimulator) -> Vec<Line<'static>> {
    let spinner = spinner_frame(sim);
    let kind = sim.kind();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{spinner} "), theme::title()),
            Span::styled(kind.running_title(), theme::title()),
        ]),
        progress::labelled_bar("总进度", sim.overall_progress(), BAR_WIDTH, theme::PRIMARY),
        Line::raw(""),
    ];

    for (idx, step) in sim.steps().iter().enumerate() {
        let status = sim.step_status(idx);
        let (mark, label_style) = match status {
            StepStatus::Completed => (
                Span::styled("✓ ", Style::default().fg(theme::SUCCESS)),
                Style::default().fg(theme::TEXT),
            ),
            StepStatus::Active => (
                Span::styled(format!("{spinner} "), theme::highlight()),
                theme::highlight(),
            ),
            StepStatus::Pending => (Span::styled("○ ", theme::dim()), theme::dim()),
        };
        lines.push(Line::from(vec![
            mark,
            Span::raw(format!("{} ", step.icon)),
            Span::styled(step.label.clone(), label_style),
        ]));

        match status {
            StepStatus::Completed => {
                lines.push(Line::from(Span::styled(
                    "     已完成",
                    Style::default().fg(theme::SUCCESS),
                )));
            }
            StepStatus::Active => {
                lines.push(Line::from(Span::styled(
                    format!("     {}", step.description),
                    theme::muted(),
                )));
                let mut bar = vec![Span::raw("     ")];
                bar.extend(progress::bar(sim.step_progress(), BAR_WIDTH, theme::PRIMARY_LIGHT));
                bar.push(Span::styled(
                    format!(" {:>3}%", sim.step_progress()),
                    theme::key_hint(),
                ));
                lines.push(Line::from(bar));
            }
            StepStatus::Pending => {
                lines.push(Line::from(Span::styled(
                    format!("     {}", step.description),
                    theme::dim(),
                )));
            }
        }
    }

    if sim.all_steps_done() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("🎉 {}", kind.done_title()),
            Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled("正在加载结果...", theme::muted())));
    }
    lines
}

pub fn render(frame: &mut Frame, area: Rect, sim: &ProgressSimulator) {
    frame.render_widget(Paragraph::new(pipeline_lines(sim)), area);
}

/// Shown in place of the visualizer if a loading stage has no simulator.
pub fn render_busy(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("处理中...", theme::muted()))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::SimulatorTiming;
    use std::time::Duration;

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_fresh_audit_run() {
        let sim = ProgressSimulator::audit(SimulatorTiming::default());
        let text = text_of(&pipeline_lines(&sim));
        assert!(text.contains("深度诊断分析中"));
        assert!(text.contains("文本预处理"));
        assert!(!text.contains("已完成"));
        assert!(!text.contains("诊断分析完成"));
    }

    #[test]
    fn test_completed_steps_are_marked() {
        let timing = SimulatorTiming::default();
        let mut sim = ProgressSimulator::audit(timing);
        sim.advance_by(timing.step + Duration::from_millis(1));
        let text = text_of(&pipeline_lines(&sim));
        assert!(text.contains("✓ "));
        assert!(text.contains("已完成"));
    }

    #[test]
    fn test_revision_done_title_after_last_step() {
        let timing = SimulatorTiming::default();
        let mut sim = ProgressSimulator::revision(Some("author-feiwo"), timing);
        sim.advance_by(timing.step * 5);
        assert!(sim.all_steps_done());
        let text = text_of(&pipeline_lines(&sim));
        assert!(text.contains("应用情感深化模式"));
        assert!(text.contains("改稿处理完成！"));
    }
}

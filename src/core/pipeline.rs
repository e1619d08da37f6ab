//! Simulated multi-step processing pipeline.
//!
//! Nothing is analysed here: the pipeline only paces a fixed list of
//! labelled steps so the UI can show progress before revealing a static
//! result. Time is virtual. Callers feed elapsed durations into
//! [`ProgressSimulator::advance_by`] and receive the timer firings that
//! fell inside that window, in chronological order.
//!
//! Each step owns two timers:
//!
//! - a tick timer that adds `increment` percent every `tick` until the
//!   step reaches 100% (then it is cleared and the step idles at 100%),
//! - a step timer that fires once, `step` after the step began, resets
//!   the percentage and moves to the next step.
//!
//! Both are cleared when the step advances. After the last step a settle
//! timer fires once and the simulator completes. [`ProgressSimulator::cancel`]
//! clears every pending timer.

use std::time::Duration;

// ============================================================================
// Steps
// ============================================================================

/// Which pipeline is being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Audit,
    Revision,
}

impl PipelineKind {
    /// Heading shown while the pipeline runs.
    pub fn running_title(self) -> &'static str {
        match self {
            PipelineKind::Audit => "深度诊断分析中",
            PipelineKind::Revision => "智能改稿处理中",
        }
    }

    /// Message shown once every step has finished.
    pub fn done_title(self) -> &'static str {
        match self {
            PipelineKind::Audit => "诊断分析完成！",
            PipelineKind::Revision => "改稿处理完成！",
        }
    }
}

/// One labelled stage of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStep {
    pub label: String,
    pub description: String,
    pub icon: &'static str,
}

impl ProcessStep {
    fn new(label: impl Into<String>, description: impl Into<String>, icon: &'static str) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            icon,
        }
    }
}

/// The six diagnosis steps.
pub fn audit_steps() -> Vec<ProcessStep> {
    vec![
        ProcessStep::new("文本预处理", "正在进行分词与句法分析，提取核心语义结构...", "📊"),
        ProcessStep::new("剧情逻辑拓扑分析", "构建情节关系图谱，检测因果链断裂与逻辑漏洞...", "🔍"),
        ProcessStep::new("爆款数据库比对", "正在比对千万级爆款小说数据库，匹配相似题材与成功模式...", "📚"),
        ProcessStep::new("读者情绪曲线建模", "模拟读者阅读心理，构建情绪波动曲线与留存预测模型...", "📈"),
        ProcessStep::new("商业化潜力评估", "分析付费卡点设置、黄金三章留存率、追读指数...", "💰"),
        ProcessStep::new("生成诊断报告", "汇总分析结果，生成深度诊断报告...", "📝"),
    ]
}

/// Display name for a revision style id.
///
/// A missing id reads as generic optimisation; known author keys map to
/// their mode; anything else falls back to the generic mode.
pub fn revision_style_name(style_id: Option<&str>) -> &'static str {
    match style_id {
        None | Some("") => "通用优化",
        Some(id) if id.contains("tangjia") => "强化冲突模式",
        Some(id) if id.contains("chendong") => "宏大叙事模式",
        Some(id) if id.contains("feiwo") => "情感深化模式",
        Some(_) => "通用优化模式",
    }
}

/// The five revision steps; the third one names the chosen style.
pub fn revision_steps(style_id: Option<&str>) -> Vec<ProcessStep> {
    let style = revision_style_name(style_id);
    vec![
        ProcessStep::new("原文结构解析", "解析段落结构、对话分布、叙事节奏...", "🔬"),
        ProcessStep::new("问题定位修复", "定位诊断报告中标记的问题点，制定修复方案...", "🔧"),
        ProcessStep::new(
            format!("应用{style}"),
            format!("正在注入{style}的叙事技法与文风特征..."),
            "✨",
        ),
        ProcessStep::new("文字精修润色", "优化遣词造句，增强感官描写，提升文字质感...", "✍️"),
        ProcessStep::new("生成对比报告", "生成修改前后对比与改动说明...", "📋"),
    ]
}

/// Step catalog for `kind`. `style_id` only matters for revisions.
pub fn steps_for(kind: PipelineKind, style_id: Option<&str>) -> Vec<ProcessStep> {
    match kind {
        PipelineKind::Audit => audit_steps(),
        PipelineKind::Revision => revision_steps(style_id),
    }
}

// ============================================================================
// Timing
// ============================================================================

/// Cadence of the simulated pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorTiming {
    /// Period of the per-step percentage tick.
    pub tick: Duration,
    /// Time each step stays active.
    pub step: Duration,
    /// Delay between the last step finishing and completion.
    pub settle: Duration,
    /// Percentage added per tick.
    pub increment: u8,
}

impl Default for SimulatorTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(80),
            step: Duration::from_millis(1800),
            settle: Duration::from_millis(500),
            increment: 5,
        }
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Observable timer firings, reported in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorEvent {
    /// The active step's percentage changed.
    Progress { step: usize, percent: u8 },
    /// Step `completed` finished and the next one (if any) became active.
    StepAdvanced { completed: usize },
    /// The settle delay elapsed. Emitted exactly once per run.
    Completed,
}

/// Display status of a step relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Settling,
    Completed,
    Cancelled,
}

/// Timer-driven progress choreography over a fixed list of steps.
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    kind: PipelineKind,
    steps: Vec<ProcessStep>,
    timing: SimulatorTiming,
    current_step: usize,
    step_progress: u8,
    phase: Phase,
    /// Virtual time since the run began.
    now: Duration,
    next_tick_at: Option<Duration>,
    step_deadline: Option<Duration>,
    settle_deadline: Option<Duration>,
}

impl ProgressSimulator {
    pub fn new(kind: PipelineKind, steps: Vec<ProcessStep>, timing: SimulatorTiming) -> Self {
        let mut sim = Self {
            kind,
            steps,
            timing,
            current_step: 0,
            step_progress: 0,
            phase: Phase::Running,
            now: Duration::ZERO,
            next_tick_at: None,
            step_deadline: None,
            settle_deadline: None,
        };
        sim.arm_current_step(Duration::ZERO);
        sim
    }

    /// Simulator over the diagnosis steps.
    pub fn audit(timing: SimulatorTiming) -> Self {
        Self::new(PipelineKind::Audit, audit_steps(), timing)
    }

    /// Simulator over the revision steps for `style_id`.
    pub fn revision(style_id: Option<&str>, timing: SimulatorTiming) -> Self {
        Self::new(PipelineKind::Revision, revision_steps(style_id), timing)
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn steps(&self) -> &[ProcessStep] {
        &self.steps
    }

    /// Index of the active step; equals `steps().len()` once all have run.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Percentage of the active step, in `[0, 100]`.
    pub fn step_progress(&self) -> u8 {
        self.step_progress
    }

    /// Virtual time since the run began.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    /// Overall percentage across all steps, clamped to 100.
    pub fn overall_progress(&self) -> u8 {
        if self.steps.is_empty() {
            return 100;
        }
        let done = self.current_step as f64 + f64::from(self.step_progress) / 100.0;
        let pct = (done / self.steps.len() as f64 * 100.0).round();
        pct.min(100.0) as u8
    }

    pub fn step_status(&self, index: usize) -> StepStatus {
        match index.cmp(&self.current_step) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }

    /// Every step has run; the settle delay may still be pending.
    pub fn all_steps_done(&self) -> bool {
        self.current_step >= self.steps.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.phase == Phase::Cancelled
    }

    /// Whether any timer is still armed.
    pub fn has_pending_timers(&self) -> bool {
        self.next_tick_at.is_some() || self.step_deadline.is_some() || self.settle_deadline.is_some()
    }

    /// Clear every pending timer. Later calls to `advance_by` do nothing.
    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Running | Phase::Settling) {
            log::debug!(
                "Cancelling {:?} pipeline at step {}/{}",
                self.kind,
                self.current_step,
                self.steps.len()
            );
        }
        self.clear_step_timers();
        self.settle_deadline = None;
        if self.phase != Phase::Completed {
            self.phase = Phase::Cancelled;
        }
    }

    /// Let `delta` of virtual time pass and fire every timer that came due.
    pub fn advance_by(&mut self, delta: Duration) -> Vec<SimulatorEvent> {
        let target = self.now.saturating_add(delta);
        let mut events = Vec::new();

        while let Some((at, timer)) = self.next_due(target) {
            self.now = at;
            match timer {
                Timer::Step => events.push(self.fire_step_deadline(at)),
                Timer::Tick => {
                    if let Some(event) = self.fire_tick(at) {
                        events.push(event);
                    }
                }
                Timer::Settle => {
                    self.settle_deadline = None;
                    self.phase = Phase::Completed;
                    log::info!("{:?} pipeline completed after {:?}", self.kind, at);
                    events.push(SimulatorEvent::Completed);
                }
            }
        }

        if matches!(self.phase, Phase::Running | Phase::Settling) {
            self.now = target;
        }
        events
    }

    /// Earliest timer due at or before `limit`. The step timer wins ties.
    fn next_due(&self, limit: Duration) -> Option<(Duration, Timer)> {
        [
            (self.step_deadline, Timer::Step),
            (self.next_tick_at, Timer::Tick),
            (self.settle_deadline, Timer::Settle),
        ]
        .into_iter()
        .filter_map(|(at, timer)| at.filter(|&t| t <= limit).map(|t| (t, timer)))
        .min_by_key(|&(t, timer)| (t, timer as u8))
    }

    fn fire_tick(&mut self, at: Duration) -> Option<SimulatorEvent> {
        if self.step_progress >= 100 {
            self.next_tick_at = None;
            return None;
        }
        self.step_progress = self.step_progress.saturating_add(self.timing.increment).min(100);
        self.next_tick_at = if self.step_progress >= 100 || self.timing.tick.is_zero() {
            None
        } else {
            Some(at + self.timing.tick)
        };
        Some(SimulatorEvent::Progress {
            step: self.current_step,
            percent: self.step_progress,
        })
    }

    fn fire_step_deadline(&mut self, at: Duration) -> SimulatorEvent {
        let completed = self.current_step;
        self.clear_step_timers();
        self.step_progress = 0;
        self.current_step += 1;
        log::debug!(
            "{:?} pipeline step {}/{} done at {:?}",
            self.kind,
            completed + 1,
            self.steps.len(),
            at
        );
        self.arm_current_step(at);
        SimulatorEvent::StepAdvanced { completed }
    }

    /// Arm the timers for the step now at `current_step`, or the settle
    /// timer when every step has run.
    fn arm_current_step(&mut self, at: Duration) {
        if self.current_step < self.steps.len() {
            if !self.timing.tick.is_zero() && self.timing.increment > 0 {
                self.next_tick_at = Some(at + self.timing.tick);
            }
            self.step_deadline = Some(at + self.timing.step);
        } else {
            self.phase = Phase::Settling;
            self.settle_deadline = Some(at + self.timing.settle);
        }
    }

    fn clear_step_timers(&mut self) {
        self.next_tick_at = None;
        self.step_deadline = None;
    }
}

/// Timer identities, ordered by tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Step = 0,
    Tick = 1,
    Settle = 2,
}

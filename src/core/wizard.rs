//! Refiner panel state machine.
//!
//! ```text
//! Audit --submit--> LoadingReport --complete--> ReportAndRevisionSetup
//!   ^                                              |        ^
//!   | (reopen)                                  submit     back
//!   |                                              v        |
//!   +------------------------------- LoadingRevision --complete--> Result --accept--> closed
//! ```
//!
//! The wizard owns the simulator of the loading stage it is in. Leaving a
//! loading stage, or closing the panel, cancels that simulator so no late
//! timer can touch a later run.

use std::time::Duration;

use super::audit::AuditConfig;
use super::chapters::DEFAULT_PAGE_SIZE;
use super::pipeline::{ProgressSimulator, SimulatorEvent, SimulatorTiming};
use super::revision::{FinalRevision, RevisionSetup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Audit,
    LoadingReport,
    ReportAndRevisionSetup,
    LoadingRevision,
    Result,
}

impl Stage {
    pub fn is_loading(self) -> bool {
        matches!(self, Stage::LoadingReport | Stage::LoadingRevision)
    }

    /// Step badge shown in the panel header.
    pub fn title(self) -> &'static str {
        match self {
            Stage::Audit => "STEP 1 · 诊断配置",
            Stage::LoadingReport => "STEP 1 · 诊断中",
            Stage::ReportAndRevisionSetup => "STEP 2 · 诊断报告与改稿风格",
            Stage::LoadingRevision => "STEP 2 · 改稿中",
            Stage::Result => "STEP 3 · 改稿结果",
        }
    }
}

/// State of the refiner panel.
#[derive(Debug, Clone)]
pub struct Wizard {
    open: bool,
    stage: Stage,
    audit: AuditConfig,
    revision: RevisionSetup,
    simulator: Option<ProgressSimulator>,
    final_revision: Option<FinalRevision>,
    is_loading: bool,
    /// Generic failure message. Nothing in the normal flow sets it.
    error: Option<String>,
    timing: SimulatorTiming,
    page_size: usize,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(SimulatorTiming::default(), DEFAULT_PAGE_SIZE)
    }
}

impl Wizard {
    pub fn new(timing: SimulatorTiming, page_size: usize) -> Self {
        Self {
            open: false,
            stage: Stage::Audit,
            audit: AuditConfig::new(page_size),
            revision: RevisionSetup::default(),
            simulator: None,
            final_revision: None,
            is_loading: false,
            error: None,
            timing,
            page_size,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn audit(&self) -> &AuditConfig {
        &self.audit
    }

    pub fn audit_mut(&mut self) -> &mut AuditConfig {
        &mut self.audit
    }

    pub fn revision_setup(&self) -> &RevisionSetup {
        &self.revision
    }

    pub fn revision_setup_mut(&mut self) -> &mut RevisionSetup {
        &mut self.revision
    }

    /// Simulator of the current loading stage, if any.
    pub fn simulator(&self) -> Option<&ProgressSimulator> {
        self.simulator.as_ref()
    }

    pub fn final_revision(&self) -> Option<&FinalRevision> {
        self.final_revision.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ── Panel lifecycle ───────────────────────────────────────────────────

    /// Open the panel if closed, close it if open.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Open the panel on a fresh audit form.
    ///
    /// The audit configuration is reset; the revision setup is kept.
    pub fn open(&mut self) {
        self.stop_simulator();
        self.open = true;
        self.stage = Stage::Audit;
        self.audit = AuditConfig::new(self.page_size);
        self.final_revision = None;
        self.error = None;
        self.is_loading = false;
        log::info!("Refiner panel opened");
    }

    /// Close the panel, cancelling any running simulation.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        if self.stop_simulator() {
            log::info!("Refiner panel closed during {:?}; simulation cancelled", self.stage);
        } else {
            log::info!("Refiner panel closed");
        }
        self.is_loading = false;
        self.open = false;
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Start the diagnosis. Ignored unless on the audit form and idle.
    pub fn submit_audit(&mut self) -> bool {
        if !self.open || self.is_loading || self.stage != Stage::Audit {
            log::debug!("Ignoring audit submit in {:?} (loading: {})", self.stage, self.is_loading);
            return false;
        }
        self.is_loading = true;
        self.error = None;
        self.simulator = Some(ProgressSimulator::audit(self.timing));
        self.transition(Stage::LoadingReport);
        log::info!(
            "Audit submitted: focus={}, linked={:?}, files={}, tags={:?}",
            self.audit.editor.id(),
            self.audit.linked_chapter_ids(),
            self.audit.uploaded_files.len(),
            self.audit.book_settings.tags
        );
        true
    }

    /// Start the revision. Ignored unless on the report step and idle.
    pub fn submit_revision(&mut self) -> bool {
        if !self.open || self.is_loading || self.stage != Stage::ReportAndRevisionSetup {
            log::debug!(
                "Ignoring revision submit in {:?} (loading: {})",
                self.stage,
                self.is_loading
            );
            return false;
        }
        self.is_loading = true;
        self.error = None;
        self.simulator = Some(ProgressSimulator::revision(
            Some(self.revision.style.id()),
            self.timing,
        ));
        self.transition(Stage::LoadingRevision);
        log::info!("Revision submitted: style={}", self.revision.style.id());
        true
    }

    /// Feed elapsed time to the running simulator and apply its completion.
    pub fn advance_by(&mut self, delta: Duration) -> Vec<SimulatorEvent> {
        let Some(sim) = self.simulator.as_mut() else {
            return Vec::new();
        };
        let events = sim.advance_by(delta);
        if events.contains(&SimulatorEvent::Completed) {
            self.on_simulator_complete();
        }
        events
    }

    fn on_simulator_complete(&mut self) {
        self.simulator = None;
        self.is_loading = false;
        match self.stage {
            Stage::LoadingReport => self.transition(Stage::ReportAndRevisionSetup),
            Stage::LoadingRevision => {
                self.final_revision = Some(FinalRevision::mock());
                self.transition(Stage::Result);
            }
            other => log::warn!("Simulator completed outside a loading stage ({other:?})"),
        }
    }

    /// Return from the result to the report, keeping every setting.
    pub fn back_to_report(&mut self) -> bool {
        if self.stage != Stage::Result {
            return false;
        }
        self.transition(Stage::ReportAndRevisionSetup);
        true
    }

    /// Accept the revision: close the panel and hand back the new chapter text.
    pub fn accept(&mut self) -> Option<String> {
        if !self.open || self.stage != Stage::Result {
            return None;
        }
        let text = self.final_revision.as_ref()?.accepted_text();
        log::info!("Revision accepted ({} chars)", text.chars().count());
        self.close();
        Some(text)
    }

    /// Record a failure for the generic error view.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Refiner error: {message}");
        self.stop_simulator();
        self.is_loading = false;
        self.error = Some(message);
    }

    /// Leave the error view and go back to the audit form.
    pub fn retry(&mut self) {
        self.error = None;
        self.stop_simulator();
        self.is_loading = false;
        self.transition(Stage::Audit);
    }

    fn transition(&mut self, next: Stage) {
        if self.stage != next {
            log::info!("Wizard {:?} -> {:?}", self.stage, next);
            self.stage = next;
        }
    }

    /// Cancel and drop the simulator. Returns whether one was running.
    fn stop_simulator(&mut self) -> bool {
        match self.simulator.take() {
            Some(mut sim) => {
                let running = !sim.is_complete();
                sim.cancel();
                running
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long() -> Duration {
        Duration::from_secs(60)
    }

    fn opened() -> Wizard {
        let mut w = Wizard::default();
        w.open();
        w
    }

    #[test]
    fn test_starts_closed_on_audit() {
        let w = Wizard::default();
        assert!(!w.is_open());
        assert_eq!(w.stage(), Stage::Audit);
        assert!(w.simulator().is_none());
    }

    #[test]
    fn test_submit_requires_open_panel() {
        let mut w = Wizard::default();
        assert!(!w.submit_audit());
        assert_eq!(w.stage(), Stage::Audit);
    }

    #[test]
    fn test_audit_submit_is_guarded() {
        let mut w = opened();
        assert!(w.submit_audit());
        assert!(w.is_loading());
        assert_eq!(w.stage(), Stage::LoadingReport);
        assert!(!w.submit_audit());
        assert!(!w.submit_revision());
    }

    #[test]
    fn test_report_completion() {
        let mut w = opened();
        w.submit_audit();
        let events = w.advance_by(long());
        assert_eq!(events.last(), Some(&SimulatorEvent::Completed));
        assert_eq!(w.stage(), Stage::ReportAndRevisionSetup);
        assert!(!w.is_loading());
        assert!(w.simulator().is_none());
    }

    #[test]
    fn test_full_flow_and_accept() {
        let mut w = opened();
        w.submit_audit();
        w.advance_by(long());
        assert!(w.submit_revision());
        assert_eq!(w.simulator().map(|s| s.steps()[2].label.as_str()), Some("应用强化冲突模式"));
        w.advance_by(long());
        assert_eq!(w.stage(), Stage::Result);
        assert!(w.final_revision().is_some());

        let text = w.accept().unwrap();
        assert_eq!(text, FinalRevision::mock().accepted_text());
        assert!(!w.is_open());
    }

    #[test]
    fn test_back_keeps_revision_setup() {
        let mut w = opened();
        w.revision_setup_mut().custom_request = "女主更活泼".into();
        w.submit_audit();
        w.advance_by(long());
        w.submit_revision();
        w.advance_by(long());
        assert!(w.back_to_report());
        assert_eq!(w.stage(), Stage::ReportAndRevisionSetup);
        assert_eq!(w.revision_setup().custom_request, "女主更活泼");
        assert!(!w.back_to_report());
    }

    #[test]
    fn test_close_mid_run_stops_timers() {
        let mut w = opened();
        w.submit_audit();
        w.advance_by(Duration::from_millis(2000));
        w.close();
        assert!(w.simulator().is_none());
        assert!(!w.is_loading());
        let stage = w.stage();
        assert!(w.advance_by(long()).is_empty());
        assert_eq!(w.stage(), stage);
    }

    #[test]
    fn test_reopen_resets_audit_config() {
        let mut w = opened();
        w.audit_mut().link_chapters.toggle(3);
        w.submit_audit();
        w.close();
        w.open();
        assert_eq!(w.stage(), Stage::Audit);
        assert!(w.audit().linked_chapter_ids().is_empty());
        assert!(w.final_revision().is_none());
    }

    #[test]
    fn test_accept_outside_result_is_ignored() {
        let mut w = opened();
        assert!(w.accept().is_none());
        assert!(w.is_open());
    }

    #[test]
    fn test_error_and_retry() {
        let mut w = opened();
        w.submit_audit();
        w.fail("模拟失败");
        assert_eq!(w.error(), Some("模拟失败"));
        assert!(w.simulator().is_none());
        w.retry();
        assert!(w.error().is_none());
        assert_eq!(w.stage(), Stage::Audit);
        assert!(w.submit_audit());
    }
}

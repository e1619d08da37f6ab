//! Wizard scenarios driven by a virtual clock, the way the event loop feeds it.

use std::time::Duration;

use crate::core::document::Document;
use crate::core::pipeline::{SimulatorEvent, SimulatorTiming};
use crate::core::revision::{FinalRevision, RevisionStyle, SegmentKind};
use crate::core::wizard::{Stage, Wizard};

const FRAME: Duration = Duration::from_millis(50);

/// Feed frames until the wizard leaves `stage`; returns the virtual time spent.
fn run_until_past(wizard: &mut Wizard, stage: Stage) -> Duration {
    let mut elapsed = Duration::ZERO;
    while wizard.stage() == stage {
        wizard.advance_by(FRAME);
        elapsed += FRAME;
        assert!(elapsed < Duration::from_secs(60), "{stage:?} never finished");
    }
    elapsed
}

fn open_wizard() -> Wizard {
    let mut wizard = Wizard::new(SimulatorTiming::default(), 4);
    wizard.open();
    wizard
}

#[test]
fn test_audit_takes_six_steps_plus_settle() {
    let mut wizard = open_wizard();
    assert!(wizard.submit_audit());
    let elapsed = run_until_past(&mut wizard, Stage::LoadingReport);
    // 6 × 1800ms + 500ms settle, observed at frame granularity.
    assert!(elapsed >= Duration::from_millis(11_300));
    assert!(elapsed < Duration::from_millis(11_300) + FRAME);
    assert_eq!(wizard.stage(), Stage::ReportAndRevisionSetup);
}

#[test]
fn test_full_flow_with_settings() {
    let mut wizard = open_wizard();
    wizard.audit_mut().link_chapters.toggle(2);
    wizard.audit_mut().link_chapters.toggle(5);
    wizard.audit_mut().book_settings.toggle_tag("都市");
    wizard.submit_audit();
    run_until_past(&mut wizard, Stage::LoadingReport);

    wizard.revision_setup_mut().style = RevisionStyle::Feiwo;
    wizard.revision_setup_mut().custom_request = "节奏再快些".into();
    assert!(wizard.submit_revision());
    let labels: Vec<String> = wizard
        .simulator()
        .map(|sim| sim.steps().iter().map(|s| s.label.clone()).collect())
        .unwrap_or_default();
    assert_eq!(labels[2], "应用情感深化模式");

    let elapsed = run_until_past(&mut wizard, Stage::LoadingRevision);
    assert!(elapsed >= Duration::from_millis(9_500));
    assert_eq!(wizard.stage(), Stage::Result);
    assert_eq!(wizard.audit().linked_chapter_ids(), &[2, 5]);
    assert_eq!(wizard.revision_setup().custom_request, "节奏再快些");
}

#[test]
fn test_close_during_revision_discards_run() {
    let mut wizard = open_wizard();
    wizard.submit_audit();
    run_until_past(&mut wizard, Stage::LoadingReport);
    wizard.revision_setup_mut().style = RevisionStyle::Chendong;
    wizard.submit_revision();
    wizard.advance_by(Duration::from_millis(4_000));

    wizard.close();
    for _ in 0..400 {
        assert!(wizard.advance_by(FRAME).is_empty());
    }
    assert!(wizard.final_revision().is_none());

    wizard.open();
    assert_eq!(wizard.stage(), Stage::Audit);
    assert!(!wizard.is_loading());
    assert_eq!(wizard.revision_setup().style, RevisionStyle::Chendong);
}

#[test]
fn test_accept_concatenates_every_segment() {
    let mut document = Document::new();
    let mut wizard = open_wizard();
    wizard.submit_audit();
    run_until_past(&mut wizard, Stage::LoadingReport);
    wizard.submit_revision();
    run_until_past(&mut wizard, Stage::LoadingRevision);

    let expected: String = FinalRevision::mock()
        .revised_text
        .iter()
        .map(|s| s.content.as_str())
        .collect();
    if let Some(text) = wizard.accept() {
        document.replace_text(text);
    }
    assert_eq!(document.text(), expected);
    assert!(!wizard.is_open());

    let revised = FinalRevision::mock()
        .revised_text
        .iter()
        .filter(|s| s.kind == SegmentKind::Revised)
        .all(|s| s.reason.is_some());
    assert!(revised);
}

#[test]
fn test_resubmit_while_loading_keeps_run() {
    let mut wizard = open_wizard();
    assert!(wizard.submit_audit());
    wizard.advance_by(Duration::from_millis(2_000));
    let step = wizard.simulator().map(|sim| sim.current_step());

    assert!(!wizard.submit_audit());
    assert!(!wizard.submit_revision());
    assert_eq!(wizard.simulator().map(|sim| sim.current_step()), step);
    assert_eq!(step, Some(1));
}

#[test]
fn test_completion_reported_once_across_frames() {
    let mut wizard = open_wizard();
    wizard.submit_audit();
    let mut completions = 0;
    for _ in 0..400 {
        completions += wizard
            .advance_by(FRAME)
            .iter()
            .filter(|e| **e == SimulatorEvent::Completed)
            .count();
    }
    assert_eq!(completions, 1);
}

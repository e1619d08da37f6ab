//! Property-based tests for the progress simulator
//!
//! Tests invariants:
//! - Steps complete in order, each exactly once
//! - `Completed` fires exactly once, however time is sliced
//! - Overall progress never decreases while running

use std::time::Duration;

use proptest::prelude::*;

use crate::core::pipeline::{ProgressSimulator, SimulatorEvent, SimulatorTiming};

/// Enough virtual time to finish any catalog.
const DRAIN: Duration = Duration::from_secs(120);

fn arb_slices() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..2500, 1..80)
}

fn arb_style() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("author-tangjia")),
        Just(Some("author-chendong")),
        Just(Some("author-feiwo")),
        Just(Some("unknown")),
    ]
}

fn run_sliced(sim: &mut ProgressSimulator, slices: &[u64]) -> (Vec<SimulatorEvent>, bool) {
    let mut events = Vec::new();
    let mut monotone = true;
    let mut last = sim.overall_progress();
    for &ms in slices {
        events.extend(sim.advance_by(Duration::from_millis(ms)));
        let now = sim.overall_progress();
        monotone &= now >= last;
        last = now;
    }
    events.extend(sim.advance_by(DRAIN));
    (events, monotone)
}

proptest! {
    #[test]
    fn prop_audit_steps_complete_in_order(slices in arb_slices()) {
        let mut sim = ProgressSimulator::audit(SimulatorTiming::default());
        let (events, _) = run_sliced(&mut sim, &slices);

        let advanced: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                SimulatorEvent::StepAdvanced { completed } => Some(*completed),
                _ => None,
            })
            .collect();
        let expected: Vec<usize> = (0..sim.steps().len()).collect();
        prop_assert_eq!(advanced, expected);
        prop_assert!(sim.is_complete());
        prop_assert!(!sim.has_pending_timers());
    }

    #[test]
    fn prop_completed_exactly_once(style in arb_style(), slices in arb_slices()) {
        let mut sim = ProgressSimulator::revision(style, SimulatorTiming::default());
        let (mut events, _) = run_sliced(&mut sim, &slices);
        events.extend(sim.advance_by(DRAIN));

        let completions = events.iter().filter(|e| **e == SimulatorEvent::Completed).count();
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(events.last(), Some(&SimulatorEvent::Completed));
    }

    #[test]
    fn prop_overall_progress_is_monotone(slices in arb_slices()) {
        let mut sim = ProgressSimulator::audit(SimulatorTiming::default());
        let (_, monotone) = run_sliced(&mut sim, &slices);
        prop_assert!(monotone);
        prop_assert_eq!(sim.overall_progress(), 100);
    }

    #[test]
    fn prop_step_progress_bounded(slices in arb_slices()) {
        let mut sim = ProgressSimulator::audit(SimulatorTiming::default());
        for ms in slices {
            sim.advance_by(Duration::from_millis(ms));
            prop_assert!(sim.step_progress() <= 100);
            prop_assert!(sim.current_step() <= sim.steps().len());
        }
    }

    #[test]
    fn prop_cancel_silences_simulator(slices in arb_slices()) {
        let mut sim = ProgressSimulator::audit(SimulatorTiming::default());
        let split = slices.len() / 2;
        for &ms in &slices[..split] {
            sim.advance_by(Duration::from_millis(ms));
        }
        let was_complete = sim.is_complete();
        sim.cancel();
        let step = sim.current_step();
        let events = sim.advance_by(DRAIN);
        prop_assert!(events.is_empty());
        prop_assert_eq!(sim.current_step(), step);
        prop_assert_eq!(sim.is_complete(), was_complete);
    }
}

//! Indicator Tests
//!
//! Tests for the steady and after-glow policies
//! Run with: cargo test --test indicator_tests

use rf_panel::control::indicator::{Indicator, IndicatorState};
use rf_panel::control::IndicatorOutput;
use rf_panel::types::Timestamp;

/// Records every level written to the indicator
#[derive(Default)]
struct MockOutput {
    writes: Vec<bool>,
}

impl MockOutput {
    fn last(&self) -> Option<bool> {
        self.writes.last().copied()
    }
}

impl IndicatorOutput for MockOutput {
    fn set_indicator(&mut self, active: bool) {
        self.writes.push(active);
    }
}

fn at(ms: u32) -> Timestamp {
    Timestamp::from_millis(ms)
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_indicator_starts_resting() {
    let ind = Indicator::new(100);
    assert_eq!(ind.state(), IndicatorState::Resting);
    assert!(!ind.is_active());
    assert!(ind.off_deadline().is_none());
}

#[test]
fn test_indicator_default_after_glow() {
    assert_eq!(Indicator::default().after_glow_ms(), 100);
}

// =============================================================================
// Steady Policy Tests
// =============================================================================

#[test]
fn test_hold_active() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.hold_active(&mut out);
    assert_eq!(ind.state(), IndicatorState::Steady);
    assert_eq!(out.last(), Some(true));
    assert!(!ind.after_glow_pending());
}

#[test]
fn test_hold_active_cancels_after_glow() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.start_after_glow(at(0), &mut out);
    ind.hold_active(&mut out);

    assert_eq!(ind.state(), IndicatorState::Steady);
    assert!(!ind.after_glow_pending());
    assert!(ind.off_deadline().is_none());
    // The old deadline no longer reverts the indicator
    assert!(!ind.expire_after_glow(at(100), &mut out));
    assert_eq!(ind.state(), IndicatorState::Steady);
    assert_eq!(out.writes, vec![true, true]);
}

#[test]
fn test_rest() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.hold_active(&mut out);
    ind.rest(&mut out);
    assert_eq!(ind.state(), IndicatorState::Resting);
    assert_eq!(out.writes, vec![true, false]);
}

// =============================================================================
// After-Glow Policy Tests
// =============================================================================

#[test]
fn test_after_glow_sets_deadline() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.start_after_glow(at(1000), &mut out);

    assert_eq!(ind.state(), IndicatorState::AfterGlow);
    assert_eq!(ind.off_deadline(), Some(at(1100)));
    assert!(ind.after_glow_pending());
    assert_eq!(out.last(), Some(true));
}

#[test]
fn test_after_glow_holds_until_deadline() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.start_after_glow(at(0), &mut out);

    assert!(!ind.expire_after_glow(at(50), &mut out));
    assert!(!ind.expire_after_glow(at(99), &mut out));
    // Output untouched before the deadline
    assert_eq!(out.writes, vec![true]);
    assert!(ind.is_active());
}

#[test]
fn test_after_glow_expires_at_deadline() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.start_after_glow(at(0), &mut out);

    assert!(ind.expire_after_glow(at(100), &mut out));
    assert_eq!(ind.state(), IndicatorState::Resting);
    assert!(!ind.after_glow_pending());
    assert_eq!(out.writes, vec![true, false]);
}

#[test]
fn test_after_glow_restart_extends_deadline() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.start_after_glow(at(0), &mut out);
    ind.start_after_glow(at(80), &mut out);

    assert!(!ind.expire_after_glow(at(100), &mut out));
    assert!(ind.expire_after_glow(at(180), &mut out));
}

#[test]
fn test_after_glow_across_wrap() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    ind.start_after_glow(at(u32::MAX - 49), &mut out);

    assert!(!ind.expire_after_glow(at(u32::MAX), &mut out));
    assert!(!ind.expire_after_glow(at(49), &mut out));
    assert!(ind.expire_after_glow(at(50), &mut out));
}

#[test]
fn test_expire_without_after_glow() {
    let mut ind = Indicator::new(100);
    let mut out = MockOutput::default();
    assert!(!ind.expire_after_glow(at(500), &mut out));
    assert!(out.writes.is_empty());
}

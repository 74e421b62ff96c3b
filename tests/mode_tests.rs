//! Mode State Tests
//!
//! Tests for arming, stopping and due checks
//! Run with: cargo test --test mode_tests

use rf_panel::control::mode::{Mode, ModeState};
use rf_panel::types::{ModeKind, Timestamp, TxParams};

fn params(code: u32) -> TxParams {
    TxParams::new(code, 1, 24)
}

fn at(ms: u32) -> Timestamp {
    Timestamp::from_millis(ms)
}

// =============================================================================
// Arming Tests
// =============================================================================

#[test]
fn test_new_state_is_idle() {
    let state = ModeState::new();
    assert_eq!(state.kind(), ModeKind::Idle);
    assert!(!state.is_pending());
    assert!(state.params().is_empty());
}

#[test]
fn test_arm_once() {
    let mut state = ModeState::new();
    state.arm_once(params(1234));
    assert_eq!(state.mode(), Mode::SinglePulse);
    assert_eq!(state.params(), params(1234));
    assert!(state.is_pending());
}

#[test]
fn test_arm_continuous_resets_last_send() {
    let mut state = ModeState::new();
    state.arm_continuous(params(1), 500);
    state.mark_sent(at(100));

    state.arm_continuous(params(2), 800);
    assert_eq!(
        state.mode(),
        Mode::Continuous {
            interval_ms: 800,
            last_send: None
        }
    );
    assert_eq!(state.params(), params(2));
}

#[test]
fn test_arm_timer_sets_deadline() {
    let mut state = ModeState::new();
    state.arm_timer(params(9), 5, at(1000));
    assert_eq!(state.mode(), Mode::Timer { deadline: at(6000) });
}

#[test]
fn test_arm_timer_huge_delay_is_clamped() {
    let mut state = ModeState::new();
    state.arm_timer(params(9), u32::MAX, at(0));
    assert!(!state.timer_expired(at(0)));
    assert!(!state.timer_expired(at(1_000_000)));
}

#[test]
fn test_rearm_replaces_previous_mode() {
    let mut state = ModeState::new();
    state.arm_timer(params(1), 5, at(0));
    state.arm_once(params(2));
    assert_eq!(state.kind(), ModeKind::SinglePulse);
    assert!(!state.timer_expired(at(10_000)));
}

#[test]
fn test_stop_keeps_params() {
    let mut state = ModeState::new();
    state.arm_continuous(params(77), 500);
    state.stop();
    assert_eq!(state.kind(), ModeKind::Idle);
    // Parameters are only overwritten by the next arm
    assert_eq!(state.params(), params(77));
}

// =============================================================================
// Continuous Due Tests
// =============================================================================

#[test]
fn test_continuous_due_immediately() {
    let mut state = ModeState::new();
    state.arm_continuous(params(1), 500);
    assert!(state.continuous_due(at(0)));
}

#[test]
fn test_continuous_due_after_interval() {
    let mut state = ModeState::new();
    state.arm_continuous(params(1), 500);
    state.mark_sent(at(1000));

    assert!(!state.continuous_due(at(1001)));
    assert!(!state.continuous_due(at(1499)));
    assert!(state.continuous_due(at(1500)));
}

#[test]
fn test_continuous_due_across_wrap() {
    let mut state = ModeState::new();
    state.arm_continuous(params(1), 500);
    state.mark_sent(at(u32::MAX - 100));

    assert!(!state.continuous_due(at(300)));
    assert!(state.continuous_due(at(399)));
}

#[test]
fn test_continuous_due_false_in_other_modes() {
    let mut state = ModeState::new();
    assert!(!state.continuous_due(at(0)));
    state.arm_once(params(1));
    assert!(!state.continuous_due(at(0)));
}

#[test]
fn test_mark_sent_ignored_outside_continuous() {
    let mut state = ModeState::new();
    state.arm_once(params(1));
    state.mark_sent(at(50));
    assert_eq!(state.mode(), Mode::SinglePulse);
}

// =============================================================================
// Timer Tests
// =============================================================================

#[test]
fn test_timer_expiry_boundary() {
    let mut state = ModeState::new();
    state.arm_timer(params(1), 5, at(0));
    assert!(!state.timer_expired(at(4999)));
    assert!(state.timer_expired(at(5000)));
}

#[test]
fn test_timer_zero_delay_expires_now() {
    let mut state = ModeState::new();
    state.arm_timer(params(1), 0, at(250));
    assert!(state.timer_expired(at(250)));
}

#[test]
fn test_timer_expired_false_when_not_armed() {
    let mut state = ModeState::new();
    state.arm_continuous(params(1), 10);
    assert!(!state.timer_expired(at(u32::MAX)));
}

//! Types Module Tests
//!
//! Tests for domain types (Timestamp, TxParams, ModeKind)
//! Run with: cargo test --test types_tests

use rf_panel::types::{ModeKind, Timestamp, TxParams};

// =============================================================================
// Timestamp Tests
// =============================================================================

#[test]
fn test_timestamp_from_millis() {
    let t = Timestamp::from_millis(1234);
    assert_eq!(t.as_millis(), 1234);
    assert_eq!(Timestamp::ZERO.as_millis(), 0);
}

#[test]
fn test_timestamp_from_uptime_keeps_low_bits() {
    let t = Timestamp::from_uptime_ms(u64::from(u32::MAX) + 6);
    assert_eq!(t.as_millis(), 5);
}

#[test]
fn test_timestamp_offset() {
    let t = Timestamp::from_millis(1000).offset_by(5000);
    assert_eq!(t.as_millis(), 6000);
}

#[test]
fn test_timestamp_offset_wraps() {
    let t = Timestamp::from_millis(u32::MAX - 1).offset_by(3);
    assert_eq!(t.as_millis(), 1);
}

#[test]
fn test_timestamp_elapsed_since() {
    let earlier = Timestamp::from_millis(100);
    let later = Timestamp::from_millis(600);
    assert_eq!(later.elapsed_since(earlier), 500);
}

#[test]
fn test_timestamp_elapsed_across_wrap() {
    let earlier = Timestamp::from_millis(u32::MAX - 99);
    let later = Timestamp::from_millis(400);
    assert_eq!(later.elapsed_since(earlier), 500);
}

#[test]
fn test_timestamp_has_reached() {
    let deadline = Timestamp::from_millis(5000);
    assert!(!Timestamp::from_millis(4999).has_reached(deadline));
    assert!(Timestamp::from_millis(5000).has_reached(deadline));
    assert!(Timestamp::from_millis(5001).has_reached(deadline));
}

#[test]
fn test_timestamp_has_reached_across_wrap() {
    let start = Timestamp::from_millis(u32::MAX - 2000);
    let deadline = start.offset_by(5000);

    assert!(!start.has_reached(deadline));
    assert!(!Timestamp::from_millis(u32::MAX).has_reached(deadline));
    assert!(!start.offset_by(4999).has_reached(deadline));
    assert!(start.offset_by(5000).has_reached(deadline));
}

#[test]
fn test_timestamp_horizon_clamp() {
    let t = Timestamp::from_millis(10).offset_by(u32::MAX);
    assert_eq!(t.elapsed_since(Timestamp::from_millis(10)), Timestamp::MAX_HORIZON_MS);
    assert!(!Timestamp::from_millis(10).has_reached(t));
}

#[test]
fn test_timestamp_debug_format() {
    let text = format!("{:?}", Timestamp::from_millis(42));
    assert_eq!(text, "Timestamp(42 ms)");
}

// =============================================================================
// TxParams Tests
// =============================================================================

#[test]
fn test_tx_params_new() {
    let p = TxParams::new(1_234_567, 2, 32);
    assert_eq!(p.code, 1_234_567);
    assert_eq!(p.protocol, 2);
    assert_eq!(p.bit_width, 32);
}

#[test]
fn test_tx_params_zero_code_is_empty() {
    assert!(TxParams::new(0, 1, 24).is_empty());
    assert!(!TxParams::new(1, 1, 24).is_empty());
    assert!(TxParams::default().is_empty());
}

#[test]
fn test_tx_params_out_of_range_values_kept() {
    // No validation: unusual protocols and widths pass through unchanged
    let p = TxParams::new(7, 200, 64);
    assert_eq!(p.protocol, 200);
    assert_eq!(p.bit_width, 64);
}

// =============================================================================
// ModeKind Tests
// =============================================================================

#[test]
fn test_mode_kind_default_is_idle() {
    assert_eq!(ModeKind::default(), ModeKind::Idle);
}

#[test]
fn test_mode_kind_names() {
    assert_eq!(ModeKind::Idle.as_str(), "idle");
    assert_eq!(ModeKind::Continuous.as_str(), "continuous");
    assert_eq!(ModeKind::SinglePulse.as_str(), "single");
    assert_eq!(ModeKind::Timer.as_str(), "timer");
}

#[test]
fn test_mode_kind_display_matches_name() {
    assert_eq!(ModeKind::Continuous.to_string(), "continuous");
}

#[test]
fn test_mode_kind_pending() {
    assert!(!ModeKind::Idle.is_pending());
    assert!(ModeKind::Continuous.is_pending());
    assert!(ModeKind::SinglePulse.is_pending());
    assert!(ModeKind::Timer.is_pending());
}

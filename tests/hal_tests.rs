//! HAL Driver Tests
//!
//! Tests for the status LED and RF transmitter against mock pins
//! Run with: cargo test --test hal_tests

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use rf_panel::control::{IndicatorOutput, Transmitter};
use rf_panel::hal::gpio::{LedState, StatusLed};
use rf_panel::hal::transmitter::RfTransmitter;
use rf_panel::rf::encoder::{encode_frame, RfProtocol};

// =============================================================================
// Mocks
// =============================================================================

/// One event on the shared timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Event {
    Level(bool),
    Wait(u32),
}

type Timeline = Rc<RefCell<Vec<Event>>>;

struct MockPin {
    timeline: Timeline,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.timeline.borrow_mut().push(Event::Level(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.timeline.borrow_mut().push(Event::Level(true));
        Ok(())
    }
}

struct MockDelay {
    timeline: Timeline,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.timeline.borrow_mut().push(Event::Wait(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.timeline.borrow_mut().push(Event::Wait(us));
    }
}

fn timeline() -> Timeline {
    Rc::new(RefCell::new(Vec::new()))
}

fn transmitter(t: &Timeline, repeats: u8) -> RfTransmitter<MockPin, MockDelay> {
    RfTransmitter::new(
        MockPin {
            timeline: t.clone(),
        },
        MockDelay {
            timeline: t.clone(),
        },
        repeats,
    )
}

fn led(t: &Timeline, active_lit: bool) -> StatusLed<MockPin> {
    StatusLed::new(
        MockPin {
            timeline: t.clone(),
        },
        active_lit,
    )
}

// =============================================================================
// Status LED Tests
// =============================================================================

#[test]
fn test_led_state_from_lit() {
    assert_eq!(LedState::from_lit(true), LedState::On);
    assert_eq!(LedState::from_lit(false), LedState::Off);
}

#[test]
fn test_led_starts_off() {
    let t = timeline();
    let led = led(&t, true);
    assert_eq!(led.state(), LedState::Off);
    assert_eq!(*t.borrow(), vec![Event::Level(false)]);
}

#[test]
fn test_led_on_off() {
    let t = timeline();
    let mut led = led(&t, true);
    led.on();
    assert_eq!(led.state(), LedState::On);
    led.off();
    assert_eq!(led.state(), LedState::Off);
    assert_eq!(
        *t.borrow(),
        vec![Event::Level(false), Event::Level(true), Event::Level(false)]
    );
}

#[test]
fn test_led_set_skips_unchanged() {
    let t = timeline();
    let mut led = led(&t, true);
    led.set(LedState::Off);
    led.set(LedState::On);
    led.set(LedState::On);
    assert_eq!(*t.borrow(), vec![Event::Level(false), Event::Level(true)]);
}

#[test]
fn test_indicator_active_dark() {
    // Resting lights the LED, active darkens it
    let t = timeline();
    let mut led = led(&t, false);
    led.set_indicator(false);
    assert_eq!(led.state(), LedState::On);
    led.set_indicator(true);
    assert_eq!(led.state(), LedState::Off);
}

#[test]
fn test_indicator_active_lit() {
    let t = timeline();
    let mut led = led(&t, true);
    led.set_indicator(true);
    assert_eq!(led.state(), LedState::On);
    led.set_indicator(false);
    assert_eq!(led.state(), LedState::Off);
}

#[test]
fn test_led_into_inner() {
    let t = timeline();
    let led = led(&t, true);
    let mut pin = led.into_inner();
    pin.set_high().unwrap();
    assert_eq!(t.borrow().last(), Some(&Event::Level(true)));
}

// =============================================================================
// RF Transmitter Tests
// =============================================================================

#[test]
fn test_transmitter_idles_low() {
    let t = timeline();
    let tx = transmitter(&t, 3);
    assert_eq!(tx.repeats(), 3);
    assert_eq!(*t.borrow(), vec![Event::Level(false)]);
}

#[test]
fn test_transmitter_repeats_at_least_once() {
    let t = timeline();
    let mut tx = transmitter(&t, 0);
    assert_eq!(tx.repeats(), 1);
    tx.set_repeats(0);
    assert_eq!(tx.repeats(), 1);
    tx.set_repeats(5);
    assert_eq!(tx.repeats(), 5);
}

#[test]
fn test_transmit_emits_frame_repeats() {
    let t = timeline();
    let mut tx = transmitter(&t, 3);
    t.borrow_mut().clear();

    tx.transmit(1, 0b101, 3);

    let frame = encode_frame(RfProtocol::resolve(1), 0b101, 3);
    let mut expected = Vec::new();
    for _ in 0..3 {
        for pulse in &frame {
            expected.push(Event::Level(pulse.high));
            expected.push(Event::Wait(pulse.duration_us));
        }
    }
    expected.push(Event::Level(false));
    assert_eq!(*t.borrow(), expected);
}

#[test]
fn test_transmit_unknown_protocol_uses_fallback() {
    let t = timeline();
    let mut tx = transmitter(&t, 1);
    t.borrow_mut().clear();
    tx.transmit(42, 1, 1);

    // Protocol 1 "one" symbol: 3 x 350 high, 1 x 350 low
    assert_eq!(t.borrow()[0], Event::Level(true));
    assert_eq!(t.borrow()[1], Event::Wait(1050));
}

#[test]
fn test_transmit_ends_low() {
    let t = timeline();
    let mut tx = transmitter(&t, 2);
    tx.transmit(6, 0xABC, 12);
    assert_eq!(t.borrow().last(), Some(&Event::Level(false)));
}

#[test]
fn test_transmit_through_mut_ref() {
    fn send<T: Transmitter>(mut tx: T) {
        tx.transmit(1, 1, 1);
    }
    let t = timeline();
    let mut tx = transmitter(&t, 1);
    send(&mut tx);
    let waits = t
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::Wait(_)))
        .count();
    assert_eq!(waits, 4);
}

#[test]
fn test_transmitter_release() {
    let t = timeline();
    let tx = transmitter(&t, 1);
    let (mut pin, mut delay) = tx.release();
    pin.set_high().unwrap();
    delay.delay_us(7);
    assert_eq!(t.borrow().last(), Some(&Event::Wait(7)));
}

//! GPIO Abstractions
//!
//! Type-safe GPIO pin wrappers for the RF panel.
//! Provides semantic meaning to pins through the type system.

use embedded_hal::digital::OutputPin;

use crate::control::IndicatorOutput;

/// Status LED state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

impl LedState {
    /// State for a boolean "lit" level
    #[must_use]
    pub const fn from_lit(lit: bool) -> Self {
        if lit {
            Self::On
        } else {
            Self::Off
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// Status LED driver
///
/// Maps the indicator's active/resting states onto a lit or dark LED
/// according to `active_lit`. Writes to the pin only on change.
pub struct StatusLed<P: OutputPin> {
    pin: P,
    state: LedState,
    active_lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Create a status LED (initially off)
    ///
    /// `active_lit` selects whether the active indicator state lights the LED.
    pub fn new(pin: P, active_lit: bool) -> Self {
        let mut led = Self {
            pin,
            state: LedState::On,
            active_lit,
        };
        led.off();
        led
    }

    /// Turn LED on
    pub fn on(&mut self) {
        let _ = self.pin.set_high();
        self.state = LedState::On;
    }

    /// Turn LED off
    pub fn off(&mut self) {
        let _ = self.pin.set_low();
        self.state = LedState::Off;
    }

    /// Set LED state, skipping the pin write if unchanged
    pub fn set(&mut self, state: LedState) {
        if state == self.state {
            return;
        }
        match state {
            LedState::On => self.on(),
            LedState::Off => self.off(),
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }

    /// Release the pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> IndicatorOutput for StatusLed<P> {
    fn set_indicator(&mut self, active: bool) {
        self.set(LedState::from_lit(active == self.active_lit));
    }
}

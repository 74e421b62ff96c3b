//! RF Transmitter Driver
//!
//! Bit-bangs encoded frames onto the data pin of a 433 MHz OOK module.
//! Timing comes from a blocking [`DelayNs`]; on target that is
//! `embassy_time::Delay`, which busy-waits on the timer peripheral.
//!
//! A 24-bit protocol 1 frame takes ~45 ms, so a full transmission with
//! three repeats holds the executor for roughly 135 ms.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::control::Transmitter;
use crate::rf::encoder::{encode_frame, Pulse, RfProtocol};

/// OOK transmitter on a single GPIO
pub struct RfTransmitter<P: OutputPin, D: DelayNs> {
    pin: P,
    delay: D,
    repeats: u8,
}

impl<P: OutputPin, D: DelayNs> RfTransmitter<P, D> {
    /// Create a transmitter; the data line is driven low
    pub fn new(pin: P, delay: D, repeats: u8) -> Self {
        let mut tx = Self {
            pin,
            delay,
            repeats: repeats.max(1),
        };
        let _ = tx.pin.set_low();
        tx
    }

    /// Frames sent per transmission
    #[must_use]
    pub const fn repeats(&self) -> u8 {
        self.repeats
    }

    /// Set frames sent per transmission (at least one)
    pub fn set_repeats(&mut self, repeats: u8) {
        self.repeats = repeats.max(1);
    }

    fn emit(&mut self, pulse: Pulse) {
        let _ = if pulse.high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.delay.delay_us(pulse.duration_us);
    }

    /// Release pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, D: DelayNs> Transmitter for RfTransmitter<P, D> {
    fn transmit(&mut self, protocol: u8, code: u32, bit_width: u8) {
        let frame = encode_frame(RfProtocol::resolve(protocol), code, bit_width);
        for _ in 0..self.repeats {
            for &pulse in &frame {
                self.emit(pulse);
            }
        }
        // Leave the carrier off between transmissions
        let _ = self.pin.set_low();
    }
}

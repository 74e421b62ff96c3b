//! Transmission Control Logic
//!
//! State machines and business logic for the RF panel.
//! Implements the functional core: everything here is driven by explicit
//! timestamps and talks to hardware only through the traits below.

pub mod indicator;
pub mod mode;
pub mod scheduler;

use crate::protocol::{Command, Response};

/// RF transmit driver boundary
///
/// Fire-and-forget: the call returns once the waveform has been emitted
/// and reports nothing back.
pub trait Transmitter {
    /// Emit `code` as `bit_width` bits using RF protocol `protocol`
    fn transmit(&mut self, protocol: u8, code: u32, bit_width: u8);
}

/// Status indicator boundary
pub trait IndicatorOutput {
    /// Drive the indicator to its active (`true`) or resting (`false`) state
    fn set_indicator(&mut self, active: bool);
}

/// Source of inbound requests serviced at the start of each tick
pub trait RequestSource {
    /// Take the next pending command, if any
    fn next_request(&mut self) -> Option<Command>;

    /// Deliver the response for the command most recently taken
    fn respond(&mut self, response: Response);
}

impl<T: Transmitter + ?Sized> Transmitter for &mut T {
    fn transmit(&mut self, protocol: u8, code: u32, bit_width: u8) {
        (**self).transmit(protocol, code, bit_width);
    }
}

impl<L: IndicatorOutput + ?Sized> IndicatorOutput for &mut L {
    fn set_indicator(&mut self, active: bool) {
        (**self).set_indicator(active);
    }
}

/// A request source with nothing pending
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRequests;

impl RequestSource for NoRequests {
    fn next_request(&mut self) -> Option<Command> {
        None
    }

    fn respond(&mut self, _response: Response) {}
}

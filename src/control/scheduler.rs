//! Scheduler State Machine
//!
//! Coordinates the single RF transmit line and the status indicator.
//! An outer driver calls [`Scheduler::tick`] on a fixed cadence with the
//! current time; each tick services pending requests and then runs at most
//! one dispatch branch, in strict priority order:
//!
//! 1. Continuous session: indicator steady, transmit when the interval is due
//! 2. Single pulse armed: transmit, go idle, start after-glow
//! 3. Timer expired: transmit, go idle, start after-glow
//! 4. After-glow pending: revert the indicator once its deadline passes
//! 5. Otherwise: indicator at rest
//!
//! Nothing in a tick blocks or waits.

use crate::control::indicator::Indicator;
use crate::control::mode::ModeState;
use crate::control::{IndicatorOutput, RequestSource, Transmitter};
use crate::protocol::{Command, Response, StatusReport};
use crate::types::{ModeKind, Timestamp, TxParams};

/// Branch taken by one dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Continuous session active (`sent` if the interval elapsed this tick)
    Continuous {
        /// A transmission was issued on this tick
        sent: bool,
    },
    /// Single pulse fired
    Pulse,
    /// Timer fired
    TimerFired,
    /// After-glow ended, indicator back at rest
    AfterGlowEnded,
    /// After-glow still running
    AfterGlow,
    /// Nothing to do
    Idle,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Dispatch {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Continuous { sent } => defmt::write!(f, "Continuous(sent={})", sent),
            Self::Pulse => defmt::write!(f, "Pulse"),
            Self::TimerFired => defmt::write!(f, "TimerFired"),
            Self::AfterGlowEnded => defmt::write!(f, "AfterGlowEnded"),
            Self::AfterGlow => defmt::write!(f, "AfterGlow"),
            Self::Idle => defmt::write!(f, "Idle"),
        }
    }
}

/// Owner of the mode state and indicator
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    state: ModeState,
    indicator: Indicator,
    /// Boot time, for uptime reporting
    booted: Timestamp,
    /// Driver invocations since boot
    transmissions: u32,
}

impl Scheduler {
    /// Create an idle scheduler booted at `now`
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self::with_indicator(now, Indicator::default())
    }

    /// Create an idle scheduler with a custom indicator
    #[must_use]
    pub const fn with_indicator(now: Timestamp, indicator: Indicator) -> Self {
        Self {
            state: ModeState::new(),
            indicator,
            booted: now,
            transmissions: 0,
        }
    }

    /// Get the mode state
    #[must_use]
    pub const fn mode_state(&self) -> &ModeState {
        &self.state
    }

    /// Get the armed mode kind
    #[must_use]
    pub const fn mode(&self) -> ModeKind {
        self.state.kind()
    }

    /// Get the indicator controller
    #[must_use]
    pub const fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Driver invocations since boot
    #[must_use]
    pub const fn transmissions(&self) -> u32 {
        self.transmissions
    }

    /// Build the status payload
    #[must_use]
    pub const fn status(&self, now: Timestamp) -> StatusReport {
        StatusReport {
            mode: self.state.kind(),
            uptime_ms: now.elapsed_since(self.booted),
            transmissions: self.transmissions,
        }
    }

    /// Apply one command and produce its response
    pub fn apply(&mut self, command: Command, now: Timestamp) -> Response {
        match command {
            Command::SendOnce(params) => {
                log_info!("send once: code={} proto={}", params.code, params.protocol);
                self.state.arm_once(params);
            }
            Command::StartContinuous {
                params,
                interval_ms,
            } => {
                log_info!("continuous: code={} every {}ms", params.code, interval_ms);
                self.state.arm_continuous(params, interval_ms);
            }
            Command::Stop => {
                log_info!("stop");
                self.state.stop();
            }
            Command::ArmTimer { params, delay_s } => {
                log_info!("timer: code={} in {}s", params.code, delay_s);
                self.state.arm_timer(params, delay_s, now);
            }
            Command::Status => return Response::Status(self.status(now)),
        }
        Response::Ack
    }

    /// Drain all pending requests, answering each one
    pub fn service<R: RequestSource + ?Sized>(&mut self, requests: &mut R, now: Timestamp) {
        while let Some(command) = requests.next_request() {
            let response = self.apply(command, now);
            requests.respond(response);
        }
    }

    /// Run one dispatch branch against the current mode
    pub fn dispatch<T, L>(&mut self, now: Timestamp, tx: &mut T, led: &mut L) -> Dispatch
    where
        T: Transmitter + ?Sized,
        L: IndicatorOutput,
    {
        match self.state.kind() {
            ModeKind::Continuous => {
                self.indicator.hold_active(led);
                let sent = self.state.continuous_due(now);
                if sent {
                    self.fire(tx);
                    self.state.mark_sent(now);
                }
                Dispatch::Continuous { sent }
            }
            ModeKind::SinglePulse => {
                self.indicator.start_after_glow(now, led);
                self.fire(tx);
                self.state.stop();
                Dispatch::Pulse
            }
            ModeKind::Timer if self.state.timer_expired(now) => {
                self.indicator.start_after_glow(now, led);
                self.fire(tx);
                self.state.stop();
                Dispatch::TimerFired
            }
            _ if self.indicator.after_glow_pending() => {
                if self.indicator.expire_after_glow(now, led) {
                    Dispatch::AfterGlowEnded
                } else {
                    Dispatch::AfterGlow
                }
            }
            _ => {
                self.indicator.rest(led);
                Dispatch::Idle
            }
        }
    }

    /// Service requests, then dispatch
    pub fn tick<R, T, L>(&mut self, now: Timestamp, requests: &mut R, tx: &mut T, led: &mut L) -> Dispatch
    where
        R: RequestSource + ?Sized,
        T: Transmitter + ?Sized,
        L: IndicatorOutput,
    {
        self.service(requests, now);
        self.dispatch(now, tx, led)
    }

    /// Invoke the driver unless the code is empty
    fn fire<T: Transmitter + ?Sized>(&mut self, tx: &mut T) {
        let params: TxParams = self.state.params();
        if params.is_empty() {
            log_debug!("empty code, transmission suppressed");
            return;
        }
        tx.transmit(params.protocol, params.code, params.bit_width);
        self.transmissions = self.transmissions.wrapping_add(1);
    }
}

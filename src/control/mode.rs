//! Mode State
//!
//! Holds which transmission mode is armed and the parameters for the next
//! transmission. Mode-specific data lives inside the variant, so arming a
//! new mode drops everything the previous session carried.

use crate::types::{ModeKind, Timestamp, TxParams};

/// Armed transmission mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Nothing pending
    #[default]
    Idle,
    /// Repeat every `interval_ms`
    Continuous {
        /// Minimum spacing between transmissions
        interval_ms: u32,
        /// Time of the last transmission in this session
        last_send: Option<Timestamp>,
    },
    /// Send once on the next tick
    SinglePulse,
    /// Send once when `deadline` is reached
    Timer {
        /// Absolute fire time
        deadline: Timestamp,
    },
}

impl Mode {
    /// Get the mode kind without its data
    #[must_use]
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Idle => ModeKind::Idle,
            Self::Continuous { .. } => ModeKind::Continuous,
            Self::SinglePulse => ModeKind::SinglePulse,
            Self::Timer { .. } => ModeKind::Timer,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Mode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::Continuous { interval_ms, .. } => {
                defmt::write!(f, "Continuous({}ms)", interval_ms);
            }
            Self::SinglePulse => defmt::write!(f, "SinglePulse"),
            Self::Timer { deadline } => defmt::write!(f, "Timer(@{})", deadline),
        }
    }
}

/// Mode state written by request handlers and consumed by the scheduler
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeState {
    mode: Mode,
    params: TxParams,
}

impl ModeState {
    /// Create an idle mode state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Idle,
            params: TxParams::new(0, 0, 0),
        }
    }

    /// Get the armed mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the armed mode kind
    #[must_use]
    pub const fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Get the parameters of the next transmission
    #[must_use]
    pub const fn params(&self) -> TxParams {
        self.params
    }

    /// Check if a transmission is pending
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.kind().is_pending()
    }

    /// Arm a single transmission on the next tick
    pub fn arm_once(&mut self, params: TxParams) {
        self.params = params;
        self.mode = Mode::SinglePulse;
    }

    /// Arm repeated transmission, first one on the next tick
    pub fn arm_continuous(&mut self, params: TxParams, interval_ms: u32) {
        self.params = params;
        self.mode = Mode::Continuous {
            interval_ms,
            last_send: None,
        };
    }

    /// Arm a single transmission `delay_s` seconds after `now`
    pub fn arm_timer(&mut self, params: TxParams, delay_s: u32, now: Timestamp) {
        self.params = params;
        self.mode = Mode::Timer {
            deadline: now.offset_by(delay_s.saturating_mul(1000)),
        };
    }

    /// Return to idle; takes effect on the next tick
    pub fn stop(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Whether a continuous session is due at `now`
    #[must_use]
    pub fn continuous_due(&self, now: Timestamp) -> bool {
        match self.mode {
            Mode::Continuous {
                interval_ms,
                last_send,
            } => last_send.map_or(true, |last| now.elapsed_since(last) >= interval_ms),
            _ => false,
        }
    }

    /// Record a continuous transmission at `now`
    pub fn mark_sent(&mut self, now: Timestamp) {
        if let Mode::Continuous { last_send, .. } = &mut self.mode {
            *last_send = Some(now);
        }
    }

    /// Whether an armed timer has expired at `now`
    #[must_use]
    pub fn timer_expired(&self, now: Timestamp) -> bool {
        matches!(self.mode, Mode::Timer { deadline } if now.has_reached(deadline))
    }
}

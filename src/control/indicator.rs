//! Status Indicator
//!
//! The indicator has two policies, the steady one taking precedence:
//!
//! - **Steady**: held active on every tick while a continuous session runs
//! - **After-glow**: a fixed-length active pulse after a single transmission
//!   or a fired timer, tracked by its own deadline
//!
//! Outside both, the indicator rests.

use crate::types::Timestamp;

use super::IndicatorOutput;

/// What the indicator is currently showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IndicatorState {
    /// Ready, nothing sending
    #[default]
    Resting,
    /// Held active by a continuous session
    Steady,
    /// Active until the after-glow deadline
    AfterGlow,
}

#[cfg(feature = "embedded")]
impl defmt::Format for IndicatorState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Resting => defmt::write!(f, "Resting"),
            Self::Steady => defmt::write!(f, "Steady"),
            Self::AfterGlow => defmt::write!(f, "AfterGlow"),
        }
    }
}

/// Indicator controller
#[derive(Clone, Copy, Debug)]
pub struct Indicator {
    state: IndicatorState,
    /// Reversion time for the after-glow policy
    off_deadline: Option<Timestamp>,
    /// After-glow length in milliseconds
    after_glow_ms: u32,
}

impl Indicator {
    /// Create a resting indicator with the given after-glow length
    #[must_use]
    pub const fn new(after_glow_ms: u32) -> Self {
        Self {
            state: IndicatorState::Resting,
            off_deadline: None,
            after_glow_ms,
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> IndicatorState {
        self.state
    }

    /// Check if the indicator is in its active state
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, IndicatorState::Resting)
    }

    /// Pending after-glow reversion time
    #[must_use]
    pub const fn off_deadline(&self) -> Option<Timestamp> {
        self.off_deadline
    }

    /// Configured after-glow length
    #[must_use]
    pub const fn after_glow_ms(&self) -> u32 {
        self.after_glow_ms
    }

    /// Steady policy: hold active for this tick
    ///
    /// Cancels any pending after-glow.
    pub fn hold_active<L: IndicatorOutput>(&mut self, out: &mut L) {
        self.state = IndicatorState::Steady;
        self.off_deadline = None;
        out.set_indicator(true);
    }

    /// After-glow policy: go active now and schedule reversion
    pub fn start_after_glow<L: IndicatorOutput>(&mut self, now: Timestamp, out: &mut L) {
        self.state = IndicatorState::AfterGlow;
        self.off_deadline = Some(now.offset_by(self.after_glow_ms));
        out.set_indicator(true);
    }

    /// Whether an after-glow is still pending
    #[must_use]
    pub const fn after_glow_pending(&self) -> bool {
        self.off_deadline.is_some()
    }

    /// Revert to rest once the after-glow deadline passes
    ///
    /// Returns true if the after-glow ended on this call. Before the
    /// deadline the output is left untouched.
    pub fn expire_after_glow<L: IndicatorOutput>(&mut self, now: Timestamp, out: &mut L) -> bool {
        match self.off_deadline {
            Some(deadline) if now.has_reached(deadline) => {
                self.off_deadline = None;
                self.rest(out);
                true
            }
            _ => false,
        }
    }

    /// Hold the resting state
    pub fn rest<L: IndicatorOutput>(&mut self, out: &mut L) {
        self.state = IndicatorState::Resting;
        out.set_indicator(false);
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new(crate::config::INDICATOR_AFTER_GLOW_MS)
    }
}

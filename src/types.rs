//! Shared types used across the RF panel firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Millisecond timestamp on a free-running 32-bit counter
///
/// The counter wraps after ~49.7 days. All comparisons use wrapping
/// unsigned differences, so ordering is only meaningful between
/// timestamps less than `i32::MAX` milliseconds apart.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp(u32);

impl Timestamp {
    /// Counter origin (boot)
    pub const ZERO: Self = Self(0);

    /// Largest offset that still compares correctly across a wrap
    pub const MAX_HORIZON_MS: u32 = i32::MAX as u32;

    /// Create a timestamp from a raw millisecond count
    #[must_use]
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Create a timestamp from a 64-bit uptime, keeping the low 32 bits
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_uptime_ms(ms: u64) -> Self {
        Self(ms as u32)
    }

    /// Get the raw millisecond count
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Timestamp `ms` milliseconds later, clamped to the comparison horizon
    #[must_use]
    pub const fn offset_by(self, ms: u32) -> Self {
        let ms = if ms > Self::MAX_HORIZON_MS {
            Self::MAX_HORIZON_MS
        } else {
            ms
        };
        Self(self.0.wrapping_add(ms))
    }

    /// Milliseconds elapsed since `earlier`
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Check whether this timestamp is at or past `deadline`
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn has_reached(self, deadline: Self) -> bool {
        (self.0.wrapping_sub(deadline.0) as i32) >= 0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({} ms)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Timestamp {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}ms", self.0);
    }
}

/// Parameters of one RF transmission
///
/// Captured when a request arrives and kept until the next request
/// overwrites them. Values are not range checked here; the transmit
/// driver decides what to do with unusual protocols or widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TxParams {
    /// Code to send
    pub code: u32,
    /// RF protocol id (1-based)
    pub protocol: u8,
    /// Number of code bits to send
    pub bit_width: u8,
}

impl TxParams {
    /// Create new transmission parameters
    #[must_use]
    pub const fn new(code: u32, protocol: u8, bit_width: u8) -> Self {
        Self {
            code,
            protocol,
            bit_width,
        }
    }

    /// A zero code means there is nothing to send
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code == 0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxParams {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "code={} proto={} bits={}",
            self.code,
            self.protocol,
            self.bit_width
        );
    }
}

/// Which transmission mode is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ModeKind {
    /// Nothing pending
    #[default]
    Idle,
    /// Repeating on an interval
    Continuous,
    /// One transmission on the next tick
    SinglePulse,
    /// One transmission once a deadline passes
    Timer,
}

impl ModeKind {
    /// Short lowercase name used in status payloads
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Continuous => "continuous",
            Self::SinglePulse => "single",
            Self::Timer => "timer",
        }
    }

    /// Check if a transmission is pending in this mode
    #[must_use]
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ModeKind {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.as_str());
    }
}

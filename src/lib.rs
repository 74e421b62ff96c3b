//! RF Panel Firmware Library
//!
//! This library provides the core functionality for a Pico W based
//! 433 MHz RF remote control panel. A small web page served over a
//! soft access point lets a user send a code once, repeat it on an
//! interval, or send it after a delay.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │   Scheduler  │  Mode State  │  Indicator  │  HTTP Routes     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RF LAYER                                │
//! │   Protocol table  │  Pulse encoder                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / NETWORK LAYER                        │
//! │   GPIO (LED, TX line)  │  CYW43 soft AP  │  TCP server        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: the scheduler is a pure
//!   `tick(now)` state machine; hardware and network live at the edges
//! - **Type-driven design**: mode-specific data lives inside the mode
//!   variant, so only one transmission mode can ever be pending
//! - **Explicit error handling**: requests are parsed once into a typed
//!   [`protocol::Command`] and failures carry a [`protocol::ParseError`]
//! - **No unsafe in application code**

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_net;
#[cfg(feature = "embedded")]
pub use embassy_rp;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Logging macros
///
/// Route to `defmt` on target, compile to nothing on the host.
#[macro_use]
pub mod logging;

/// Hardware Abstraction Layer
///
/// Status LED and RF transmit line drivers over `embedded-hal` traits.
pub mod hal;

/// Network Subsystem
///
/// CYW43 soft access point and the HTTP server task.
#[cfg(feature = "embedded")]
pub mod net;

/// RF Encoding
///
/// 433 MHz OOK protocol table and pulse encoder.
pub mod rf;

/// Transmission Control Logic
///
/// Mode state, indicator policies and the scheduler state machine.
pub mod control;

/// Communication Protocols
///
/// HTTP request parsing, typed commands and response formatting.
pub mod protocol;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}

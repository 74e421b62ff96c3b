//! Logging abstraction
//!
//! Unified logging macros for library code:
//! - Embedded: forwards to `defmt` (transported over RTT)
//! - Host: arguments are type-checked, nothing is emitted
//!
//! Only use plain `{}` placeholders so the same format string is valid for
//! both `defmt` and `core::fmt`.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::info!($($arg)*);

        #[cfg(not(feature = "embedded"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::warn!($($arg)*);

        #[cfg(not(feature = "embedded"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::debug!($($arg)*);

        #[cfg(not(feature = "embedded"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

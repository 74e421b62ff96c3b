//! Hardware Abstraction Layer
//!
//! Drivers for the panel's two outputs: the status LED and the RF
//! transmitter data line. Both are generic over `embedded-hal` traits so
//! the same code runs against `embassy-rp` pins on target and mock pins in
//! host tests.

pub mod gpio;
pub mod transmitter;

//! RF Encoding
//!
//! OOK pulse encoding for common 433 MHz remote-control protocols.

pub mod encoder;

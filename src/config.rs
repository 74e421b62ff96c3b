//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the RF panel hardware.
//! All pin mappings, timing defaults, and network parameters are centralized here.

use crate::types::TxParams;

/// Scheduler tick period in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1;

/// After-glow duration following a single pulse or a fired timer
pub const INDICATOR_AFTER_GLOW_MS: u32 = 100;

/// Indicator LED level in the active state
///
/// The panel shows a lit LED while ready and darkens it while sending.
pub const INDICATOR_ACTIVE_LIT: bool = false;

/// Default RF protocol id when a request omits it
pub const DEFAULT_PROTOCOL: u8 = 1;

/// Default code width in bits when a request omits it
pub const DEFAULT_BIT_WIDTH: u8 = 24;

/// Default continuous interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u32 = 500;

/// Default timer delay in seconds
pub const DEFAULT_TIMER_DELAY_S: u32 = 5;

/// Widest code the encoder can emit
pub const MAX_CODE_BITS: u8 = 32;

/// Number of times each frame is repeated per transmission
pub const TX_REPEAT_COUNT: u8 = 3;

/// HTTP listen port
pub const HTTP_PORT: u16 = 80;

/// Largest accepted HTTP request (head + body)
pub const MAX_REQUEST_SIZE: usize = 1024;

/// Capacity of a rendered HTTP response body (excluding the index page)
pub const MAX_RESPONSE_BODY: usize = 128;

/// TCP socket receive buffer size
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP socket transmit buffer size
pub const TCP_TX_BUFFER_SIZE: usize = 4096;

/// Idle timeout on a client connection in seconds
pub const HTTP_SOCKET_TIMEOUT_S: u64 = 10;

/// Depth of the request and reply channels between server and scheduler
pub const REQUEST_QUEUE_DEPTH: usize = 1;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// RF transmitter data line
    pub const RF_TX: &str = "PIN_12";

    /// Status indicator LED
    pub const LED_STATUS: &str = "PIN_15";

    /// CYW43 power enable (on-module)
    pub const WL_ON: &str = "PIN_23";

    /// CYW43 SPI data (on-module)
    pub const WL_DATA: &str = "PIN_24";

    /// CYW43 SPI chip select (on-module)
    pub const WL_CS: &str = "PIN_25";

    /// CYW43 SPI clock (on-module)
    pub const WL_CLK: &str = "PIN_29";
}

/// Soft access point parameters
pub mod network {
    //! Wireless access point settings

    /// Access point SSID
    pub const AP_SSID: &str = "RF-Editor";

    /// WPA2 passphrase (8-63 characters)
    pub const AP_PASSPHRASE: &str = "12345678";

    /// 2.4 GHz channel
    pub const AP_CHANNEL: u8 = 5;

    /// Panel address on the access point subnet
    pub const AP_ADDRESS: [u8; 4] = [192, 168, 4, 1];

    /// Subnet prefix length
    pub const AP_PREFIX_LEN: u8 = 24;

    /// Number of sockets reserved in the network stack
    pub const STACK_SOCKETS: usize = 4;

    /// Network stack random seed
    pub const STACK_SEED: u64 = 0x5246_2d45_6469_746f;

    /// Last octet of the first address leased to clients
    pub const DHCP_POOL_START: u8 = 2;

    /// Number of addresses in the lease pool
    pub const DHCP_POOL_SIZE: usize = 8;

    /// Lease duration in seconds
    pub const DHCP_LEASE_SECS: u32 = 2 * 60 * 60;
}

/// Build the parameters applied when a request gives only a code
#[must_use]
pub const fn default_params(code: u32) -> TxParams {
    TxParams::new(code, DEFAULT_PROTOCOL, DEFAULT_BIT_WIDTH)
}

//! Network Subsystem
//!
//! Provides the wireless side of the panel:
//! - Soft access point on the CYW43439
//! - DHCP server task leasing addresses to joining clients
//! - HTTP server task serving the control page and commands
//! - Request/reply channels linking the server to the scheduler loop

pub mod dhcp;
pub mod http;
pub mod link;
pub mod wifi;

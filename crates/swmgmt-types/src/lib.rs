//! Common types for the switch management agent.
//!
//! This crate provides the address primitives shared by the hardware adapter
//! and the route synchronization daemon:
//!
//! - [`Ipv4Prefix`]: IPv4 network prefixes in CIDR notation
//! - [`parse_ipv4_host`]: strict IPv4 host address parsing

mod ip;

pub use ip::{parse_ipv4_host, Ipv4Prefix};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("unsupported address family: {0} (only IPv4 is supported)")]
    UnsupportedFamily(String),
}

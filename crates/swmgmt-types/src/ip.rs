//! IPv4 prefix and host types with strict parsing.

use crate::ParseError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// An IPv4 network prefix in CIDR notation (e.g., 10.0.0.0/24).
///
/// The network address is always canonical: host bits below the prefix
/// length are cleared on construction, so `10.0.0.7/24` and `10.0.0.0/24`
/// are the same prefix. Two prefixes over the same address with different
/// lengths are distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Prefix {
    network: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Prefix {
    /// The catch-all route 0.0.0.0/0.
    pub const DEFAULT: Self = Ipv4Prefix {
        network: Ipv4Addr::UNSPECIFIED,
        prefix_len: 0,
    };

    /// Creates a new prefix, masking off host bits.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length exceeds 32.
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Result<Self, ParseError> {
        if prefix_len > 32 {
            return Err(ParseError::InvalidIpPrefix(format!(
                "prefix length {} exceeds maximum 32",
                prefix_len
            )));
        }

        let network = Ipv4Addr::from(u32::from(address) & mask_bits(prefix_len));
        Ok(Ipv4Prefix {
            network,
            prefix_len,
        })
    }

    /// Returns the network address of this prefix.
    pub const fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Returns the prefix length in bits.
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns the netmask (e.g., 255.255.255.0 for /24).
    pub fn netmask(&self) -> Ipv4Addr {
        Ipv4Addr::from(mask_bits(self.prefix_len))
    }

    /// Returns true if `addr` falls inside this prefix.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & mask_bits(self.prefix_len) == u32::from(self.network)
    }

    /// Returns true if this is the default route (0.0.0.0/0).
    pub const fn is_default(&self) -> bool {
        self.prefix_len == 0
    }

    /// Returns true if this is a host route (/32).
    pub const fn is_host(&self) -> bool {
        self.prefix_len == 32
    }
}

fn mask_bits(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        len => u32::MAX << (32 - u32::from(len)),
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl FromStr for Ipv4Prefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .split_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;

        let address = match addr_str.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => addr,
            Ok(IpAddr::V6(_)) => {
                // Well-formed, but there is no IPv4 prefix length to take from it.
                return Err(ParseError::UnsupportedFamily(s.to_string()));
            }
            Err(_) => return Err(ParseError::InvalidIpPrefix(s.to_string())),
        };

        if len_str.is_empty() || !len_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidIpPrefix(s.to_string()));
        }
        let prefix_len: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;

        Ipv4Prefix::new(address, prefix_len)
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))
    }
}

/// Parses an IPv4 host address such as a nexthop.
///
/// IPv6 literals are rejected with [`ParseError::UnsupportedFamily`].
pub fn parse_ipv4_host(s: &str) -> Result<Ipv4Addr, ParseError> {
    match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => Ok(addr),
        Ok(IpAddr::V6(_)) => Err(ParseError::UnsupportedFamily(s.to_string())),
        Err(_) => Err(ParseError::InvalidIpAddress(s.to_string())),
    }
}

//! Wire messages for the `routemgmt.RouteMgmt` gRPC service.
//!
//! Field numbers are part of the wire contract with the routing agent and
//! must not be changed.

/// An IPv4 network in CIDR notation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ipv4Network {
    #[prost(string, tag = "1")]
    pub cidr4: ::prost::alloc::string::String,
}

/// A single IPv4 host address.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ipv4Host {
    #[prost(string, tag = "1")]
    pub ip4: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddRoute4Request {
    #[prost(message, optional, tag = "1")]
    pub network: ::core::option::Option<Ipv4Network>,
    #[prost(message, optional, tag = "2")]
    pub next_hop: ::core::option::Option<Ipv4Host>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WithdrawRoute4Request {
    #[prost(message, optional, tag = "1")]
    pub network: ::core::option::Option<Ipv4Network>,
}

/// Outcome of a route operation. `error` is empty on success.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RouteMgmtResult {
    #[prost(enumeration = "route_mgmt_result::Result", tag = "1")]
    pub result: i32,
    #[prost(string, tag = "2")]
    pub error: ::prost::alloc::string::String,
}

pub mod route_mgmt_result {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Result {
        Success = 0,
        Failed = 1,
    }
}

impl RouteMgmtResult {
    pub fn success() -> Self {
        Self {
            result: route_mgmt_result::Result::Success as i32,
            error: String::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            result: route_mgmt_result::Result::Failed as i32,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result() == route_mgmt_result::Result::Success
    }
}

impl AddRoute4Request {
    pub fn new(cidr4: impl Into<String>, ip4: impl Into<String>) -> Self {
        Self {
            network: Some(Ipv4Network {
                cidr4: cidr4.into(),
            }),
            next_hop: Some(Ipv4Host { ip4: ip4.into() }),
        }
    }
}

impl WithdrawRoute4Request {
    pub fn new(cidr4: impl Into<String>) -> Self {
        Self {
            network: Some(Ipv4Network {
                cidr4: cidr4.into(),
            }),
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/routemgmt.RouteMgmt.rs"));

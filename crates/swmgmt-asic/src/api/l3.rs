//! L3 forwarding table interface.
//!
//! This is the whole contract between the route synchronization engine and
//! the forwarding hardware. Implementations wrap a vendor SDK (or, for
//! [`crate::SoftAsic`], plain in-memory tables); callers assume nothing
//! beyond success or failure of each call.

use crate::error::AsicResult;
use crate::types::EgressId;
use std::net::Ipv4Addr;
use swmgmt_types::Ipv4Prefix;

/// L3 programming operations used by the route engine.
///
/// All routes live in VRF 0. Methods take `&mut self` because every caller
/// holds the switch-wide lock while programming hardware.
pub trait L3Api: Send {
    /// Creates the egress object that punts packets to the CPU for
    /// software routing (L2-to-CPU).
    fn create_cpu_egress(&mut self) -> AsicResult<EgressId>;

    /// Installs the catch-all 0.0.0.0/0 route pointing at `egress`.
    ///
    /// The LPM table requires this entry so that a lookup miss is defined.
    fn install_default_route(&mut self, egress: EgressId) -> AsicResult<()>;

    /// Installs a route for `network` pointing at `egress`.
    fn install_route(&mut self, network: Ipv4Prefix, egress: EgressId) -> AsicResult<()>;

    /// Removes the route for `network`.
    fn remove_route(&mut self, network: Ipv4Prefix) -> AsicResult<()>;

    /// Installs a host entry resolving `ip` to `egress`.
    fn install_host(&mut self, ip: Ipv4Addr, egress: EgressId) -> AsicResult<()>;
}

impl<T: L3Api + ?Sized> L3Api for Box<T> {
    fn create_cpu_egress(&mut self) -> AsicResult<EgressId> {
        (**self).create_cpu_egress()
    }

    fn install_default_route(&mut self, egress: EgressId) -> AsicResult<()> {
        (**self).install_default_route(egress)
    }

    fn install_route(&mut self, network: Ipv4Prefix, egress: EgressId) -> AsicResult<()> {
        (**self).install_route(network, egress)
    }

    fn remove_route(&mut self, network: Ipv4Prefix) -> AsicResult<()> {
        (**self).remove_route(network)
    }

    fn install_host(&mut self, ip: Ipv4Addr, egress: EgressId) -> AsicResult<()> {
        (**self).install_host(ip, egress)
    }
}

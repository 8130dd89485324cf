//! In-memory L3 forwarding tables.
//!
//! `SoftAsic` stands in for the hardware when no vendor SDK is linked. It
//! enforces the same table semantics the chip does: an entry may only be
//! added once, only existing entries can be removed, every entry must point
//! at an existing egress object, and tables have a fixed size.

use crate::api::L3Api;
use crate::error::{AsicError, AsicResult};
use crate::types::{EgressId, Unit};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use swmgmt_types::Ipv4Prefix;
use tracing::debug;

/// Table sizes for [`SoftAsic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftAsicConfig {
    pub route_table_size: usize,
    pub host_table_size: usize,
}

impl Default for SoftAsicConfig {
    fn default() -> Self {
        Self {
            route_table_size: 163_840,
            host_table_size: 16_384,
        }
    }
}

/// Number of calls made per L3 operation.
///
/// Counted on entry, whether or not the call succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L3Counters {
    pub egress_creates: u64,
    pub default_route_installs: u64,
    pub route_installs: u64,
    pub route_removals: u64,
    pub host_installs: u64,
}

/// Software implementation of [`L3Api`].
#[derive(Debug)]
pub struct SoftAsic {
    unit: Unit,
    config: SoftAsicConfig,
    next_egress: i32,
    /// CPU egress objects created so far.
    egress: HashSet<EgressId>,
    routes: HashMap<Ipv4Prefix, EgressId>,
    hosts: HashMap<Ipv4Addr, EgressId>,
    counters: L3Counters,
}

impl SoftAsic {
    /// Creates empty tables with default sizes.
    pub fn new(unit: Unit) -> Self {
        Self::with_config(unit, SoftAsicConfig::default())
    }

    pub fn with_config(unit: Unit, config: SoftAsicConfig) -> Self {
        Self {
            unit,
            config,
            next_egress: EgressId::BASE,
            egress: HashSet::new(),
            routes: HashMap::new(),
            hosts: HashMap::new(),
            counters: L3Counters::default(),
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Returns the egress a route points at, if installed.
    pub fn route_egress(&self, network: &Ipv4Prefix) -> Option<EgressId> {
        self.routes.get(network).copied()
    }

    /// Returns the egress a host entry points at, if installed.
    pub fn host_egress(&self, ip: &Ipv4Addr) -> Option<EgressId> {
        self.hosts.get(ip).copied()
    }

    /// Number of installed routes, including the default route.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn counters(&self) -> L3Counters {
        self.counters
    }

    fn check_egress(&self, egress: EgressId) -> AsicResult<()> {
        if self.egress.contains(&egress) {
            Ok(())
        } else {
            Err(AsicError::not_found(format!("egress object {}", egress)))
        }
    }

    fn add_route(&mut self, network: Ipv4Prefix, egress: EgressId) -> AsicResult<()> {
        self.check_egress(egress)?;
        if self.routes.contains_key(&network) {
            return Err(AsicError::already_exists(format!("L3 route {}", network)));
        }
        if self.routes.len() >= self.config.route_table_size {
            return Err(AsicError::table_full("L3 route"));
        }

        self.routes.insert(network, egress);
        debug!(unit = %self.unit, network = %network, egress = %egress, "L3 route added");
        Ok(())
    }
}

impl L3Api for SoftAsic {
    fn create_cpu_egress(&mut self) -> AsicResult<EgressId> {
        self.counters.egress_creates += 1;

        let egress = EgressId::from_raw(self.next_egress)
            .ok_or_else(|| AsicError::internal("egress ID space exhausted"))?;
        self.next_egress = self
            .next_egress
            .checked_add(1)
            .ok_or_else(|| AsicError::internal("egress ID space exhausted"))?;

        self.egress.insert(egress);
        debug!(unit = %self.unit, egress = %egress, "L3 egress to CPU created");
        Ok(egress)
    }

    fn install_default_route(&mut self, egress: EgressId) -> AsicResult<()> {
        self.counters.default_route_installs += 1;
        self.add_route(Ipv4Prefix::DEFAULT, egress)
    }

    fn install_route(&mut self, network: Ipv4Prefix, egress: EgressId) -> AsicResult<()> {
        self.counters.route_installs += 1;
        self.add_route(network, egress)
    }

    fn remove_route(&mut self, network: Ipv4Prefix) -> AsicResult<()> {
        self.counters.route_removals += 1;

        match self.routes.remove(&network) {
            Some(_) => {
                debug!(unit = %self.unit, network = %network, "L3 route deleted");
                Ok(())
            }
            None => Err(AsicError::not_found(format!("L3 route {}", network))),
        }
    }

    fn install_host(&mut self, ip: Ipv4Addr, egress: EgressId) -> AsicResult<()> {
        self.counters.host_installs += 1;

        self.check_egress(egress)?;
        if self.hosts.contains_key(&ip) {
            return Err(AsicError::already_exists(format!("L3 host {}", ip)));
        }
        if self.hosts.len() >= self.config.host_table_size {
            return Err(AsicError::table_full("L3 host"));
        }

        self.hosts.insert(ip, egress);
        debug!(unit = %self.unit, host = %ip, egress = %egress, "L3 host added");
        Ok(())
    }
}

//! Route synchronization engine.
//!
//! Decides, for each add or withdraw request, whether the hardware needs to
//! be touched and in which order, and keeps the [`RouteCache`] 1:1 with what
//! the hardware actually holds: a cache entry is recorded only after the
//! hardware call that backs it has succeeded.

use std::fmt;
use std::net::Ipv4Addr;
use swmgmt_asic::{AsicError, EgressId, L3Api};
use swmgmt_types::{parse_ipv4_host, Ipv4Prefix, ParseError};
use thiserror::Error;
use tracing::{debug, info};

use super::cache::{CacheError, NetworkKey, NexthopEntry, RouteCache};

/// Preallocated route slots, sized for a full Internet-scale table share.
pub const DEFAULT_CACHE_CAPACITY: usize = 150_000;

/// Hardware operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwOp {
    CreateCpuEgress,
    InstallDefaultRoute,
    InstallHost,
    InstallRoute,
    RemoveRoute,
}

impl fmt::Display for HwOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HwOp::CreateCpuEgress => "create CPU egress object",
            HwOp::InstallDefaultRoute => "install default route",
            HwOp::InstallHost => "install L3 host",
            HwOp::InstallRoute => "install L3 route",
            HwOp::RemoveRoute => "delete L3 route",
        };
        f.write_str(s)
    }
}

/// Error type for route operations.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Failed to parse {what} {value}: {source}")]
    Parse {
        what: &'static str,
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to get network prefix length for network {0}")]
    Validation(String),

    #[error("Failed to {op} {target} in ASIC: {source}")]
    Hardware {
        op: HwOp,
        target: String,
        #[source]
        source: AsicError,
    },

    #[error("Route cache inconsistency: {0}")]
    Cache(#[from] CacheError),
}

impl RouteError {
    fn hardware(op: HwOp, target: impl ToString, source: AsicError) -> Self {
        RouteError::Hardware {
            op,
            target: target.to_string(),
            source,
        }
    }

    /// Returns true for requests rejected before any hardware call.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, RouteError::Parse { .. } | RouteError::Validation(_))
    }
}

/// Result type for route operations.
pub type Result<T> = std::result::Result<T, RouteError>;

/// What an add request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Route programmed and cached.
    Installed,
    /// Route was already cached; nothing touched.
    AlreadyPresent,
}

/// What a withdraw request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    /// Route removed from hardware and cache.
    Withdrawn,
    /// Route was not cached; nothing touched.
    NotPresent,
    /// The default route, which the switch owns; left installed.
    Pinned,
}

/// Configuration for RouteManager.
#[derive(Debug, Clone)]
pub struct RouteManagerConfig {
    /// Route slots preallocated in the cache.
    pub cache_capacity: usize,
}

impl Default for RouteManagerConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// RouteManager - installs and withdraws IPv4 routes in VRF 0.
///
/// Every route and host entry points at the one CPU egress created at
/// start-up: nexthops are not resolved in hardware, packets matching an
/// installed route are punted to the CPU for software forwarding.
#[derive(Debug)]
pub struct RouteManager {
    cpu_egress: EgressId,
    cache: RouteCache,
}

impl RouteManager {
    /// Creates the CPU egress object and installs the default route.
    ///
    /// The switch cannot forward without either, so callers treat an error
    /// here as fatal.
    pub fn start<A: L3Api + ?Sized>(asic: &mut A, config: &RouteManagerConfig) -> Result<Self> {
        let cpu_egress = asic
            .create_cpu_egress()
            .map_err(|e| RouteError::hardware(HwOp::CreateCpuEgress, "L2-to-CPU", e))?;

        asic.install_default_route(cpu_egress)
            .map_err(|e| RouteError::hardware(HwOp::InstallDefaultRoute, Ipv4Prefix::DEFAULT, e))?;

        let mut cache = RouteCache::with_capacity(config.cache_capacity);
        cache.put_default_route(cpu_egress)?;

        info!(egress = %cpu_egress, "RouteManager: default route installed via CPU egress");

        Ok(Self { cpu_egress, cache })
    }

    /// The software-routing egress every route points at.
    pub fn cpu_egress(&self) -> EgressId {
        self.cpu_egress
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn lookup(&self, key: &NetworkKey) -> Option<&NexthopEntry> {
        self.cache.lookup_route(key)
    }

    /// Adds a route to `network` via `nexthop`.
    ///
    /// Idempotent: a network already cached returns
    /// [`AddOutcome::AlreadyPresent`] without touching hardware, even if the
    /// nexthop differs. An unresolved nexthop gets its host entry before the
    /// route is installed.
    pub fn add_route4<A: L3Api + ?Sized>(
        &mut self,
        asic: &mut A,
        network: &str,
        nexthop: &str,
    ) -> Result<AddOutcome> {
        let key = parse_network(network)?;
        let nexthop = parse_nexthop(nexthop)?;
        let key = validate_network(key, network)?;

        if self.cache.lookup_route(&key).is_some() {
            debug!(network = %key, "RouteManager: route already cached");
            return Ok(AddOutcome::AlreadyPresent);
        }

        if !self.cache.has_host(&nexthop) {
            asic.install_host(nexthop, self.cpu_egress)
                .map_err(|e| RouteError::hardware(HwOp::InstallHost, nexthop, e))?;
            self.cache.put_host(nexthop, self.cpu_egress);
            debug!(nexthop = %nexthop, egress = %self.cpu_egress, "RouteManager: nexthop host installed");
        }

        asic.install_route(key, self.cpu_egress)
            .map_err(|e| RouteError::hardware(HwOp::InstallRoute, key, e))?;

        self.cache.put_route(key, nexthop, self.cpu_egress)?;

        info!(network = %key, nexthop = %nexthop, "RouteManager: added route");
        Ok(AddOutcome::Installed)
    }

    /// Withdraws the route to `network`.
    ///
    /// Idempotent: a network that is not cached returns
    /// [`WithdrawOutcome::NotPresent`]. If the hardware removal fails the
    /// cache is left as it was so the withdraw can be retried. The nexthop's
    /// host entry is kept.
    pub fn withdraw_route4<A: L3Api + ?Sized>(
        &mut self,
        asic: &mut A,
        network: &str,
    ) -> Result<WithdrawOutcome> {
        let key = validate_network(parse_network(network)?, network)?;

        if key.is_default() {
            debug!(network = %key, "RouteManager: default route is pinned, not withdrawing");
            return Ok(WithdrawOutcome::Pinned);
        }

        if self.cache.lookup_route(&key).is_none() {
            debug!(network = %key, "RouteManager: route not cached, nothing to withdraw");
            return Ok(WithdrawOutcome::NotPresent);
        }

        asic.remove_route(key)
            .map_err(|e| RouteError::hardware(HwOp::RemoveRoute, key, e))?;

        if let Some(entry) = self.cache.remove_route(&key)? {
            info!(network = %key, route = %entry, "RouteManager: withdrew route");
        }

        Ok(WithdrawOutcome::Withdrawn)
    }

    /// Logs a summary of the cache contents.
    pub fn log_summary(&self) {
        let stale = self.cache.stale_hosts().count();
        info!(
            routes = self.cache.len(),
            hosts = self.cache.host_count(),
            stale_hosts = stale,
            "RouteManager: cache summary"
        );
    }
}

/// Parses a CIDR. An IPv6 CIDR parses but yields no IPv4 prefix length.
fn parse_network(network: &str) -> Result<Option<NetworkKey>> {
    match network.parse::<Ipv4Prefix>() {
        Ok(key) => Ok(Some(key)),
        Err(ParseError::UnsupportedFamily(_)) => Ok(None),
        Err(source) => Err(RouteError::Parse {
            what: "network",
            value: network.to_string(),
            source,
        }),
    }
}

fn validate_network(key: Option<NetworkKey>, network: &str) -> Result<NetworkKey> {
    key.ok_or_else(|| RouteError::Validation(network.to_string()))
}

fn parse_nexthop(nexthop: &str) -> Result<Ipv4Addr> {
    parse_ipv4_host(nexthop).map_err(|source| RouteError::Parse {
        what: "gateway IP",
        value: nexthop.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swmgmt_asic::{SoftAsic, SoftAsicConfig, Unit};

    fn start() -> (SoftAsic, RouteManager) {
        let mut asic = SoftAsic::new(Unit::DEFAULT);
        let manager = RouteManager::start(&mut asic, &RouteManagerConfig::default()).unwrap();
        (asic, manager)
    }

    fn key(s: &str) -> NetworkKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_installs_default_route() {
        let (asic, manager) = start();

        let entry = manager.lookup(&Ipv4Prefix::DEFAULT).unwrap();
        assert_eq!(entry.egress, manager.cpu_egress());
        assert_eq!(asic.route_egress(&Ipv4Prefix::DEFAULT), Some(manager.cpu_egress()));
        assert_eq!(asic.counters().egress_creates, 1);
        assert_eq!(asic.counters().default_route_installs, 1);
    }

    #[test]
    fn test_start_fails_without_route_space() {
        let config = SoftAsicConfig {
            route_table_size: 0,
            host_table_size: 16,
        };
        let mut asic = SoftAsic::with_config(Unit::DEFAULT, config);

        let err = RouteManager::start(&mut asic, &RouteManagerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Hardware {
                op: HwOp::InstallDefaultRoute,
                ..
            }
        ));
    }

    #[test]
    fn test_add_route_installs_host_then_route() {
        let (mut asic, mut manager) = start();

        let outcome = manager
            .add_route4(&mut asic, "10.0.0.0/24", "192.168.1.1")
            .unwrap();
        assert_eq!(outcome, AddOutcome::Installed);

        let nh = Ipv4Addr::new(192, 168, 1, 1);
        assert_eq!(asic.host_egress(&nh), Some(manager.cpu_egress()));
        assert_eq!(asic.route_egress(&key("10.0.0.0/24")), Some(manager.cpu_egress()));

        let entry = manager.lookup(&key("10.0.0.0/24")).unwrap();
        assert_eq!(entry.nexthop, Some(nh));
        assert_eq!(manager.cache().host(&nh).unwrap().ref_count(), 1);
    }

    #[test]
    fn test_add_route_is_idempotent() {
        let (mut asic, mut manager) = start();

        let first = manager.add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1").unwrap();
        let second = manager.add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1").unwrap();

        assert_eq!(first, AddOutcome::Installed);
        assert_eq!(second, AddOutcome::AlreadyPresent);
        assert_eq!(asic.counters().route_installs, 1);
        assert_eq!(asic.counters().host_installs, 1);
    }

    #[test]
    fn test_add_host_bits_normalised() {
        let (mut asic, mut manager) = start();

        manager.add_route4(&mut asic, "10.0.0.9/24", "10.0.0.1").unwrap();
        let outcome = manager.add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1").unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyPresent);
    }

    #[test]
    fn test_shared_nexthop_single_host_install() {
        let (mut asic, mut manager) = start();

        manager.add_route4(&mut asic, "10.1.0.0/24", "10.0.0.1").unwrap();
        manager.add_route4(&mut asic, "10.2.0.0/24", "10.0.0.1").unwrap();

        assert_eq!(asic.counters().host_installs, 1);
        assert_eq!(asic.counters().route_installs, 2);
        assert_eq!(manager.cache().routes_via(&Ipv4Addr::new(10, 0, 0, 1)).count(), 2);
    }

    #[test]
    fn test_malformed_input_rejected_without_side_effects() {
        let (mut asic, mut manager) = start();

        let err = manager
            .add_route4(&mut asic, "not-a-cidr", "10.0.0.1")
            .unwrap_err();
        assert!(err.is_malformed_input());
        assert_eq!(err.to_string().split(':').next(), Some("Failed to parse network not-a-cidr"));

        let err = manager
            .add_route4(&mut asic, "10.0.0.0/24", "10.0.0.300")
            .unwrap_err();
        assert!(matches!(err, RouteError::Parse { what: "gateway IP", .. }));

        let err = manager
            .add_route4(&mut asic, "2001:db8::/32", "10.0.0.1")
            .unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));

        assert_eq!(manager.cache().len(), 1);
        assert_eq!(asic.counters().route_installs, 0);
        assert_eq!(asic.counters().host_installs, 0);
    }

    #[test]
    fn test_host_failure_aborts_add() {
        let config = SoftAsicConfig {
            route_table_size: 16,
            host_table_size: 0,
        };
        let mut asic = SoftAsic::with_config(Unit::DEFAULT, config);
        let mut manager = RouteManager::start(&mut asic, &RouteManagerConfig::default()).unwrap();

        let err = manager
            .add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1")
            .unwrap_err();
        assert!(matches!(err, RouteError::Hardware { op: HwOp::InstallHost, .. }));
        assert!(manager.lookup(&key("10.0.0.0/24")).is_none());
        assert_eq!(asic.counters().route_installs, 0);
    }

    #[test]
    fn test_route_failure_keeps_installed_host() {
        let config = SoftAsicConfig {
            route_table_size: 1,
            host_table_size: 16,
        };
        let mut asic = SoftAsic::with_config(Unit::DEFAULT, config);
        let mut manager = RouteManager::start(&mut asic, &RouteManagerConfig::default()).unwrap();

        let err = manager
            .add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1")
            .unwrap_err();
        assert!(matches!(err, RouteError::Hardware { op: HwOp::InstallRoute, .. }));
        assert!(manager.lookup(&key("10.0.0.0/24")).is_none());

        // The host made it into hardware, so it is cached too.
        let nh = Ipv4Addr::new(10, 0, 0, 1);
        assert!(manager.cache().has_host(&nh));
        assert_eq!(asic.host_egress(&nh), Some(manager.cpu_egress()));
    }

    #[test]
    fn test_withdraw_round_trip() {
        let (mut asic, mut manager) = start();

        manager.add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1").unwrap();
        let outcome = manager.withdraw_route4(&mut asic, "10.0.0.0/24").unwrap();

        assert_eq!(outcome, WithdrawOutcome::Withdrawn);
        assert!(manager.lookup(&key("10.0.0.0/24")).is_none());
        assert!(asic.route_egress(&key("10.0.0.0/24")).is_none());
        assert_eq!(manager.cache().len(), 1);
        // Host entries are never cleaned up.
        assert!(manager.cache().has_host(&Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(manager.cache().stale_hosts().count(), 1);
    }

    #[test]
    fn test_withdraw_absent_touches_nothing() {
        let (mut asic, mut manager) = start();

        let outcome = manager.withdraw_route4(&mut asic, "10.0.0.0/24").unwrap();
        assert_eq!(outcome, WithdrawOutcome::NotPresent);
        assert_eq!(asic.counters().route_removals, 0);
    }

    #[test]
    fn test_withdraw_keeps_other_prefix_lengths() {
        let (mut asic, mut manager) = start();

        manager.add_route4(&mut asic, "10.0.0.0/24", "10.0.0.1").unwrap();
        manager.add_route4(&mut asic, "10.0.0.0/16", "10.0.0.2").unwrap();

        manager.withdraw_route4(&mut asic, "10.0.0.0/24").unwrap();

        assert!(manager.lookup(&key("10.0.0.0/24")).is_none());
        let remaining = manager.lookup(&key("10.0.0.0/16")).unwrap();
        assert_eq!(remaining.nexthop, Some(Ipv4Addr::new(10, 0, 0, 2)));
        assert!(asic.route_egress(&key("10.0.0.0/16")).is_some());
    }

    #[test]
    fn test_default_route_withdraw_is_a_pinned_no_op() {
        let (mut asic, mut manager) = start();

        let outcome = manager.withdraw_route4(&mut asic, "0.0.0.0/0").unwrap();
        assert_eq!(outcome, WithdrawOutcome::Pinned);
        assert!(manager.lookup(&Ipv4Prefix::DEFAULT).is_some());
        assert_eq!(asic.counters().route_removals, 0);

        // Re-announcing it is a no-op.
        let outcome = manager.add_route4(&mut asic, "0.0.0.0/0", "10.0.0.1").unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyPresent);
    }

    #[test]
    fn test_unspecified_nexthop_round_trip() {
        let (mut asic, mut manager) = start();
        let nh = Ipv4Addr::UNSPECIFIED;

        let added = manager.add_route4(&mut asic, "10.0.0.0/24", "0.0.0.0").unwrap();
        assert_eq!(added, AddOutcome::Installed);
        assert_eq!(manager.cache().host(&nh).unwrap().ref_count(), 1);
        assert_eq!(manager.cache().stale_hosts().count(), 0);

        let withdrawn = manager.withdraw_route4(&mut asic, "10.0.0.0/24").unwrap();
        assert_eq!(withdrawn, WithdrawOutcome::Withdrawn);
        assert_eq!(manager.cache().host(&nh).unwrap().ref_count(), 0);
        assert!(manager.lookup(&key("10.0.0.0/24")).is_none());
        assert!(manager.lookup(&Ipv4Prefix::DEFAULT).is_some());
    }

    #[test]
    fn test_nexthop_parsed_before_family_check() {
        let (mut asic, mut manager) = start();

        let err = manager
            .add_route4(&mut asic, "2001:db8::/32", "bogus")
            .unwrap_err();
        assert!(matches!(err, RouteError::Parse { what: "gateway IP", .. }));
    }

    #[test]
    fn test_withdraw_parse_error() {
        let (mut asic, mut manager) = start();

        let err = manager.withdraw_route4(&mut asic, "10.0.0.0/40").unwrap_err();
        assert!(err.is_malformed_input());
    }
}

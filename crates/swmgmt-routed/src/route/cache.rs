//! Route, nexthop and host cache.
//!
//! Pure in-memory record of what is installed in the hardware route and host
//! tables. Nothing here talks to hardware and nothing here locks; all
//! mutation happens under the switch-wide lock held by the caller.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::net::Ipv4Addr;
use swmgmt_asic::EgressId;
use swmgmt_types::Ipv4Prefix;
use thiserror::Error;

/// Identifies a route: network address plus prefix length.
///
/// 10.0.0.0/24 and 10.0.0.0/16 are different keys; longest-prefix matching
/// between them is left to the hardware.
pub type NetworkKey = Ipv4Prefix;

/// Error type for cache mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("route {0} is already cached")]
    RouteExists(NetworkKey),

    #[error("host {0} reference count underflow")]
    RefCountUnderflow(Ipv4Addr),
}

/// The nexthop a cached route was installed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NexthopEntry {
    /// Nexthop address. `None` for the default route, which has none.
    pub nexthop: Option<Ipv4Addr>,
    /// Egress the hardware route entry points at.
    pub egress: EgressId,
}

/// A nexthop resolved in the hardware host table.
///
/// Host entries are never removed, so `ref_count` may drop to zero while
/// the entry stays installed. See [`RouteCache::stale_hosts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEntry {
    egress: EgressId,
    ref_count: u32,
}

impl HostEntry {
    fn new(egress: EgressId) -> Self {
        Self {
            egress,
            ref_count: 0,
        }
    }

    pub fn egress(&self) -> EgressId {
        self.egress
    }

    /// Number of cached routes using this nexthop.
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    fn increment_ref(&mut self) -> u32 {
        self.ref_count = self.ref_count.saturating_add(1);
        self.ref_count
    }

    fn decrement_ref(&mut self) -> Option<u32> {
        self.ref_count = self.ref_count.checked_sub(1)?;
        Some(self.ref_count)
    }
}

/// Cache of installed routes and resolved nexthops.
#[derive(Debug, Default)]
pub struct RouteCache {
    routes: HashMap<NetworkKey, NexthopEntry>,
    hosts: HashMap<Ipv4Addr, HostEntry>,
    routes_by_nexthop: HashMap<Ipv4Addr, HashSet<NetworkKey>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache with room for `capacity` routes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            routes: HashMap::with_capacity(capacity),
            hosts: HashMap::new(),
            routes_by_nexthop: HashMap::new(),
        }
    }

    /// Number of cached routes, including the default route once recorded.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn lookup_route(&self, key: &NetworkKey) -> Option<&NexthopEntry> {
        self.routes.get(key)
    }

    /// Records a route via `nexthop`.
    ///
    /// Fails if `key` is already cached; an existing entry is never
    /// overwritten. If the nexthop has a host entry its reference count is
    /// bumped, and the route is added to the nexthop's reverse index.
    pub fn put_route(
        &mut self,
        key: NetworkKey,
        nexthop: Ipv4Addr,
        egress: EgressId,
    ) -> Result<(), CacheError> {
        self.insert_route(key, Some(nexthop), egress)
    }

    /// Records the default route, which has no nexthop.
    pub fn put_default_route(&mut self, egress: EgressId) -> Result<(), CacheError> {
        self.insert_route(NetworkKey::DEFAULT, None, egress)
    }

    fn insert_route(
        &mut self,
        key: NetworkKey,
        nexthop: Option<Ipv4Addr>,
        egress: EgressId,
    ) -> Result<(), CacheError> {
        if self.routes.contains_key(&key) {
            return Err(CacheError::RouteExists(key));
        }

        self.routes.insert(key, NexthopEntry { nexthop, egress });

        if let Some(nexthop) = nexthop {
            self.routes_by_nexthop.entry(nexthop).or_default().insert(key);
            if let Some(host) = self.hosts.get_mut(&nexthop) {
                host.increment_ref();
            }
        }

        Ok(())
    }

    /// Removes a route, returning its entry. No-op if absent.
    ///
    /// The nexthop's host entry stays cached even when its reference count
    /// reaches zero. On error nothing is modified.
    pub fn remove_route(&mut self, key: &NetworkKey) -> Result<Option<NexthopEntry>, CacheError> {
        let Some(entry) = self.routes.get(key).copied() else {
            return Ok(None);
        };

        let Some(nexthop) = entry.nexthop else {
            self.routes.remove(key);
            return Ok(Some(entry));
        };

        if let Some(host) = self.hosts.get_mut(&nexthop) {
            host.decrement_ref()
                .ok_or(CacheError::RefCountUnderflow(nexthop))?;
        }

        self.routes.remove(key);
        if let Some(keys) = self.routes_by_nexthop.get_mut(&nexthop) {
            keys.remove(key);
            if keys.is_empty() {
                self.routes_by_nexthop.remove(&nexthop);
            }
        }

        Ok(Some(entry))
    }

    pub fn has_host(&self, nexthop: &Ipv4Addr) -> bool {
        self.hosts.contains_key(nexthop)
    }

    pub fn host(&self, nexthop: &Ipv4Addr) -> Option<&HostEntry> {
        self.hosts.get(nexthop)
    }

    /// Records a resolved nexthop.
    ///
    /// The reference count starts at the number of cached routes already
    /// using the nexthop (normally zero).
    pub fn put_host(&mut self, nexthop: Ipv4Addr, egress: EgressId) {
        let users = self
            .routes_by_nexthop
            .get(&nexthop)
            .map_or(0, |keys| keys.len());
        let mut host = HostEntry::new(egress);
        host.ref_count = u32::try_from(users).unwrap_or(u32::MAX);
        self.hosts.insert(nexthop, host);
    }

    /// Routes currently forwarding via `nexthop`.
    pub fn routes_via(&self, nexthop: &Ipv4Addr) -> impl Iterator<Item = &NetworkKey> {
        self.routes_by_nexthop.get(nexthop).into_iter().flatten()
    }

    /// Nexthops still installed in the host table with no route using them.
    pub fn stale_hosts(&self) -> impl Iterator<Item = &Ipv4Addr> {
        self.hosts
            .iter()
            .filter(|(_, host)| host.ref_count == 0)
            .map(|(nexthop, _)| nexthop)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NetworkKey, &NexthopEntry)> {
        self.routes.iter()
    }
}

impl fmt::Display for NexthopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nexthop {
            Some(nexthop) => write!(f, "via {} egress {}", nexthop, self.egress),
            None => write!(f, "egress {}", self.egress),
        }
    }
}

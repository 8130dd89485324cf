//! Route management for the switch.
//!
//! This module keeps the hardware L3 route and host tables in step with the
//! routes announced by the external routing agent:
//! - [`cache`]: in-memory record of installed routes and resolved nexthops
//! - [`engine`]: [`RouteManager`], which decides what to program and in
//!   which order
//! - [`service`]: the `routemgmt.RouteMgmt` gRPC adapter
//! - [`proto`]: wire messages and generated server/client stubs

pub mod cache;
pub mod engine;
pub mod proto;
pub mod service;

pub use cache::{CacheError, HostEntry, NetworkKey, NexthopEntry, RouteCache};
pub use engine::{
    AddOutcome, HwOp, RouteError, RouteManager, RouteManagerConfig, WithdrawOutcome,
    DEFAULT_CACHE_CAPACITY,
};
pub use service::RouteMgmtService;

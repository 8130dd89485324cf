//! IPv4 route synchronization daemon.
//!
//! An external routing agent announces and withdraws IPv4 routes over the
//! `routemgmt.RouteMgmt` gRPC service. Each announced route is programmed
//! into the forwarding ASIC pointing at a single CPU egress object, so the
//! hardware punts matching traffic to the host for software forwarding.
//!
//! # Architecture
//!
//! - [`route::cache`]: what is installed in hardware, keyed by (network,
//!   prefix length), plus resolved nexthops
//! - [`route::engine`]: the add/withdraw decision logic
//! - [`switch`]: the switch object and its single lock
//! - [`route::service`]: the gRPC adapter
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```
//! use swmgmt_asic::{SoftAsic, Unit};
//! use swmgmt_routed::route::{AddOutcome, RouteManagerConfig};
//! use swmgmt_routed::switch::Switch;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let switch = Switch::new(SoftAsic::new(Unit::DEFAULT), &RouteManagerConfig::default()).unwrap();
//! let outcome = switch.add_route4("10.0.0.0/24", "192.168.1.1").await.unwrap();
//! assert_eq!(outcome, AddOutcome::Installed);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod route;
pub mod switch;

pub use config::RoutedConfig;
pub use error::{Result, RoutedError};
pub use route::proto::route_mgmt_server::RouteMgmtServer;
pub use route::{RouteMgmtService, RouteManager};
pub use switch::{Switch, SwitchState};

//! Vendor-neutral adapter for the forwarding ASIC's L3 tables.
//!
//! The route synchronization engine never talks to a vendor SDK directly.
//! It programs hardware through the [`L3Api`] trait, which exposes only the
//! handful of operations the engine depends on: creating the software-routing
//! egress object, installing the default route, and installing or removing
//! route and host entries.
//!
//! # Architecture
//!
//! - [`types`]: hardware handles ([`EgressId`], [`Unit`])
//! - [`error`]: the [`AsicError`] type
//! - [`api`]: the [`L3Api`] trait
//! - [`soft`]: [`SoftAsic`], an in-memory forwarding table that behaves like
//!   the hardware tables (duplicate, missing and capacity errors included)
//!
//! # Example
//!
//! ```
//! use swmgmt_asic::{L3Api, SoftAsic, Unit};
//! use swmgmt_types::Ipv4Prefix;
//!
//! let mut asic = SoftAsic::new(Unit::DEFAULT);
//! let egress = asic.create_cpu_egress().unwrap();
//! asic.install_default_route(egress).unwrap();
//! assert_eq!(asic.route_egress(&Ipv4Prefix::DEFAULT), Some(egress));
//! ```

pub mod api;
pub mod error;
pub mod soft;
pub mod types;

pub use api::L3Api;
pub use error::{AsicError, AsicResult};
pub use soft::{L3Counters, SoftAsic, SoftAsicConfig};
pub use types::{EgressId, Unit};

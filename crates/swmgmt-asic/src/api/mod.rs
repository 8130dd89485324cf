//! Hardware programming interfaces.
//!
//! - [`l3`]: egress objects, route and host tables

pub mod l3;

pub use l3::L3Api;

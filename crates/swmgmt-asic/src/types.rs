//! Hardware handle types.
//!
//! Handles returned by the ASIC are plain integers in the vendor SDK. They
//! are wrapped here so an egress handle cannot be confused with a unit
//! number or any other integer.

use std::fmt;

/// Raw egress handle value as used by the vendor SDK.
pub type RawEgressId = i32;

/// An ASIC unit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Unit(i32);

impl Unit {
    /// The first (and on most boxes the only) forwarding chip.
    pub const DEFAULT: Self = Unit(0);

    pub const fn new(unit: i32) -> Self {
        Unit(unit)
    }

    pub const fn as_raw(&self) -> i32 {
        self.0
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit{}", self.0)
    }
}

/// A hardware L3 egress object handle.
///
/// In L3 egress mode the SDK numbers egress objects from
/// [`EgressId::BASE`] upward; values below it are not egress objects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EgressId(RawEgressId);

impl EgressId {
    /// First egress object ID handed out in egress mode.
    pub const BASE: RawEgressId = 100_000;

    /// Wraps a raw handle.
    ///
    /// Returns `None` if the value is below [`EgressId::BASE`].
    pub fn from_raw(raw: RawEgressId) -> Option<Self> {
        (raw >= Self::BASE).then_some(EgressId(raw))
    }

    /// Returns the raw handle value.
    pub const fn as_raw(&self) -> RawEgressId {
        self.0
    }
}

impl fmt::Debug for EgressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EgressId({})", self.0)
    }
}

impl fmt::Display for EgressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Host handles and small value types
//!
//! Every live object in the host (actors, vehicles, groups) is addressed by an
//! opaque integer handle whose lifetime the host owns. A zero handle is the
//! host's "nothing here" sentinel; lookups in this crate turn it into `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a live actor in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorRef(pub i32);

impl ActorRef {
    /// The sentinel handle. Outside of a recording sequence it means "no actor".
    pub(crate) const SENTINEL: ActorRef = ActorRef(0);

    /// Wrap a raw handle returned by the host, mapping the sentinel to `None`
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Raw handle value
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Whether this is the sentinel handle
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Handle of a live vehicle in the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleRef(pub i32);

impl VehicleRef {
    /// Wrap a raw handle returned by the host, mapping the sentinel to `None`
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Raw handle value
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Whether this is the sentinel handle
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for VehicleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

/// Handle of an actor group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef(pub i32);

impl GroupRef {
    /// Raw handle value
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// World-space position or offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Construct a vector from components
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check if all components are finite (not NaN or infinity)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

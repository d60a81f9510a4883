#![warn(missing_docs)]
//! Physics primitives and the per-tick entity integrator.

mod body;
mod sweep;

pub use body::*;
pub use sweep::*;

use glam::DVec3;

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// AABB centered on `center` extending `half` per axis.
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The four (x, z) corners at a given height, for column probing.
    pub fn footprint_corners(&self) -> [(f64, f64); 4] {
        [
            (self.min.x, self.min.z),
            (self.min.x, self.max.z),
            (self.max.x, self.min.z),
            (self.max.x, self.max.z),
        ]
    }
}

//! Static collider volumes.

use engine_core::Vec3;

/// An axis-aligned box that blocks movement. Never moves during a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxCollider {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Build from a center and full edge lengths (the way scene files list walls).
    pub fn from_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    /// A box with non-finite or non-positive extents cannot be queried.
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.half_extents.is_finite()
            && self.half_extents.cmpgt(Vec3::ZERO).all()
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min()).all() && point.cmple(self.max()).all()
    }
}

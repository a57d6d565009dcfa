//! The static collision field for one scene, backed by Rapier3D queries.

use crate::collision::BoxCollider;
use glam::Vec3;
use rapier3d::prelude::*;

/// Read-only set of wall/obstacle boxes. Rebuilt only when a scene loads.
pub struct CollisionField {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
    boxes: Vec<BoxCollider>,
}

impl Default for CollisionField {
    fn default() -> Self {
        Self::empty()
    }
}

impl CollisionField {
    /// A field with no colliders. Every probe misses.
    pub fn empty() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            boxes: Vec::new(),
        }
    }

    /// Build the field from scene boxes. Invalid boxes are skipped with a warning.
    pub fn from_boxes(boxes: &[BoxCollider]) -> Self {
        let mut field = Self::empty();
        for collider in boxes {
            if !collider.is_valid() {
                log::warn!("Skipping invalid collider {:?}", collider);
                continue;
            }
            field.add_static_box(*collider);
        }
        if field.boxes.is_empty() && !boxes.is_empty() {
            log::warn!("Collision field has no usable colliders; movement is unblocked");
        }
        field.update_query_pipeline();
        field
    }

    /// Add a static cuboid with no parent body; the collider is fixed in world.
    fn add_static_box(&mut self, collider: BoxCollider) -> ColliderHandle {
        let c = collider.center;
        let h = collider.half_extents;
        let built = ColliderBuilder::cuboid(h.x as Real, h.y as Real, h.z as Real)
            .translation(vector![c.x, c.y, c.z])
            .build();
        self.boxes.push(collider);
        self.collider_set.insert(built)
    }

    /// Update query pipeline for raycasting.
    fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// The boxes this field was built from.
    pub fn boxes(&self) -> &[BoxCollider] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// True if `point` lies inside any box.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.boxes.iter().any(|b| b.contains(point))
    }
}

//! Horizontal probe ring used to keep the avatar off walls.

use crate::CollisionField;
use glam::Vec3;
use std::f32::consts::FRAC_1_SQRT_2;

/// The eight horizontal probe directions: the four axes, then the diagonals.
pub const PROBE_DIRECTIONS: [Vec3; 8] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2),
    Vec3::new(-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2),
    Vec3::new(FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2),
    Vec3::new(-FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2),
];

/// Summary of the probes that came closer than the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit push-out direction: the normalized sum of each hit probe's
    /// direction from hit point back to the origin.
    pub normal: Vec3,
    /// Number of probes that hit.
    pub hits: usize,
    /// Shortest hit distance.
    pub nearest: f32,
}

impl CollisionField {
    /// Probe the eight horizontal directions from `origin`. Returns `None`
    /// when nothing is closer than `threshold` or the pushes cancel out.
    pub fn probe_ring(&self, origin: Vec3, threshold: f32) -> Option<Contact> {
        let mut push = Vec3::ZERO;
        let mut hits = 0;
        let mut nearest = f32::INFINITY;

        for direction in PROBE_DIRECTIONS {
            let Some(hit) = self.raycast(origin, direction, threshold) else {
                continue;
            };
            if hit.distance >= threshold {
                continue;
            }
            hits += 1;
            nearest = nearest.min(hit.distance);
            // (origin - point) normalized, without the zero-length case at distance 0
            push -= direction;
        }

        if hits == 0 {
            return None;
        }
        let normal = push.normalize_or_zero();
        if normal == Vec3::ZERO {
            log::debug!("Probe pushes cancel at {:?}; treating as clear", origin);
            return None;
        }
        Some(Contact { normal, hits, nearest })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoxCollider;

    fn wall_at_z(face_z: f32) -> CollisionField {
        CollisionField::from_boxes(&[BoxCollider::new(
            Vec3::new(0.0, 2.5, face_z - 0.1),
            Vec3::new(10.0, 2.5, 0.1),
        )])
    }

    #[test]
    fn clear_space_has_no_contact() {
        let field = wall_at_z(9.88);
        assert!(field.probe_ring(Vec3::new(0.0, 1.7, 11.0), 0.5).is_none());
    }

    #[test]
    fn flat_wall_pushes_straight_out() {
        let field = wall_at_z(9.88);
        // Close enough for the forward and both diagonal probes.
        let contact = field
            .probe_ring(Vec3::new(0.0, 1.7, 10.1), 0.5)
            .expect("touching wall");
        assert_eq!(contact.hits, 3);
        assert!((contact.normal - Vec3::Z).length() < 1e-5);
        assert!((contact.nearest - 0.22).abs() < 1e-4);
    }

    #[test]
    fn corner_pushes_diagonally() {
        let field = CollisionField::from_boxes(&[
            BoxCollider::new(Vec3::new(0.0, 2.5, -10.1), Vec3::new(10.0, 2.5, 0.1)),
            BoxCollider::new(Vec3::new(-10.1, 2.5, 0.0), Vec3::new(0.1, 2.5, 10.0)),
        ]);
        let contact = field
            .probe_ring(Vec3::new(-9.7, 1.7, -9.7), 0.5)
            .expect("in corner");
        assert!(contact.normal.x > 0.5 && contact.normal.z > 0.5);
    }
}

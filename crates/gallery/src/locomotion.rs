//! Free-roam walking: smoothed velocity from held keys, wall sliding.

use crate::camera_rig::{CameraOwner, CameraRig};
use crate::config::LocomotionSettings;
use engine_core::{exp_approach, Vec2, Vec3};
use input::MovementKey;
use physics::CollisionField;
use std::collections::HashSet;

/// What a locomotion step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Another subsystem owns the camera; nothing was written.
    Suppressed,
    /// Speed below the rest threshold; position unchanged.
    AtRest,
    /// The camera moved. `collided` is true if walls pushed it back.
    Moved { collided: bool },
}

/// Walking controller for the avatar camera.
pub struct LocomotionController {
    pub velocity: Vec3,
    pub target_velocity: Vec3,
    settings: LocomotionSettings,
}

impl LocomotionController {
    pub fn new(settings: LocomotionSettings) -> Self {
        Self {
            velocity: Vec3::ZERO,
            target_velocity: Vec3::ZERO,
            settings,
        }
    }

    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    /// Per-scene walking speed.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.settings.max_speed = max_speed.max(0.0);
    }

    pub fn owns_camera(&self, rig: &CameraRig) -> bool {
        rig.is_owned_by(CameraOwner::Locomotion)
    }

    /// Run one frame. `look` is the raw mouse delta, `dt` seconds since the last frame.
    pub fn update(
        &mut self,
        held: &HashSet<MovementKey>,
        look: Vec2,
        rig: &mut CameraRig,
        field: &CollisionField,
        dt: f32,
    ) -> MoveOutcome {
        let dt = dt.clamp(0.0, self.settings.max_frame_delta);
        let owns = self.owns_camera(rig);

        if owns && look != Vec2::ZERO {
            if let Some(camera) = rig.write(CameraOwner::Locomotion) {
                camera.process_mouse(look.x, look.y);
            }
        }

        self.target_velocity = if owns {
            self.compute_target(held, rig)
        } else {
            Vec3::ZERO
        };
        self.blend_velocity(dt);

        if !owns {
            return MoveOutcome::Suppressed;
        }
        if self.velocity.length() < self.settings.rest_epsilon {
            return MoveOutcome::AtRest;
        }

        let position = rig.camera().position();
        let proposed = position + self.velocity * dt;
        let resolved = self.resolve_collisions(proposed, field);
        let collided = resolved != proposed;

        match rig.write(CameraOwner::Locomotion) {
            Some(camera) => {
                camera.transform.position = resolved;
                MoveOutcome::Moved { collided }
            }
            None => MoveOutcome::Suppressed,
        }
    }

    /// Screen-relative target velocity. Pitch is ignored so walking stays level.
    fn compute_target(&self, held: &HashSet<MovementKey>, rig: &CameraRig) -> Vec3 {
        let camera = rig.camera();
        let forward = camera.flat_forward();
        let right = camera.flat_right();
        let speed = self.settings.max_speed;

        let target: Vec3 = held
            .iter()
            .map(|key| {
                let axis = key.axis();
                (forward * axis.y + right * axis.x) * speed
            })
            .sum();
        target.clamp_length_max(speed)
    }

    fn blend_velocity(&mut self, dt: f32) {
        let rate = if self.target_velocity.length_squared() > 0.0 {
            self.settings.acceleration
        } else {
            self.settings.deceleration
        };
        self.velocity = exp_approach(self.velocity, self.target_velocity, rate, dt);
    }

    /// Push `position` out of any wall closer than the collision distance,
    /// removing the into-wall part of the velocity so the avatar slides.
    /// A position with no probe closer than the threshold is returned as is.
    pub fn resolve_collisions(&mut self, mut position: Vec3, field: &CollisionField) -> Vec3 {
        let threshold = self.settings.collision_distance;
        let push_distance = (threshold - self.settings.collision_margin).max(0.0);
        let mut damped = false;

        for _ in 0..self.settings.resolve_passes.max(1) {
            let Some(contact) = field.probe_ring(position, threshold) else {
                break;
            };
            let into_wall = self.velocity.dot(contact.normal);
            if into_wall < 0.0 {
                self.velocity -= contact.normal * into_wall;
                if !damped {
                    self.velocity *= self.settings.wall_slide_damping;
                    damped = true;
                }
            }
            position += contact.normal * push_distance;
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Camera;
    use physics::BoxCollider;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const FRAME: f32 = 1.0 / 60.0;

    fn keys(list: &[MovementKey]) -> HashSet<MovementKey> {
        list.iter().copied().collect()
    }

    /// A wide wall whose near face is the plane z = `face_z`.
    fn wall_with_face_at(face_z: f32) -> CollisionField {
        CollisionField::from_boxes(&[BoxCollider::new(
            Vec3::new(0.0, 2.5, face_z - 0.1),
            Vec3::new(10.0, 2.5, 0.1),
        )])
    }

    #[test]
    fn accelerates_smoothly_toward_max_speed() {
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let mut rig = CameraRig::new(Camera::new(Vec3::new(0.0, 1.7, 0.0)));
        let field = CollisionField::empty();
        let forward = keys(&[MovementKey::Forward]);

        controller.update(&forward, Vec2::ZERO, &mut rig, &field, FRAME);
        let first = controller.velocity.length();
        assert!(first > 0.0 && first < 3.5);

        for _ in 0..120 {
            controller.update(&forward, Vec2::ZERO, &mut rig, &field, FRAME);
        }
        assert!((controller.velocity.length() - 3.5).abs() < 1e-3);
        assert!(rig.camera().position().z < -5.0);
        assert_eq!(rig.camera().position().y, 1.7);
    }

    #[test]
    fn diagonal_input_is_clamped_to_max_speed() {
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let mut rig = CameraRig::new(Camera::default());
        let field = CollisionField::empty();
        let held = keys(&[MovementKey::Forward, MovementKey::Right]);
        controller.update(&held, Vec2::ZERO, &mut rig, &field, FRAME);
        assert!((controller.target_velocity.length() - 3.5).abs() < 1e-4);
    }

    #[test]
    fn movement_follows_yaw_not_pitch() {
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let mut camera = Camera::new(Vec3::new(0.0, 1.7, 0.0));
        camera.set_yaw_pitch(std::f32::consts::FRAC_PI_2, -1.2);
        let mut rig = CameraRig::new(camera);
        let field = CollisionField::empty();
        controller.update(&keys(&[MovementKey::Forward]), Vec2::ZERO, &mut rig, &field, FRAME);
        // Yaw of +90 degrees faces -X.
        assert!(controller.target_velocity.x < -3.4);
        assert_eq!(controller.target_velocity.y, 0.0);
    }

    #[test]
    fn decelerates_to_rest_after_release() {
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let mut rig = CameraRig::new(Camera::default());
        let field = CollisionField::empty();
        for _ in 0..60 {
            controller.update(&keys(&[MovementKey::Forward]), Vec2::ZERO, &mut rig, &field, FRAME);
        }
        let mut last = MoveOutcome::Moved { collided: false };
        for _ in 0..120 {
            last = controller.update(&HashSet::new(), Vec2::ZERO, &mut rig, &field, FRAME);
        }
        assert_eq!(last, MoveOutcome::AtRest);
        let parked = rig.camera().position();
        controller.update(&HashSet::new(), Vec2::ZERO, &mut rig, &field, FRAME);
        assert_eq!(rig.camera().position(), parked);
    }

    #[test]
    fn suppressed_while_camera_is_borrowed() {
        let mut world = engine_core::World::new();
        let exhibit = world.spawn(());
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let mut rig = CameraRig::new(Camera::new(Vec3::new(0.0, 1.7, 0.0)));
        let field = CollisionField::empty();
        for _ in 0..30 {
            controller.update(&keys(&[MovementKey::Forward]), Vec2::ZERO, &mut rig, &field, FRAME);
        }
        assert!(rig.transfer(CameraOwner::Locomotion, CameraOwner::Inspection(exhibit)));
        let locked = rig.camera().pose();

        let outcome = controller.update(
            &keys(&[MovementKey::Forward]),
            Vec2::new(50.0, 10.0),
            &mut rig,
            &field,
            FRAME,
        );
        assert_eq!(outcome, MoveOutcome::Suppressed);
        assert_eq!(rig.camera().pose(), locked);
        assert_eq!(controller.target_velocity, Vec3::ZERO);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        controller.velocity = Vec3::new(0.0, 0.0, -3.5);
        let mut rig = CameraRig::new(Camera::default());
        let field = CollisionField::empty();
        controller.update(&keys(&[MovementKey::Forward]), Vec2::ZERO, &mut rig, &field, 5.0);
        assert!(rig.camera().position().z >= -0.3501);
    }

    #[test]
    fn resolving_twice_does_not_move_further() {
        let field = wall_with_face_at(9.88);
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        controller.velocity = Vec3::new(0.0, 0.0, -3.0);

        let once = controller.resolve_collisions(Vec3::new(0.0, 1.7, 10.2), &field);
        assert!(once.z - 9.88 >= 0.5);
        assert!(field.probe_ring(once, 0.5).is_none());

        let twice = controller.resolve_collisions(once, &field);
        assert_eq!(once, twice);
    }

    #[test]
    fn deep_penetration_is_resolved_in_one_call() {
        let field = wall_with_face_at(9.88);
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let resolved = controller.resolve_collisions(Vec3::new(0.0, 1.7, 9.9), &field);
        assert!(field.probe_ring(resolved, 0.5).is_none());
    }

    #[test]
    fn walks_into_wall_and_stops_short() {
        let field = wall_with_face_at(9.88);
        let settings = LocomotionSettings::default();
        let threshold = settings.collision_distance;
        let mut controller = LocomotionController::new(settings);
        let mut rig = CameraRig::new(Camera::new(Vec3::new(0.0, 1.7, 11.0)));
        let forward = keys(&[MovementKey::Forward]);

        let mut collided_once = false;
        for _ in 0..60 {
            let outcome = controller.update(&forward, Vec2::ZERO, &mut rig, &field, FRAME);
            collided_once |= outcome == MoveOutcome::Moved { collided: true };
            assert!(rig.camera().position().z >= 9.88 + threshold - 1e-4);
        }
        assert!(collided_once);
    }

    #[test]
    fn slides_along_wall_on_oblique_approach() {
        let field = wall_with_face_at(9.88);
        let mut controller = LocomotionController::new(LocomotionSettings::default());
        let mut camera = Camera::new(Vec3::new(0.0, 1.7, 11.0));
        // Face mostly toward the wall, turned 0.5 rad toward -X.
        camera.set_yaw_pitch(0.5, 0.0);
        let mut rig = CameraRig::new(camera);
        let forward = keys(&[MovementKey::Forward]);

        for _ in 0..60 {
            controller.update(&forward, Vec2::ZERO, &mut rig, &field, FRAME);
        }
        let position = rig.camera().position();
        assert!(position.z >= 9.88 + 0.5 - 1e-4);
        assert!(controller.velocity.x < -1.0, "lateral velocity kept: {:?}", controller.velocity);
        assert!(position.x < -1.0, "slid sideways: {:?}", position);
    }

    #[test]
    fn speed_never_exceeds_max_for_random_input() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let field = CollisionField::from_boxes(&[
            BoxCollider::new(Vec3::new(0.0, 2.5, -4.0), Vec3::new(4.0, 2.5, 0.1)),
            BoxCollider::new(Vec3::new(-4.0, 2.5, 0.0), Vec3::new(0.1, 2.5, 4.0)),
            BoxCollider::new(Vec3::new(4.0, 2.5, 0.0), Vec3::new(0.1, 2.5, 4.0)),
            BoxCollider::new(Vec3::new(0.0, 2.5, 4.0), Vec3::new(4.0, 2.5, 0.1)),
        ]);

        for _ in 0..20 {
            let mut controller = LocomotionController::new(LocomotionSettings::default());
            let max_speed = controller.settings().max_speed;
            let mut rig = CameraRig::new(Camera::new(Vec3::new(0.0, 1.7, 0.0)));
            let mut held = HashSet::new();

            for _ in 0..400 {
                let key = MovementKey::ALL[rng.gen_range(0..4)];
                if rng.gen_bool(0.5) {
                    held.insert(key);
                } else {
                    held.remove(&key);
                }
                let look = Vec2::new(rng.gen_range(-40.0..40.0), 0.0);
                let dt = rng.gen_range(0.0..0.25);
                controller.update(&held, look, &mut rig, &field, dt);
                assert!(controller.velocity.length() <= max_speed + 1e-4);
            }
        }
    }
}

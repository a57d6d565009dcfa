//! First-person camera and its pose snapshot.

use crate::Transform;
use glam::{Quat, Vec3};

/// Pitch is kept just short of straight up/down so yaw stays well defined.
pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Position and orientation of the camera, copied by value across ownership
/// changes and scene swaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Left/right rotation in radians.
    pub yaw: f32,
    /// Up/down rotation in radians.
    pub pitch: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self { position, yaw, pitch }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, 0.0, 0.0)
    }
}

/// FPS camera driven by yaw/pitch.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Mouse sensitivity for look controls.
    pub sensitivity: f32,
    /// Current pitch (up/down rotation) in radians.
    pitch: f32,
    /// Current yaw (left/right rotation) in radians.
    yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 75.0,
            sensitivity: 0.002,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Create a camera placed at a saved pose.
    pub fn from_pose(pose: CameraPose) -> Self {
        let mut camera = Self::new(pose.position);
        camera.set_yaw_pitch(pose.yaw, pose.pitch);
        camera
    }

    /// Process mouse movement for FPS look controls.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        let yaw = self.yaw - delta_x * self.sensitivity;
        let pitch = self.pitch - delta_y * self.sensitivity;
        self.set_yaw_pitch(yaw, pitch);
    }

    /// Set yaw and pitch directly (in radians) and rebuild rotation.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.transform.rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
    }

    /// Snapshot the current pose.
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.transform.position, self.yaw, self.pitch)
    }

    /// Restore a pose captured with [`Camera::pose`].
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.transform.position = pose.position;
        self.set_yaw_pitch(pose.yaw, pose.pitch);
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Get camera forward direction, pitch included.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Forward direction projected onto the ground plane.
    pub fn flat_forward(&self) -> Vec3 {
        let forward = self.transform.forward();
        Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero()
    }

    /// Right direction projected onto the ground plane.
    pub fn flat_right(&self) -> Vec3 {
        let right = self.transform.right();
        Vec3::new(right.x, 0.0, right.z).normalize_or_zero()
    }

    /// Get current yaw (left/right rotation) in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch (up/down rotation) in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_round_trip_is_exact() {
        let mut camera = Camera::new(Vec3::new(1.0, 1.7, 4.0));
        camera.process_mouse(120.0, -35.0);
        let pose = camera.pose();

        let mut other = Camera::default();
        other.set_pose(pose);
        assert_eq!(other.pose(), pose);
        assert_eq!(other.transform.rotation, camera.transform.rotation);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.set_yaw_pitch(0.0, 10.0);
        assert_eq!(camera.pitch(), MAX_PITCH);
    }

    #[test]
    fn flat_directions_ignore_pitch() {
        let mut camera = Camera::default();
        camera.set_yaw_pitch(0.3, 1.2);
        assert!(camera.flat_forward().y.abs() < 1e-6);
        assert!((camera.flat_forward().length() - 1.0).abs() < 1e-5);
        assert!(camera.flat_forward().dot(camera.flat_right()).abs() < 1e-5);
    }
}

//! The camera and the single token that says who may move it.

use engine_core::{Camera, Entity};

/// Which subsystem may write the camera this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraOwner {
    /// Free roam: the locomotion controller moves and turns the camera.
    Locomotion,
    /// Close-up: the inspection of this exhibit holds the camera still.
    Inspection(Entity),
}

/// Camera plus its ownership token. All writes go through [`CameraRig::write`].
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: Camera,
    owner: CameraOwner,
}

impl CameraRig {
    /// A rig in free-roam mode.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            owner: CameraOwner::Locomotion,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn owner(&self) -> CameraOwner {
        self.owner
    }

    pub fn is_owned_by(&self, claimant: CameraOwner) -> bool {
        self.owner == claimant
    }

    /// Mutable camera access, granted only to the current owner.
    pub fn write(&mut self, claimant: CameraOwner) -> Option<&mut Camera> {
        if self.owner == claimant {
            Some(&mut self.camera)
        } else {
            None
        }
    }

    /// Hand the camera from `from` to `to`. Only the current owner can give it away.
    pub fn transfer(&mut self, from: CameraOwner, to: CameraOwner) -> bool {
        if self.owner != from {
            log::debug!("Camera transfer {:?} -> {:?} refused; owned by {:?}", from, to, self.owner);
            return false;
        }
        self.owner = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Vec3, World};

    #[test]
    fn only_owner_gets_write_access() {
        let mut world = World::new();
        let exhibit = world.spawn(());
        let mut rig = CameraRig::new(Camera::new(Vec3::new(0.0, 1.7, 0.0)));

        assert!(rig.write(CameraOwner::Inspection(exhibit)).is_none());
        assert!(rig.write(CameraOwner::Locomotion).is_some());

        assert!(rig.transfer(CameraOwner::Locomotion, CameraOwner::Inspection(exhibit)));
        assert!(rig.write(CameraOwner::Locomotion).is_none());
        assert!(rig.write(CameraOwner::Inspection(exhibit)).is_some());
    }

    #[test]
    fn non_owner_cannot_transfer() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let mut rig = CameraRig::new(Camera::default());
        assert!(rig.transfer(CameraOwner::Locomotion, CameraOwner::Inspection(a)));
        assert!(!rig.transfer(CameraOwner::Locomotion, CameraOwner::Inspection(b)));
        assert!(!rig.transfer(CameraOwner::Inspection(b), CameraOwner::Locomotion));
        assert_eq!(rig.owner(), CameraOwner::Inspection(a));
    }
}

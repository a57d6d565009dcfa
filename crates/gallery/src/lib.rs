//! Navigation and interaction core of a walk-through exhibit viewer.
//!
//! A [`Gallery`] owns one active scene at a time. Per rendered frame it turns
//! held keys into smoothed, wall-sliding movement, tracks which exhibits the
//! avatar is near and looking at, runs close-up inspections, and sequences
//! faded scene changes that carry the selected exhibit and camera pose across.

pub mod camera_rig;
pub mod config;
pub mod events;
pub mod gallery;
pub mod interaction;
pub mod locomotion;
pub mod scene;
pub mod transition;

pub use camera_rig::{CameraOwner, CameraRig};
pub use config::GalleryConfig;
pub use events::GalleryEvent;
pub use gallery::{ActiveScene, Gallery, ReturnPoint};
pub use interaction::{InteractionPhase, InteractionSystem, SelectOutcome};
pub use locomotion::{LocomotionController, MoveOutcome};
pub use scene::{ExhibitId, SceneCatalog, SceneDescriptor, SceneError, SceneId};
pub use transition::{SceneTransition, TransitionPhase, TransitionRequest};

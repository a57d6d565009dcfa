//! Static collision queries using Rapier3D for the exhibit viewer.

pub mod collision;
pub mod collision_field;
pub mod probe;
pub mod raycast;

pub use collision::*;
pub use collision_field::*;
pub use probe::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

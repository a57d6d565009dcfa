//! Core engine types and utilities for the exhibit viewer.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform, camera and pose snapshots
//! - Time management and one-shot timers
//! - Smoothing helpers shared by movement and inspection

pub mod camera;
pub mod smoothing;
pub mod time;
pub mod timer;
pub mod transform;

pub use camera::*;
pub use smoothing::*;
pub use time::*;
pub use timer::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};

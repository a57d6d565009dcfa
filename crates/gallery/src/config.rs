//! Viewer configuration (movement, interaction, transitions). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persistent viewer settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub locomotion: LocomotionSettings,
    pub look: LookSettings,
    pub interaction: InteractionSettings,
    pub transition: TransitionSettings,
    pub ui: UiSettings,
}

/// Walking feel and wall collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    /// Top walking speed in m/s.
    pub max_speed: f32,
    /// Smoothing rate (1/s) while a movement key is held.
    pub acceleration: f32,
    /// Smoothing rate (1/s) toward rest once keys are released.
    pub deceleration: f32,
    /// Probe length; walls closer than this push the avatar out.
    pub collision_distance: f32,
    /// Push-out distance is `collision_distance - collision_margin`.
    pub collision_margin: f32,
    /// Tangential velocity kept per frame of wall contact.
    pub wall_slide_damping: f32,
    /// Speeds below this (m/s) do not move the avatar.
    pub rest_epsilon: f32,
    /// Longest frame step in seconds.
    pub max_frame_delta: f32,
    /// Push-out passes before a frame's move is accepted as is.
    pub resolve_passes: u32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            max_speed: 3.5,
            acceleration: 15.0,
            deceleration: 8.0,
            collision_distance: 0.5,
            collision_margin: 0.05,
            wall_slide_damping: 0.98,
            rest_epsilon: 0.01,
            max_frame_delta: 0.1,
            resolve_passes: 4,
        }
    }
}

impl LocomotionSettings {
    pub fn max_frame_duration(&self) -> Duration {
        Duration::from_secs_f32(self.max_frame_delta.max(0.0))
    }
}

/// Pointer-locked mouse look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookSettings {
    /// Radians of rotation per pixel of mouse travel.
    pub sensitivity: f32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self { sensitivity: 0.002 }
    }
}

/// Proximity detection and inspection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Default reach for exhibits that do not set their own.
    pub interaction_radius: f32,
    /// Default gaze cone half-angle in radians.
    pub gaze_tolerance: f32,
    /// How far in front of the camera an inspected exhibit is held.
    pub inspect_distance: f32,
    /// Turntable spin while on display, rad/s.
    pub auto_rotation_rate: f32,
    /// Radians of exhibit rotation per pixel dragged.
    pub drag_sensitivity: f32,
    /// Yaw limit either side of the inspection start, degrees.
    pub max_yaw_degrees: f32,
    /// Pitch limit either side of the inspection start, degrees.
    pub max_pitch_degrees: f32,
    /// Time for a released exhibit to settle on its target rotation, seconds.
    pub settle_time: f32,
    /// Distance at which the outline highlight is full.
    pub highlight_near: f32,
    /// Distance beyond which there is no highlight.
    pub highlight_far: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            interaction_radius: 3.0,
            gaze_tolerance: 0.5,
            inspect_distance: 2.0,
            auto_rotation_rate: std::f32::consts::PI * 0.075,
            drag_sensitivity: 0.01,
            max_yaw_degrees: 90.0,
            max_pitch_degrees: 45.0,
            settle_time: 0.15,
            highlight_near: 2.0,
            highlight_far: 6.0,
        }
    }
}

/// Scene change fades.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Length of each fade (out, then in), seconds.
    pub fade_duration: f32,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self { fade_duration: 0.5 }
    }
}

impl TransitionSettings {
    pub fn fade(&self) -> Duration {
        Duration::from_secs_f32(self.fade_duration.max(0.0))
    }
}

/// Outbound UI stream pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Camera position samples for the debug readout, seconds between samples.
    pub pose_sample_interval: f32,
    /// How long first-entry instructions stay up, seconds.
    pub instructions_duration: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            pose_sample_interval: 0.1,
            instructions_duration: 8.0,
        }
    }
}

impl GalleryConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

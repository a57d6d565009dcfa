//! Notifications for the UI layer.

use crate::scene::{ExhibitId, SceneId};
use glam::Vec3;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// Low-rate camera position sample for the debug readout.
    CameraPoseChanged { position: Vec3 },
    /// True while an exhibit is being inspected (cursor shown, HUD hidden).
    InteractionChanged(bool),
    SelectionChanged(Option<ExhibitId>),
    /// An accepted scene change, with the state the UI may want to keep.
    SceneChangeRequested {
        target: SceneId,
        exhibit: Option<ExhibitId>,
        camera_position: Vec3,
    },
    /// A new scene is live behind the fade.
    SceneEntered {
        scene: SceneId,
        focused: Option<ExhibitId>,
        first_entry: bool,
    },
    InstructionsVisible(bool),
}

/// Events raised during a frame, drained by the UI.
#[derive(Debug, Default)]
pub struct EventOutbox {
    events: Vec<GalleryEvent>,
}

impl EventOutbox {
    pub fn push(&mut self, event: GalleryEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GalleryEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn peek(&self) -> &[GalleryEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Emits the camera position at a fixed interval, and only when it moved.
#[derive(Debug)]
pub struct PoseSampler {
    interval: Duration,
    since_sample: Duration,
    last: Option<Vec3>,
}

impl PoseSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_sample: Duration::ZERO,
            last: None,
        }
    }

    pub fn sample(&mut self, delta: Duration, position: Vec3) -> Option<Vec3> {
        self.since_sample += delta;
        if self.since_sample < self.interval {
            return None;
        }
        self.since_sample = Duration::ZERO;
        if self.last == Some(position) {
            return None;
        }
        self.last = Some(position);
        Some(position)
    }

    /// Forget the last sample so the next due sample is always sent.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

//! Time management for the render loop.

use std::time::{Duration, Instant};

/// Longest frame step handed to simulation code. Longer pauses (tab
/// switches, debugger breaks) are treated as a single capped step.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame, uncapped.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Cap applied by [`Time::step_seconds`].
    max_delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Create a time manager with a custom step cap.
    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            max_delta,
            ..Self::new()
        }
    }

    /// Update timing from the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.advance(delta);
    }

    /// Advance by an explicit frame duration (simulated or replayed frames).
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Get the raw delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the raw delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds, capped at the configured maximum step.
    pub fn step_seconds(&self) -> f32 {
        self.delta.min(self.max_delta).as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

//! Fade-out, swap, fade-in sequencing for scene changes.

use crate::scene::{ExhibitId, SceneId};
use engine_core::{CameraPose, TimerQueue};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Into a linked scene; the origin is remembered for the way back.
    Forward,
    /// Back to the scene a forward transition left.
    Back,
}

/// State handed from the outgoing scene to the incoming one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub from: SceneId,
    pub to: SceneId,
    pub direction: TransitionDirection,
    /// Exhibit the new scene should treat as focused.
    pub carry_exhibit: Option<ExhibitId>,
    /// Camera pose for the new scene. `None` uses its start pose.
    pub carry_camera: Option<CameraPose>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    FadingOut,
    FadingIn,
}

/// What the caller must do after advancing the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionStep {
    /// Screen is fully covered: replace the active scene now.
    Swap(TransitionRequest),
    /// Fade-in done; new requests are accepted again.
    Finished,
}

#[derive(Debug, Clone, Copy)]
enum FadeEvent {
    Midpoint { generation: u64 },
    Finish { generation: u64 },
}

/// Runs at most one scene change at a time.
#[derive(Debug)]
pub struct SceneTransition {
    phase: TransitionPhase,
    fade: Duration,
    /// Time since the in-flight request was accepted.
    elapsed: Duration,
    pending: Option<TransitionRequest>,
    timers: TimerQueue<FadeEvent>,
    generation: u64,
    alive: bool,
}

impl SceneTransition {
    pub fn new(fade: Duration) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            fade,
            elapsed: Duration::ZERO,
            pending: None,
            timers: TimerQueue::new(),
            generation: 0,
            alive: true,
        }
    }

    /// Start a transition. Returns false, changing nothing, while another
    /// is in flight or after shutdown.
    pub fn request(&mut self, request: TransitionRequest) -> bool {
        if !self.alive {
            log::debug!("Transition to '{}' ignored after shutdown", request.to);
            return false;
        }
        if self.phase != TransitionPhase::Idle {
            log::debug!("Transition to '{}' ignored; one is already running", request.to);
            return false;
        }

        self.generation += 1;
        let generation = self.generation;
        self.timers.schedule(self.fade, FadeEvent::Midpoint { generation });
        self.timers.schedule(self.fade * 2, FadeEvent::Finish { generation });
        log::info!("Transition '{}' -> '{}' ({:?})", request.from, request.to, request.direction);

        self.pending = Some(request);
        self.phase = TransitionPhase::FadingOut;
        self.elapsed = Duration::ZERO;
        true
    }

    /// Advance the fades by `delta` and report the steps that came due, in order.
    pub fn advance(&mut self, delta: Duration) -> Vec<TransitionStep> {
        let mut steps = Vec::new();
        if !self.alive {
            return steps;
        }
        if self.phase != TransitionPhase::Idle {
            self.elapsed += delta;
        }

        for event in self.timers.advance(delta) {
            match event {
                FadeEvent::Midpoint { generation } if self.is_current(generation) => {
                    if self.phase != TransitionPhase::FadingOut {
                        continue;
                    }
                    self.phase = TransitionPhase::FadingIn;
                    if let Some(request) = self.pending.take() {
                        steps.push(TransitionStep::Swap(request));
                    }
                }
                FadeEvent::Finish { generation } if self.is_current(generation) => {
                    self.phase = TransitionPhase::Idle;
                    self.elapsed = Duration::ZERO;
                    steps.push(TransitionStep::Finished);
                }
                stale => log::debug!("Dropping stale fade event {:?}", stale),
            }
        }
        steps
    }

    fn is_current(&self, generation: u64) -> bool {
        self.alive && generation == self.generation
    }

    /// Abort any transition in flight without swapping.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.phase != TransitionPhase::Idle;
        self.timers.cancel_all();
        self.pending = None;
        self.phase = TransitionPhase::Idle;
        self.elapsed = Duration::ZERO;
        if was_running {
            log::info!("Transition cancelled");
        }
        was_running
    }

    /// Cancel and refuse all further requests.
    pub fn shutdown(&mut self) {
        self.cancel();
        self.alive = false;
    }

    /// Overlay opacity: 0 to 1 over the fade-out, 1 to 0 over the fade-in.
    pub fn opacity(&self) -> f32 {
        let fade = self.fade.as_secs_f32();
        match self.phase {
            TransitionPhase::Idle => 0.0,
            TransitionPhase::FadingOut if fade <= 0.0 => 1.0,
            TransitionPhase::FadingIn if fade <= 0.0 => 0.0,
            TransitionPhase::FadingOut => (self.elapsed.as_secs_f32() / fade).clamp(0.0, 1.0),
            TransitionPhase::FadingIn => {
                (1.0 - (self.elapsed.as_secs_f32() - fade) / fade).clamp(0.0, 1.0)
            }
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Request waiting for the midpoint, if any.
    pub fn pending(&self) -> Option<&TransitionRequest> {
        self.pending.as_ref()
    }

    pub fn fade_duration(&self) -> Duration {
        self.fade
    }
}

//! The viewer driver: one active scene, its fades, and the per-frame order.
//!
//! Each frame runs, in order: queued actions, locomotion, exhibit proximity
//! and rotation, timers and the scene transition, then pose sampling. Actions
//! therefore see the proximity computed at the end of the previous frame.

use crate::camera_rig::CameraRig;
use crate::config::GalleryConfig;
use crate::events::{EventOutbox, GalleryEvent, PoseSampler};
use crate::interaction::{DragInput, InteractionSystem, SelectOutcome};
use crate::locomotion::LocomotionController;
use crate::scene::{ExhibitId, SceneCatalog, SceneDescriptor, SceneError, SceneId};
use crate::transition::{SceneTransition, TransitionDirection, TransitionRequest, TransitionStep};
use engine_core::{Camera, CameraPose, Time, TimerQueue};
use input::{Action, InputState, SceneTarget};
use physics::CollisionField;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneTimer {
    HideInstructions,
}

/// Everything that lives and dies with one scene.
pub struct ActiveScene {
    pub descriptor: SceneDescriptor,
    pub field: CollisionField,
    pub rig: CameraRig,
    pub locomotion: LocomotionController,
    pub interaction: InteractionSystem,
    /// Exhibit carried over from the previous scene, if this scene has it.
    pub focused: Option<ExhibitId>,
    timers: TimerQueue<SceneTimer>,
    instructions_visible: bool,
}

impl ActiveScene {
    fn build(
        descriptor: &SceneDescriptor,
        config: &GalleryConfig,
        pose: CameraPose,
        focus: Option<ExhibitId>,
    ) -> Self {
        let mut camera = Camera::from_pose(pose);
        camera.sensitivity = config.look.sensitivity;

        let mut locomotion = LocomotionController::new(config.locomotion.clone());
        locomotion.set_max_speed(descriptor.move_speed(config));

        let focused = focus.filter(|id| {
            let present = descriptor.exhibit(*id).is_some();
            if !present {
                log::info!("Carried exhibit {} is not in '{}'; no focus", id, descriptor.id);
            }
            present
        });

        Self {
            field: CollisionField::from_boxes(&descriptor.collider_boxes()),
            rig: CameraRig::new(camera),
            locomotion,
            interaction: InteractionSystem::from_scene(descriptor, config),
            focused,
            timers: TimerQueue::new(),
            instructions_visible: false,
            descriptor: descriptor.clone(),
        }
    }

    /// Release the camera and drop pending timers. Returns true if an
    /// inspection was still running.
    fn teardown(&mut self) -> bool {
        let was_inspecting = self.interaction.exit_inspection(&mut self.rig).is_some();
        self.timers.cancel_all();
        was_inspecting
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

/// Where a forward transition came from, for the way back.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPoint {
    pub scene: SceneId,
    pub pose: CameraPose,
}

/// Top-level viewer state, driven once per rendered frame.
pub struct Gallery {
    config: GalleryConfig,
    catalog: SceneCatalog,
    input: InputState,
    time: Time,
    scene: ActiveScene,
    transition: SceneTransition,
    return_stack: Vec<ReturnPoint>,
    outbox: EventOutbox,
    pose_sampler: PoseSampler,
    selected: Option<ExhibitId>,
    visited: HashSet<SceneId>,
}

impl Gallery {
    /// Open the viewer in scene `start`.
    pub fn new(config: GalleryConfig, catalog: SceneCatalog, start: &str) -> Result<Self, SceneError> {
        let descriptor = catalog
            .get(start)
            .ok_or_else(|| SceneError::UnknownScene(start.to_string()))?;
        let scene = ActiveScene::build(descriptor, &config, descriptor.start_pose(), None);

        let mut gallery = Self {
            input: InputState::new(),
            time: Time::with_max_delta(config.locomotion.max_frame_duration()),
            transition: SceneTransition::new(config.transition.fade()),
            return_stack: Vec::new(),
            outbox: EventOutbox::default(),
            pose_sampler: PoseSampler::new(Duration::from_secs_f32(config.ui.pose_sample_interval.max(0.0))),
            selected: None,
            visited: HashSet::new(),
            scene,
            catalog,
            config,
        };
        gallery.enter_current_scene();
        Ok(gallery)
    }

    /// Run one frame of `delta` simulated time.
    pub fn frame(&mut self, delta: Duration) {
        self.time.advance(delta);
        self.step();
    }

    /// Run one frame timed by the wall clock.
    pub fn tick(&mut self) {
        self.time.update();
        self.step();
    }

    fn step(&mut self) {
        let delta = self.time.delta();
        let dt = self.time.step_seconds();

        self.input.begin_frame();
        let actions = self.input.actions().to_vec();
        for action in actions {
            self.handle_action(action);
        }

        let held = self.input.held_movement();
        let look = self.input.mouse_delta();
        let scene = &mut self.scene;
        scene
            .locomotion
            .update(&held, look, &mut scene.rig, &scene.field, dt);

        scene.interaction.update_proximity(scene.rig.camera());
        scene.interaction.animate(
            dt,
            DragInput {
                active: self.input.is_dragging(),
                delta: self.input.drag_delta(),
            },
        );

        for timer in scene.timers.advance(delta) {
            match timer {
                SceneTimer::HideInstructions => {
                    scene.instructions_visible = false;
                    self.outbox.push(GalleryEvent::InstructionsVisible(false));
                }
            }
        }
        for step in self.transition.advance(delta) {
            match step {
                TransitionStep::Swap(request) => self.apply_swap(request),
                TransitionStep::Finished => log::debug!("Now in '{}'", self.scene.id()),
            }
        }

        let position = self.scene.rig.camera().position();
        if let Some(position) = self.pose_sampler.sample(delta, position) {
            self.outbox.push(GalleryEvent::CameraPoseChanged { position });
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Select { target } => self.select(target.map(ExhibitId)),
            Action::ExitInspection => {
                if self.scene.interaction.exit_inspection(&mut self.scene.rig).is_some() {
                    self.outbox.push(GalleryEvent::InteractionChanged(false));
                    self.set_selected(None);
                }
            }
            Action::ResetInspectionRotation => self.scene.interaction.reset_inspection_rotation(),
            Action::RequestSceneChange(SceneTarget::Previous) => {
                self.request_back();
            }
            Action::RequestSceneChange(SceneTarget::Scene(to)) => {
                let exhibit = self.selected;
                self.request_forward(&to, exhibit);
            }
        }
    }

    fn select(&mut self, target: Option<ExhibitId>) {
        let scene = &mut self.scene;
        match scene.interaction.select(target, &mut scene.rig) {
            SelectOutcome::Inspecting(id) => {
                self.set_selected(Some(id));
                self.outbox.push(GalleryEvent::InteractionChanged(true));
            }
            SelectOutcome::Selected { id, opens } => {
                self.set_selected(Some(id));
                self.request_forward(&opens, Some(id));
            }
            SelectOutcome::Ignored(reason) => log::debug!("Select {:?} ignored: {:?}", target, reason),
        }
    }

    fn set_selected(&mut self, selected: Option<ExhibitId>) {
        if self.selected != selected {
            self.selected = selected;
            self.outbox.push(GalleryEvent::SelectionChanged(selected));
        }
    }

    /// Fade to scene `to`, remembering the current scene and pose for the way back.
    pub fn request_forward(&mut self, to: &str, exhibit: Option<ExhibitId>) -> bool {
        if !self.catalog.contains(to) {
            log::warn!("Scene change to unknown scene '{}' ignored", to);
            return false;
        }
        if to == self.scene.id() {
            log::debug!("Already in '{}'", to);
            return false;
        }
        let pose = self.scene.rig.camera().pose();
        let request = TransitionRequest {
            from: self.scene.id().to_string(),
            to: to.to_string(),
            direction: TransitionDirection::Forward,
            carry_exhibit: exhibit,
            carry_camera: None,
        };
        if !self.submit(request) {
            return false;
        }
        // Going forward to the scene we would go back to closes the loop.
        if self.return_stack.last().is_some_and(|point| point.scene == to) {
            self.return_stack.pop();
        } else {
            self.return_stack.push(ReturnPoint {
                scene: self.scene.id().to_string(),
                pose,
            });
        }
        true
    }

    /// Fade back to the scene the last forward transition left, at the pose it had then.
    pub fn request_back(&mut self) -> bool {
        let Some(point) = self.return_stack.last() else {
            log::debug!("No scene to go back to");
            return false;
        };
        let request = TransitionRequest {
            from: self.scene.id().to_string(),
            to: point.scene.clone(),
            direction: TransitionDirection::Back,
            carry_exhibit: self.selected,
            carry_camera: Some(point.pose),
        };
        if !self.submit(request) {
            return false;
        }
        self.return_stack.pop();
        true
    }

    fn submit(&mut self, request: TransitionRequest) -> bool {
        let target = request.to.clone();
        let exhibit = request.carry_exhibit;
        if !self.transition.request(request) {
            return false;
        }
        self.outbox.push(GalleryEvent::SceneChangeRequested {
            target,
            exhibit,
            camera_position: self.scene.rig.camera().position(),
        });
        true
    }

    fn apply_swap(&mut self, request: TransitionRequest) {
        let Some(descriptor) = self.catalog.get(&request.to) else {
            log::warn!("Scene '{}' vanished before the swap; staying put", request.to);
            return;
        };
        let pose = request.carry_camera.unwrap_or_else(|| descriptor.start_pose());
        let next = ActiveScene::build(descriptor, &self.config, pose, request.carry_exhibit);

        if self.scene.teardown() {
            self.outbox.push(GalleryEvent::InteractionChanged(false));
        }
        if self.scene.instructions_visible {
            self.outbox.push(GalleryEvent::InstructionsVisible(false));
        }
        self.scene = next;
        self.input.clear_held();
        self.set_selected(None);
        self.pose_sampler.reset();
        self.enter_current_scene();
    }

    fn enter_current_scene(&mut self) {
        let id = self.scene.id().to_string();
        let first_entry = self.visited.insert(id.clone());
        log::info!(
            "Entered '{}' ({:?}, {} exhibit(s), first entry: {})",
            self.scene.descriptor.name,
            self.scene.descriptor.kind,
            self.scene.interaction.len(),
            first_entry
        );
        self.outbox.push(GalleryEvent::SceneEntered {
            scene: id,
            focused: self.scene.focused,
            first_entry,
        });

        if first_entry && self.scene.descriptor.settings.show_instructions {
            let duration = Duration::from_secs_f32(self.config.ui.instructions_duration.max(0.0));
            self.scene.timers.schedule(duration, SceneTimer::HideInstructions);
            self.scene.instructions_visible = true;
            self.outbox.push(GalleryEvent::InstructionsVisible(true));
        }
    }

    /// Stop everything: leave inspection, cancel fades and timers.
    pub fn teardown(&mut self) {
        if self.scene.teardown() {
            self.outbox.push(GalleryEvent::InteractionChanged(false));
        }
        self.scene.instructions_visible = false;
        self.transition.shutdown();
        self.input.clear_held();
    }

    /// Input sink for the windowing layer.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn drain_events(&mut self) -> Vec<GalleryEvent> {
        self.outbox.drain()
    }

    pub fn scene(&self) -> &ActiveScene {
        &self.scene
    }

    pub fn scene_id(&self) -> &str {
        self.scene.id()
    }

    pub fn camera(&self) -> &Camera {
        self.scene.rig.camera()
    }

    pub fn selected(&self) -> Option<ExhibitId> {
        self.selected
    }

    pub fn focused(&self) -> Option<ExhibitId> {
        self.scene.focused
    }

    pub fn is_inspecting(&self) -> bool {
        self.scene.interaction.is_inspecting()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_busy()
    }

    /// Fade overlay opacity for the renderer.
    pub fn fade_opacity(&self) -> f32 {
        self.transition.opacity()
    }

    pub fn instructions_visible(&self) -> bool {
        self.scene.instructions_visible
    }

    pub fn return_points(&self) -> &[ReturnPoint] {
        &self.return_stack
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn time(&self) -> &Time {
        &self.time
    }
}

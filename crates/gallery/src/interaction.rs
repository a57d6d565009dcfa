//! Exhibit proximity, selection and the close-up inspection mode.
//!
//! Exhibits live in a `hecs::World`. At most one of them is inspected at a
//! time; that one is named by the single [`InspectionSession`] slot and holds
//! the camera through the rig's ownership token while it lasts.

use crate::camera_rig::{CameraOwner, CameraRig};
use crate::config::{GalleryConfig, InteractionSettings};
use crate::scene::{ExhibitDef, ExhibitId, SceneDescriptor, SceneId};
use engine_core::{smooth_damp, Camera, CameraPose, EulerAngles, Transform};
use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Where an exhibit stands relative to the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionPhase {
    #[default]
    Idle,
    /// Within reach and roughly in view.
    Proximate,
    Inspecting,
}

/// What selecting an exhibit does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExhibitMode {
    /// Close-up inspection in place.
    Inspect,
    /// Selection requests a change to another scene.
    Link(SceneId),
    /// Shows its title; selecting it does nothing.
    Display,
}

/// Static exhibit data.
#[derive(Debug, Clone)]
pub struct Exhibit {
    pub id: ExhibitId,
    pub title: String,
    pub description: String,
    pub interaction_radius: f32,
    pub gaze_tolerance: f32,
    pub mode: ExhibitMode,
}

impl Exhibit {
    pub fn from_def(def: &ExhibitDef, default_radius: f32, default_gaze: f32) -> Self {
        let mode = match (&def.opens_scene, def.inspectable) {
            (Some(target), _) => ExhibitMode::Link(target.clone()),
            (None, true) => ExhibitMode::Inspect,
            (None, false) => ExhibitMode::Display,
        };
        Self {
            id: def.id,
            title: def.title.clone(),
            description: def.description.clone(),
            interaction_radius: def.interaction_radius.unwrap_or(default_radius),
            gaze_tolerance: def.gaze_tolerance.unwrap_or(default_gaze),
            mode,
        }
    }
}

/// Per-frame exhibit state. Only this module writes an exhibit's rotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhibitState {
    pub phase: InteractionPhase,
    pub angles: EulerAngles,
    /// Camera distance at the last proximity check.
    pub distance: f32,
    /// Angle between camera forward and the direction to the exhibit.
    pub gaze_angle: f32,
}

/// Snapshot taken on entering inspection, restored verbatim on exit.
#[derive(Debug, Clone)]
pub struct InspectionSession {
    pub entity: Entity,
    pub exhibit: ExhibitId,
    pub home_transform: Transform,
    pub home_angles: EulerAngles,
    pub saved_camera: CameraPose,
    /// Rotation at the moment inspection began; drag limits are measured from it.
    pub initial_angles: EulerAngles,
    pub target_angles: EulerAngles,
    settle_velocity: Vec2,
}

/// Pointer drag for this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragInput {
    pub active: bool,
    /// Pixels moved since the last frame.
    pub delta: Vec2,
}

/// Why a select action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another exhibit is already being inspected.
    InspectionActive,
    UnknownExhibit,
    /// Nothing is proximate, or the named exhibit is not.
    OutOfReach,
    /// A display-only exhibit.
    NotInteractive,
    /// The camera could not be claimed.
    CameraBusy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Inspection started.
    Inspecting(ExhibitId),
    /// A clickable exhibit was selected. `opens` names the scene it links to.
    Selected { id: ExhibitId, opens: SceneId },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// "Click to inspect" hint.
    Inspect,
    /// Title label only.
    Title,
}

/// UI hint for the exhibit the avatar is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub exhibit: ExhibitId,
    pub title: String,
    pub kind: PromptKind,
}

/// Owns every exhibit of the active scene.
pub struct InteractionSystem {
    world: World,
    index: HashMap<ExhibitId, Entity>,
    active: Option<InspectionSession>,
    settings: InteractionSettings,
}

impl InteractionSystem {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
            active: None,
            settings,
        }
    }

    /// Spawn every exhibit a scene lists, applying per-scene reach.
    pub fn from_scene(scene: &SceneDescriptor, config: &GalleryConfig) -> Self {
        let mut system = Self::new(config.interaction.clone());
        let radius = scene.interaction_distance(config);
        let gaze = config.interaction.gaze_tolerance;
        for def in &scene.exhibits {
            system.spawn(Exhibit::from_def(def, radius, gaze), Vec3::from(def.position));
        }
        log::debug!("Scene '{}': {} exhibit(s)", scene.id, system.len());
        system
    }

    pub fn spawn(&mut self, exhibit: Exhibit, position: Vec3) -> Entity {
        let id = exhibit.id;
        let entity = self
            .world
            .spawn((Transform::from_position(position), exhibit, ExhibitState::default()));
        if let Some(previous) = self.index.insert(id, entity) {
            log::warn!("Exhibit {} spawned twice; replacing", id);
            if self.world.despawn(previous).is_err() {
                log::warn!("Exhibit {} had no live entity to replace", id);
            }
        }
        entity
    }

    /// Re-evaluate distance and gaze for every exhibit not being inspected.
    pub fn update_proximity(&mut self, camera: &Camera) {
        let eye = camera.position();
        let forward = camera.forward();
        let inspected = self.active.as_ref().map(|s| s.entity);

        for (entity, (transform, exhibit, state)) in
            self.world.query_mut::<(&Transform, &Exhibit, &mut ExhibitState)>()
        {
            if Some(entity) == inspected {
                continue;
            }
            let to_exhibit = transform.position - eye;
            state.distance = to_exhibit.length();
            state.gaze_angle = if state.distance > f32::EPSILON {
                forward.angle_between(to_exhibit)
            } else {
                0.0
            };
            let within_reach = state.distance < exhibit.interaction_radius;
            let in_view = state.gaze_angle < exhibit.gaze_tolerance;
            state.phase = if within_reach && in_view {
                InteractionPhase::Proximate
            } else {
                InteractionPhase::Idle
            };
        }
    }

    /// Advance rotations: turntable spin for exhibits on display, drag or
    /// settle for the inspected one.
    pub fn animate(&mut self, dt: f32, drag: DragInput) {
        let inspected = self.active.as_ref().map(|s| s.entity);
        let spin = self.settings.auto_rotation_rate * dt;

        for (entity, (transform, state)) in self.world.query_mut::<(&mut Transform, &mut ExhibitState)>() {
            if Some(entity) == inspected {
                continue;
            }
            state.angles = EulerAngles::new(0.0, (state.angles.y + spin).rem_euclid(TAU), 0.0);
            transform.rotation = state.angles.to_quat();
        }

        let Some(session) = self.active.as_mut() else {
            return;
        };
        let Ok((transform, state)) = self
            .world
            .query_one_mut::<(&mut Transform, &mut ExhibitState)>(session.entity)
        else {
            return;
        };

        if drag.active {
            let sensitivity = self.settings.drag_sensitivity;
            let yaw_limit = self.settings.max_yaw_degrees.to_radians();
            let pitch_limit = self.settings.max_pitch_degrees.to_radians();
            let initial = session.initial_angles;
            // Drag moves the exhibit from where it is now, even mid-ease.
            state.angles.y = (state.angles.y + drag.delta.x * sensitivity)
                .clamp(initial.y - yaw_limit, initial.y + yaw_limit);
            state.angles.x = (state.angles.x + drag.delta.y * sensitivity)
                .clamp(initial.x - pitch_limit, initial.x + pitch_limit);
            session.target_angles = state.angles;
            session.settle_velocity = Vec2::ZERO;
        } else {
            let settle = self.settings.settle_time;
            let target = session.target_angles;
            let velocity = &mut session.settle_velocity;
            state.angles.x = smooth_damp(state.angles.x, target.x, &mut velocity.x, settle, dt);
            state.angles.y = smooth_damp(state.angles.y, target.y, &mut velocity.y, settle, dt);
            state.angles.z = target.z;
        }
        transform.rotation = state.angles.to_quat();
    }

    /// Select an exhibit by id, or the proximate one nearest the centre of view.
    pub fn select(&mut self, target: Option<ExhibitId>, rig: &mut CameraRig) -> SelectOutcome {
        if self.active.is_some() {
            return SelectOutcome::Ignored(IgnoreReason::InspectionActive);
        }
        let entity = match target {
            Some(id) => match self.index.get(&id) {
                Some(entity) => *entity,
                None => return SelectOutcome::Ignored(IgnoreReason::UnknownExhibit),
            },
            None => match self.gaze_target() {
                Some(entity) => entity,
                None => return SelectOutcome::Ignored(IgnoreReason::OutOfReach),
            },
        };

        let (id, mode, phase) = match self.world.query_one_mut::<(&Exhibit, &ExhibitState)>(entity) {
            Ok((exhibit, state)) => (exhibit.id, exhibit.mode.clone(), state.phase),
            Err(_) => return SelectOutcome::Ignored(IgnoreReason::UnknownExhibit),
        };
        if phase != InteractionPhase::Proximate {
            return SelectOutcome::Ignored(IgnoreReason::OutOfReach);
        }

        match mode {
            ExhibitMode::Inspect => self.begin_inspection(entity, id, rig),
            ExhibitMode::Link(opens) => {
                log::info!("Exhibit {} selected; opens '{}'", id, opens);
                SelectOutcome::Selected { id, opens }
            }
            ExhibitMode::Display => SelectOutcome::Ignored(IgnoreReason::NotInteractive),
        }
    }

    fn begin_inspection(&mut self, entity: Entity, id: ExhibitId, rig: &mut CameraRig) -> SelectOutcome {
        let camera = rig.camera();
        let saved_camera = camera.pose();
        let hold_at = camera.position() + camera.forward() * self.settings.inspect_distance;

        let Ok((transform, state)) = self
            .world
            .query_one_mut::<(&mut Transform, &mut ExhibitState)>(entity)
        else {
            return SelectOutcome::Ignored(IgnoreReason::UnknownExhibit);
        };
        if !rig.transfer(CameraOwner::Locomotion, CameraOwner::Inspection(entity)) {
            return SelectOutcome::Ignored(IgnoreReason::CameraBusy);
        }

        let session = InspectionSession {
            entity,
            exhibit: id,
            home_transform: *transform,
            home_angles: state.angles,
            saved_camera,
            initial_angles: EulerAngles::ZERO,
            target_angles: EulerAngles::ZERO,
            settle_velocity: Vec2::ZERO,
        };
        transform.position = hold_at;
        state.angles = EulerAngles::ZERO;
        transform.rotation = state.angles.to_quat();
        state.phase = InteractionPhase::Inspecting;

        log::info!("Inspecting exhibit {}", id);
        self.active = Some(session);
        SelectOutcome::Inspecting(id)
    }

    /// Leave inspection, restoring the exhibit and camera to their snapshot.
    /// Returns the exhibit that was inspected.
    pub fn exit_inspection(&mut self, rig: &mut CameraRig) -> Option<ExhibitId> {
        let session = self.active.take()?;
        match self
            .world
            .query_one_mut::<(&mut Transform, &mut ExhibitState)>(session.entity)
        {
            Ok((transform, state)) => {
                *transform = session.home_transform;
                state.angles = session.home_angles;
                state.phase = InteractionPhase::Idle;
            }
            Err(_) => log::warn!("Inspected exhibit {} vanished before exit", session.exhibit),
        }

        let owner = CameraOwner::Inspection(session.entity);
        if let Some(camera) = rig.write(owner) {
            camera.set_pose(session.saved_camera);
        }
        rig.transfer(owner, CameraOwner::Locomotion);
        log::info!("Left inspection of exhibit {}", session.exhibit);
        Some(session.exhibit)
    }

    /// Ease the inspected exhibit back to the rotation it had on entry.
    pub fn reset_inspection_rotation(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.target_angles = session.initial_angles;
        }
    }

    /// Proximate exhibit with the smallest gaze angle.
    fn gaze_target(&self) -> Option<Entity> {
        let mut query = self.world.query::<&ExhibitState>();
        let nearest = query
            .iter()
            .filter(|(_, state)| state.phase == InteractionPhase::Proximate)
            .min_by(|(_, a), (_, b)| a.gaze_angle.total_cmp(&b.gaze_angle))
            .map(|(entity, _)| entity);
        nearest
    }

    /// Prompt for the exhibit currently in view, if any. Hidden while inspecting.
    pub fn prompt(&self) -> Option<Prompt> {
        if self.active.is_some() {
            return None;
        }
        let entity = self.gaze_target()?;
        let exhibit = self.world.get::<&Exhibit>(entity).ok()?;
        let kind = match exhibit.mode {
            ExhibitMode::Inspect => PromptKind::Inspect,
            ExhibitMode::Link(_) | ExhibitMode::Display => PromptKind::Title,
        };
        Some(Prompt {
            exhibit: exhibit.id,
            title: exhibit.title.clone(),
            kind,
        })
    }

    /// Outline strength in [0, 1]: full when near, none when far.
    pub fn highlight(&self, id: ExhibitId) -> Option<f32> {
        let state = self.state(id)?;
        let near = self.settings.highlight_near;
        let span = (self.settings.highlight_far - near).max(f32::EPSILON);
        Some(1.0 - ((state.distance - near) / span).clamp(0.0, 1.0))
    }

    pub fn phase(&self, id: ExhibitId) -> Option<InteractionPhase> {
        self.state(id).map(|s| s.phase)
    }

    pub fn state(&self, id: ExhibitId) -> Option<ExhibitState> {
        let entity = self.index.get(&id)?;
        self.world.get::<&ExhibitState>(*entity).ok().map(|s| *s)
    }

    pub fn transform(&self, id: ExhibitId) -> Option<Transform> {
        let entity = self.index.get(&id)?;
        self.world.get::<&Transform>(*entity).ok().map(|t| *t)
    }

    pub fn exhibit(&self, id: ExhibitId) -> Option<Exhibit> {
        let entity = self.index.get(&id)?;
        self.world.get::<&Exhibit>(*entity).ok().map(|e| (*e).clone())
    }

    pub fn entity(&self, id: ExhibitId) -> Option<Entity> {
        self.index.get(&id).copied()
    }

    pub fn session(&self) -> Option<&InspectionSession> {
        self.active.as_ref()
    }

    pub fn inspected(&self) -> Option<ExhibitId> {
        self.active.as_ref().map(|s| s.exhibit)
    }

    pub fn is_inspecting(&self) -> bool {
        self.active.is_some()
    }

    /// How many exhibits currently hold the camera. Never more than one.
    pub fn camera_claims(&self, rig: &CameraRig) -> usize {
        self.world
            .iter()
            .filter(|e| rig.is_owned_by(CameraOwner::Inspection(e.entity())))
            .count()
    }

    pub fn contains(&self, id: ExhibitId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

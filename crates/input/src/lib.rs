//! Input handling for keyboard, pointer and discrete viewer actions.
//!
//! Event handlers only record state. Nothing here moves the camera or an
//! exhibit; the render loop reads the recorded state once per frame.

use glam::Vec2;
use std::collections::HashSet;

/// One of the four screen-relative movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MovementKey {
    pub const ALL: [MovementKey; 4] = [
        MovementKey::Forward,
        MovementKey::Back,
        MovementKey::Left,
        MovementKey::Right,
    ];

    /// Map a physical key to a movement direction. Other keys map to nothing.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(MovementKey::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(MovementKey::Back),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(MovementKey::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(MovementKey::Right),
            _ => None,
        }
    }

    /// Contribution in (strafe, forward) space.
    pub fn axis(self) -> Vec2 {
        match self {
            MovementKey::Forward => Vec2::new(0.0, 1.0),
            MovementKey::Back => Vec2::new(0.0, -1.0),
            MovementKey::Left => Vec2::new(-1.0, 0.0),
            MovementKey::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Which scene a scene-change action asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    /// Return to the scene the last forward transition left.
    Previous,
    /// Jump to a scene by id.
    Scene(String),
}

/// Discrete user actions raised by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Select an exhibit. `None` means whatever the avatar is looking at.
    Select { target: Option<u32> },
    /// Leave the current inspection.
    ExitInspection,
    /// Ease the inspected exhibit back to the rotation it had on entry.
    ResetInspectionRotation,
    /// Ask for a full scene change.
    RequestSceneChange(SceneTarget),
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed since the last frame began.
    pending_pressed: HashSet<KeyCode>,

    /// Pointer position in screen coordinates.
    pointer_position: Vec2,
    /// Whether the primary pointer button is held.
    pointer_down: bool,
    /// Pointer travel while held, accumulated since the last frame.
    accumulated_drag: Vec2,
    /// Pointer travel while held during this frame.
    drag_delta: Vec2,

    /// Raw mouse movement delta this frame (look controls).
    mouse_delta: Vec2,
    /// Accumulated mouse delta (for when cursor is locked).
    accumulated_delta: Vec2,

    /// Actions raised since the last frame began.
    pending_actions: Vec<Action>,
    /// Actions for this frame.
    actions: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch everything recorded since the previous frame. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed = std::mem::take(&mut self.pending_pressed);
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.drag_delta = self.accumulated_drag;
        self.accumulated_drag = Vec2::ZERO;
        self.actions = std::mem::take(&mut self.pending_actions);
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.pending_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Primary pointer pressed at a screen position.
    pub fn process_pointer_down(&mut self, position: (f64, f64)) {
        self.pointer_down = true;
        self.pointer_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Pointer moved to a screen position. Travel counts as drag only while held.
    pub fn process_pointer_move(&mut self, position: (f64, f64)) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        if self.pointer_down {
            self.accumulated_drag += position - self.pointer_position;
        }
        self.pointer_position = position;
    }

    /// Primary pointer released.
    pub fn process_pointer_up(&mut self) {
        self.pointer_down = false;
    }

    /// Process raw mouse movement (pointer-locked look).
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Queue a discrete action for the next frame.
    pub fn push_action(&mut self, action: Action) {
        self.pending_actions.push(action);
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Movement directions currently held. Unmapped keys are ignored.
    pub fn held_movement(&self) -> HashSet<MovementKey> {
        self.keys_held
            .iter()
            .filter_map(|key| MovementKey::from_key(*key))
            .collect()
    }

    /// Get the pointer position in screen coordinates.
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer_position
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.pointer_down
    }

    /// Pointer travel while held during this frame.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Actions raised for this frame.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Forget held keys and any drag in progress (scene teardown).
    pub fn clear_held(&mut self) {
        self.keys_held.clear();
        self.pointer_down = false;
        self.accumulated_drag = Vec2::ZERO;
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_do_not_move() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        input.process_keyboard(KeyCode::F5, ElementState::Pressed);
        assert!(input.held_movement().is_empty());
    }

    #[test]
    fn aliases_collapse_into_one_direction() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(
            input.held_movement(),
            HashSet::from([MovementKey::Forward, MovementKey::Right])
        );
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        assert_eq!(input.held_movement().len(), 3);
        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert_eq!(
            input.held_movement(),
            HashSet::from([MovementKey::Forward, MovementKey::Right, MovementKey::Left])
        );
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Released);
        assert_eq!(
            input.held_movement(),
            HashSet::from([MovementKey::Right, MovementKey::Left])
        );
    }

    #[test]
    fn drag_accumulates_only_while_held() {
        let mut input = InputState::new();
        input.process_pointer_move((100.0, 100.0));
        input.process_pointer_move((140.0, 90.0));
        input.process_pointer_down((140.0, 90.0));
        input.process_pointer_move((150.0, 95.0));
        input.process_pointer_move((170.0, 80.0));
        input.begin_frame();
        assert!(input.is_dragging());
        assert_eq!(input.drag_delta(), Vec2::new(30.0, -10.0));

        input.process_pointer_up();
        input.process_pointer_move((300.0, 300.0));
        input.begin_frame();
        assert!(!input.is_dragging());
        assert_eq!(input.drag_delta(), Vec2::ZERO);
    }

    #[test]
    fn actions_latch_per_frame() {
        let mut input = InputState::new();
        input.push_action(Action::Select { target: None });
        assert!(input.actions().is_empty());
        input.begin_frame();
        assert_eq!(input.actions(), &[Action::Select { target: None }]);
        input.begin_frame();
        assert!(input.actions().is_empty());
    }

    #[test]
    fn key_press_is_reported_once() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyE, ElementState::Pressed);
        input.begin_frame();
        assert!(input.is_key_pressed(KeyCode::KeyE));
        input.process_keyboard(KeyCode::KeyE, ElementState::Pressed);
        input.begin_frame();
        assert!(!input.is_key_pressed(KeyCode::KeyE));
        assert!(input.is_key_held(KeyCode::KeyE));
    }
}

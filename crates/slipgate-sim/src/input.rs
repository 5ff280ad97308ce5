//! Input mapping for the simulation.
//!
//! Backend-agnostic key state tracking with edge detection, rebindable
//! action bindings, and the per-tick [`InputFrame`] snapshot that turns
//! held movement keys plus camera orientation into a world-space wish
//! direction. The engine (or a scripted driver) pushes raw key
//! transitions in; nothing here touches a real device.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::camera::Camera;

/// Errors from the binding table.
#[derive(Debug, Clone, Error)]
pub enum BindingError {
    /// Action not present in the binding table
    #[error("action not bound: {action:?}")]
    ActionNotBound {
        /// The unbound action
        action: Action,
    },

    /// Key already claimed by another action
    #[error("key {key:?} already bound to {action:?}")]
    KeyAlreadyBound {
        /// The conflicting key
        key: KeyCode,
        /// The action currently holding it
        action: Action,
    },
}

/// Keys the simulation binds by default, plus spares for rebinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// F key
    F,
    /// F3 function key
    F3,
    /// Space bar
    Space,
    /// Left Shift
    LShift,
    /// Right Shift
    RShift,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// State of a key (pressed, just pressed, just released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the key is currently held down
    pub pressed: bool,
    /// Whether the key went down this frame
    pub just_pressed: bool,
    /// Whether the key went up this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Create a new released button state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            just_pressed: false,
            just_released: false,
        }
    }

    /// Update from the current physical state, deriving edges.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }

    /// Clear the edge flags. Call at the end of each frame.
    pub fn clear_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Simulation actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk toward the camera's flat forward (W by default)
    MoveForward,
    /// Walk away from the camera's flat forward (S by default)
    MoveBackward,
    /// Strafe left (A by default)
    StrafeLeft,
    /// Strafe right (D by default)
    StrafeRight,
    /// Jump, also fly-mode ascent (Space by default)
    Jump,
    /// Sprint while held (Shift by default)
    Sprint,
    /// Toggle cheat-fly mode (F by default)
    ToggleFly,
    /// Toggle the debug overlay (F3 by default)
    ToggleOverlay,
}

/// Key binding: a primary key and an optional secondary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key for this action
    pub primary: KeyCode,
    /// Optional secondary key
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    /// Bind a single key.
    #[must_use]
    pub const fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Bind a primary and a secondary key.
    #[must_use]
    pub const fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Whether a key matches this binding.
    #[must_use]
    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

/// Per-tick input snapshot handed to the movement controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    /// Movement axes in the camera's local frame: x is strafe (right
    /// positive), y is forward. Diagonals are normalized.
    pub axes: Vec2,
    /// Jump key held. The controller treats jump as level-triggered so a
    /// held key re-jumps on landing.
    pub jump: bool,
    /// Sprint key held
    pub sprinting: bool,
    /// Fly toggle went down this frame
    pub toggle_fly: bool,
    /// Overlay toggle went down this frame
    pub toggle_overlay: bool,
}

impl InputFrame {
    /// Whether any movement key is held.
    #[must_use]
    pub fn has_movement(&self) -> bool {
        self.axes != Vec2::ZERO
    }

    /// Rotate the local movement axes into world space using the camera's
    /// ground-plane basis. Returns a unit vector with zero y, or zero when
    /// no movement is held.
    #[must_use]
    pub fn wish_direction(&self, camera: &Camera) -> Vec3 {
        let world = camera.flat_forward() * self.axes.y + camera.right() * self.axes.x;
        world.normalize_or_zero()
    }
}

/// Tracks key states and maps them to actions.
#[derive(Debug)]
pub struct InputMapper {
    /// Current key states
    key_states: HashMap<KeyCode, ButtonState>,
    /// Action to key bindings
    bindings: HashMap<Action, KeyBinding>,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl InputMapper {
    /// Create a mapper with the default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut mapper = Self {
            key_states: HashMap::new(),
            bindings: HashMap::new(),
        };
        mapper.set_default_bindings();
        mapper
    }

    /// Reset the binding table to the defaults.
    pub fn set_default_bindings(&mut self) {
        self.bindings.clear();
        self.bindings.insert(
            Action::MoveForward,
            KeyBinding::with_secondary(KeyCode::W, KeyCode::Up),
        );
        self.bindings.insert(
            Action::MoveBackward,
            KeyBinding::with_secondary(KeyCode::S, KeyCode::Down),
        );
        self.bindings.insert(
            Action::StrafeLeft,
            KeyBinding::with_secondary(KeyCode::A, KeyCode::Left),
        );
        self.bindings.insert(
            Action::StrafeRight,
            KeyBinding::with_secondary(KeyCode::D, KeyCode::Right),
        );
        self.bindings
            .insert(Action::Jump, KeyBinding::new(KeyCode::Space));
        self.bindings.insert(
            Action::Sprint,
            KeyBinding::with_secondary(KeyCode::LShift, KeyCode::RShift),
        );
        self.bindings
            .insert(Action::ToggleFly, KeyBinding::new(KeyCode::F));
        self.bindings
            .insert(Action::ToggleOverlay, KeyBinding::new(KeyCode::F3));
    }

    /// Rebind an action, refusing keys already claimed by another action.
    pub fn rebind(&mut self, action: Action, binding: KeyBinding) -> Result<(), BindingError> {
        for (other, existing) in &self.bindings {
            if *other == action {
                continue;
            }
            for key in [Some(binding.primary), binding.secondary].into_iter().flatten() {
                if existing.matches(key) {
                    return Err(BindingError::KeyAlreadyBound {
                        key,
                        action: *other,
                    });
                }
            }
        }
        self.bindings.insert(action, binding);
        Ok(())
    }

    /// Current binding for an action.
    pub fn binding(&self, action: Action) -> Result<&KeyBinding, BindingError> {
        self.bindings
            .get(&action)
            .ok_or(BindingError::ActionNotBound { action })
    }

    /// Push a key transition from the backend.
    pub fn update_key(&mut self, key: KeyCode, is_pressed: bool) {
        self.key_states.entry(key).or_default().update(is_pressed);
    }

    /// Clear edge flags. Call once at the end of each frame.
    pub fn end_frame(&mut self) {
        for state in self.key_states.values_mut() {
            state.clear_frame();
        }
    }

    /// Whether a key is currently held.
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_states.get(&key).is_some_and(|state| state.pressed)
    }

    /// Whether a key went down this frame.
    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.key_states
            .get(&key)
            .is_some_and(|state| state.just_pressed)
    }

    /// Whether a key went up this frame.
    #[must_use]
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.key_states
            .get(&key)
            .is_some_and(|state| state.just_released)
    }

    /// Whether an action's bound key is held.
    #[must_use]
    pub fn is_action_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_pressed(key))
        })
    }

    /// Whether an action's bound key went down this frame.
    #[must_use]
    pub fn is_action_just_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_just_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_just_pressed(key))
        })
    }

    /// Snapshot the current state into an [`InputFrame`].
    #[must_use]
    pub fn sample(&self) -> InputFrame {
        let mut axes = Vec2::ZERO;
        if self.is_action_pressed(Action::MoveForward) {
            axes.y += 1.0;
        }
        if self.is_action_pressed(Action::MoveBackward) {
            axes.y -= 1.0;
        }
        if self.is_action_pressed(Action::StrafeLeft) {
            axes.x -= 1.0;
        }
        if self.is_action_pressed(Action::StrafeRight) {
            axes.x += 1.0;
        }
        if axes.length_squared() > 1.0 {
            axes = axes.normalize();
        }

        InputFrame {
            axes,
            jump: self.is_action_pressed(Action::Jump),
            sprinting: self.is_action_pressed(Action::Sprint),
            toggle_fly: self.is_action_just_pressed(Action::ToggleFly),
            toggle_overlay: self.is_action_just_pressed(Action::ToggleOverlay),
        }
    }
}

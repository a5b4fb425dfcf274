//! Input query contract consumed by camera strategies
//!
//! Device capture is the host's job. The scene only asks "is this action
//! held" and reads per-tick pointer deltas, which the camera system resets
//! exactly once per tick after every camera has read them.

use crate::math::Vec2;
use rustc_hash::FxHashSet;

/// Movement action names queried by character control and free-roam panning
pub mod actions {
    /// Move forward (typically W)
    pub const MOVE_FORWARD: &str = "move_forward";
    /// Move backward (typically S)
    pub const MOVE_BACKWARD: &str = "move_backward";
    /// Strafe left (typically A)
    pub const MOVE_LEFT: &str = "move_left";
    /// Strafe right (typically D)
    pub const MOVE_RIGHT: &str = "move_right";
}

/// Key name of the pan modifier used by orbit drag
pub const PAN_MODIFIER_KEY: &str = "Shift";

/// Mouse buttons the camera cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left click
    Primary,
    /// Right click
    Secondary,
    /// Wheel click
    Middle,
}

/// Read access to the current input state
pub trait InputSource: Send {
    /// Whether a named action is held
    fn is_action_pressed(&self, action: &str) -> bool;

    /// Whether a named key is held
    fn is_key_pressed(&self, key: &str) -> bool;

    /// Whether a mouse button is held
    fn is_button_pressed(&self, button: MouseButton) -> bool;

    /// Pointer movement accumulated this tick
    fn mouse_delta(&self) -> Vec2;

    /// Wheel movement accumulated this tick (positive zooms in)
    fn wheel_delta(&self) -> f32;

    /// Clear per-tick deltas
    fn reset_deltas(&mut self);
}

/// Plain input state fed by the host
#[derive(Clone, Debug, Default)]
pub struct InputState {
    actions: FxHashSet<String>,
    keys: FxHashSet<String>,
    buttons: FxHashSet<MouseButton>,
    mouse_delta: Vec2,
    wheel_delta: f32,
}

impl InputState {
    /// Create empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release an action
    pub fn set_action(&mut self, action: impl Into<String>, pressed: bool) {
        let action = action.into();
        if pressed {
            self.actions.insert(action);
        } else {
            self.actions.remove(&action);
        }
    }

    /// Press or release a key
    pub fn set_key(&mut self, key: impl Into<String>, pressed: bool) {
        let key = key.into();
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Press or release a mouse button
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Accumulate pointer motion
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.x += dx;
        self.mouse_delta.y += dy;
    }

    /// Accumulate wheel motion
    pub fn add_wheel_delta(&mut self, delta: f32) {
        self.wheel_delta += delta;
    }

    /// Builder form of [`set_action`](Self::set_action)
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.set_action(action, true);
        self
    }
}

impl InputSource for InputState {
    fn is_action_pressed(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    fn is_key_pressed(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.wheel_delta = 0.0;
    }
}

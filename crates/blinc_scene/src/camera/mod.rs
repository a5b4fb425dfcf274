//! Multi-mode camera controller
//!
//! Five mutually exclusive modes, one stateless strategy each:
//!
//! - [`OrbitStrategy`] - editor orbit with pan and zoom
//! - [`FirstPersonStrategy`] - eye-level view, no smoothing
//! - [`ThirdPersonStrategy`] - chase camera around the target's shoulders
//! - [`IsometricStrategy`] - pinned 45 degree pitch, free yaw
//! - [`SidescrollStrategy`] - 2.5D side view
//!
//! [`CameraSystem`] dispatches to the strategy for each camera's mode, drives
//! the bound character and smooths the result. [`CameraPresetManager`] holds
//! the named presets used while the experience runs.

mod component;
mod first_person;
mod isometric;
mod orbit;
mod presets;
mod sidescroll;
mod smoothing;
mod strategy;
mod system;
mod third_person;

pub use component::{CameraComponent, CameraMode, PRESET_HISTORY_LEN};
pub use first_person::{FirstPersonStrategy, EYE_FORWARD, EYE_HEIGHT};
pub use isometric::{IsometricStrategy, ISO_PITCH, ISO_PIVOT_HEIGHT};
pub use orbit::OrbitStrategy;
pub use presets::{
    find_player, CameraPreset, CameraPresetManager, PresetSnapshot, FIRST_PERSON_PRESET,
    GOD_VIEW_PRESET, SIDE_SCROLL_PRESET, THIRD_PERSON_PRESET,
};
pub use sidescroll::SidescrollStrategy;
pub use smoothing::{catch_up_factor, smooth_pose, smoothing_factor};
pub use strategy::{strategy_for, switch_mode, CameraPose, CameraStrategy, ModeTransition};
pub use system::{CameraSystem, CAMERA_PRIORITY};
pub use third_person::{ThirdPersonStrategy, SHOULDER_HEIGHT};

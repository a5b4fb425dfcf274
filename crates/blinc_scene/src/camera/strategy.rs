//! Per-mode camera strategies and mode transitions

use super::{
    CameraComponent, CameraMode, FirstPersonStrategy, IsometricStrategy, OrbitStrategy,
    SidescrollStrategy, ThirdPersonStrategy,
};
use crate::config::CameraSettings;
use crate::integration::InputSource;
use crate::math::Vec3;

/// Plain numeric camera pose
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPose {
    /// World position
    pub position: Vec3,
    /// Pitch, yaw, roll in degrees
    pub rotation: Vec3,
    /// World-space point the camera looks toward
    pub pivot: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

/// Mode-specific input handling and pose computation
///
/// Strategies hold no state of their own; everything lives on the
/// [`CameraComponent`], so one static instance per mode serves every camera.
pub trait CameraStrategy: Sync {
    /// Mode this strategy implements
    fn mode(&self) -> CameraMode;

    /// Called when a camera switches into this mode
    fn enter(&self, _camera: &mut CameraComponent) {}

    /// Called when a camera leaves this mode
    fn exit(&self, camera: &mut CameraComponent) {
        camera.pivot_offset = Vec3::ZERO;
    }

    /// Update yaw, pitch and pivot offset from input
    fn handle_input(
        &self,
        camera: &mut CameraComponent,
        input: &dyn InputSource,
        settings: &CameraSettings,
        dt: f32,
    );

    /// Desired pose for a target position. Never mutates the camera.
    fn update_target(&self, camera: &CameraComponent, target: Option<Vec3>, dt: f32) -> CameraPose;

    /// Whether the wheel changes `distance` in this mode
    fn supports_zoom(&self) -> bool {
        false
    }

    /// Whether large position errors boost the smoothing factor
    fn catch_up(&self) -> bool {
        true
    }

    /// Whether the pose is applied without smoothing
    fn instant(&self) -> bool {
        false
    }
}

static ORBIT: OrbitStrategy = OrbitStrategy;
static FIRST_PERSON: FirstPersonStrategy = FirstPersonStrategy;
static THIRD_PERSON: ThirdPersonStrategy = ThirdPersonStrategy;
static ISOMETRIC: IsometricStrategy = IsometricStrategy;
static SIDESCROLL: SidescrollStrategy = SidescrollStrategy;

/// Strategy for a mode
pub fn strategy_for(mode: CameraMode) -> &'static dyn CameraStrategy {
    match mode {
        CameraMode::Orbit => &ORBIT,
        CameraMode::FirstPerson => &FIRST_PERSON,
        CameraMode::ThirdPerson => &THIRD_PERSON,
        CameraMode::Isometric => &ISOMETRIC,
        CameraMode::Sidescroll => &SIDESCROLL,
    }
}

/// A pending change between the mode a camera last ran in and its current mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTransition {
    /// Mode seen on the previous tick (`None` on a camera's first tick)
    pub from: Option<CameraMode>,
    pub to: CameraMode,
}

impl ModeTransition {
    /// Compare the camera's mode with its last-mode memo
    pub fn detect(camera: &CameraComponent) -> Option<Self> {
        match camera.last_mode {
            Some(last) if last == camera.mode => None,
            from => Some(Self { from, to: camera.mode }),
        }
    }

    /// Run `exit` on the old strategy and `enter` on the new one, then record
    /// the new mode in the memo
    pub fn apply(self, camera: &mut CameraComponent) {
        if let Some(from) = self.from {
            strategy_for(from).exit(camera);
        }
        strategy_for(self.to).enter(camera);
        camera.last_mode = Some(self.to);
        tracing::debug!(from = ?self.from, to = %self.to, "camera mode switch");
    }
}

/// Switch a camera to a new mode immediately, with symmetric exit/enter
pub fn switch_mode(camera: &mut CameraComponent, mode: CameraMode) {
    let from = camera.last_mode.unwrap_or(camera.mode);
    strategy_for(from).exit(camera);
    camera.mode = mode;
    strategy_for(mode).enter(camera);
    camera.last_mode = Some(mode);
}

use super::orbit::rotate_from_pointer;
use super::{CameraComponent, CameraMode, CameraPose, CameraStrategy};
use crate::config::CameraSettings;
use crate::integration::InputSource;
use crate::math::{yaw_forward, Vec3};

/// Eye height above the target origin
pub const EYE_HEIGHT: f32 = 1.7;
/// Forward push so the eye clears the character's own collider
pub const EYE_FORWARD: f32 = 0.6;

/// Camera at the target's eyes; pointer motion always looks around
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstPersonStrategy;

impl CameraStrategy for FirstPersonStrategy {
    fn mode(&self) -> CameraMode {
        CameraMode::FirstPerson
    }

    fn enter(&self, camera: &mut CameraComponent) {
        camera.pitch = 0.0;
    }

    fn handle_input(
        &self,
        camera: &mut CameraComponent,
        input: &dyn InputSource,
        settings: &CameraSettings,
        _dt: f32,
    ) {
        rotate_from_pointer(camera, input, settings);
    }

    fn update_target(
        &self,
        camera: &CameraComponent,
        target: Option<Vec3>,
        _dt: f32,
    ) -> CameraPose {
        let forward = yaw_forward(camera.yaw);
        let eye =
            target.unwrap_or(Vec3::ZERO) + Vec3::new(0.0, EYE_HEIGHT, 0.0) + forward * EYE_FORWARD;
        CameraPose {
            position: eye,
            rotation: Vec3::new(camera.pitch, camera.yaw, 0.0),
            pivot: eye + forward,
            fov: camera.fov,
        }
    }

    // Lag on a first-person view is disorienting
    fn instant(&self) -> bool {
        true
    }
}

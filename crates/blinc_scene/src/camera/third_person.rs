use super::orbit::rotate_from_pointer;
use super::{CameraComponent, CameraMode, CameraPose, CameraStrategy};
use crate::config::CameraSettings;
use crate::integration::{InputSource, MouseButton};
use crate::math::{spherical_offset, Vec3};

/// Height of the look-at pivot above the target
pub const SHOULDER_HEIGHT: f32 = 1.5;

/// Chase camera on a sphere around the target's shoulders
///
/// The reported rotation uses `(pitch, yaw, 0)`, the opposite pitch sign of
/// orbit. Third person reads pitch as "how far the view tilts up" while orbit
/// reads it as elevation above the pivot.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThirdPersonStrategy;

impl CameraStrategy for ThirdPersonStrategy {
    fn mode(&self) -> CameraMode {
        CameraMode::ThirdPerson
    }

    fn handle_input(
        &self,
        camera: &mut CameraComponent,
        input: &dyn InputSource,
        settings: &CameraSettings,
        _dt: f32,
    ) {
        if input.is_button_pressed(MouseButton::Secondary) {
            rotate_from_pointer(camera, input, settings);
        }
    }

    fn update_target(
        &self,
        camera: &CameraComponent,
        target: Option<Vec3>,
        _dt: f32,
    ) -> CameraPose {
        let pivot = target.unwrap_or(Vec3::ZERO)
            + Vec3::new(0.0, SHOULDER_HEIGHT, 0.0)
            + camera.pivot_offset;
        CameraPose {
            position: pivot + spherical_offset(camera.pitch, camera.yaw, camera.distance),
            rotation: Vec3::new(camera.pitch, camera.yaw, 0.0),
            pivot,
            fov: camera.fov,
        }
    }

    fn supports_zoom(&self) -> bool {
        true
    }
}

use super::{CameraComponent, CameraMode, CameraPose, CameraStrategy};
use crate::config::CameraSettings;
use crate::integration::{actions, InputSource, MouseButton};
use crate::math::{look_rotation, spherical_offset, wrap_degrees, yaw_forward, yaw_right, Vec3};

/// Fixed isometric pitch in degrees
pub const ISO_PITCH: f32 = 45.0;
/// Pivot lift above the target
pub const ISO_PIVOT_HEIGHT: f32 = 1.2;

/// Isometric view with free yaw
///
/// Without a bound character, movement actions pan the pivot so the camera can
/// roam the scene on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsometricStrategy;

impl CameraStrategy for IsometricStrategy {
    fn mode(&self) -> CameraMode {
        CameraMode::Isometric
    }

    fn enter(&self, camera: &mut CameraComponent) {
        camera.pitch = ISO_PITCH;
    }

    fn handle_input(
        &self,
        camera: &mut CameraComponent,
        input: &dyn InputSource,
        settings: &CameraSettings,
        dt: f32,
    ) {
        camera.pitch = ISO_PITCH;

        if input.is_button_pressed(MouseButton::Secondary) {
            let delta = input.mouse_delta();
            camera.yaw = wrap_degrees(camera.yaw - delta.x * settings.rotate_sensitivity);
        }

        if camera.character_id.is_some() {
            return;
        }

        let axis = |positive: &str, negative: &str| -> f32 {
            let mut v = 0.0;
            if input.is_action_pressed(positive) {
                v += 1.0;
            }
            if input.is_action_pressed(negative) {
                v -= 1.0;
            }
            v
        };
        let forward = axis(actions::MOVE_FORWARD, actions::MOVE_BACKWARD);
        let right = axis(actions::MOVE_RIGHT, actions::MOVE_LEFT);
        if forward == 0.0 && right == 0.0 {
            return;
        }

        let direction =
            (yaw_forward(camera.yaw) * forward + yaw_right(camera.yaw) * right).normalize();
        camera.pivot_offset += direction * (settings.free_roam_speed * dt);
    }

    fn update_target(
        &self,
        camera: &CameraComponent,
        target: Option<Vec3>,
        _dt: f32,
    ) -> CameraPose {
        let pivot = target.unwrap_or(Vec3::ZERO)
            + Vec3::new(0.0, ISO_PIVOT_HEIGHT, 0.0)
            + camera.pivot_offset;
        let position = pivot + spherical_offset(ISO_PITCH, camera.yaw, camera.distance);
        // Unlocked, the view aims at the pivot the camera is still easing
        // toward, so it leans into target motion until smoothing settles
        let rotation = if camera.iso_lock_axis {
            Vec3::new(-ISO_PITCH, camera.yaw, 0.0)
        } else {
            let aim = camera.current.map(|current| current.pivot).unwrap_or(pivot);
            look_rotation(position, aim)
        };
        CameraPose {
            position,
            rotation,
            pivot,
            fov: camera.fov,
        }
    }

    fn supports_zoom(&self) -> bool {
        true
    }
}

//! Orbit camera strategy
//!
//! Editor-style navigation around a pivot: secondary drag rotates, modifier
//! plus primary or middle drag pans the pivot. Zoom is handled by the camera
//! system.

use super::{CameraComponent, CameraMode, CameraPose, CameraStrategy};
use crate::config::CameraSettings;
use crate::integration::{InputSource, MouseButton, PAN_MODIFIER_KEY};
use crate::math::{spherical_offset, wrap_degrees, yaw_right, Vec3};

/// Spherical orbit around `target + pivot_offset`
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitStrategy;

/// Apply pointer motion to yaw and pitch
pub(crate) fn rotate_from_pointer(
    camera: &mut CameraComponent,
    input: &dyn InputSource,
    settings: &CameraSettings,
) {
    let delta = input.mouse_delta();
    if delta.is_zero() {
        return;
    }
    camera.yaw = wrap_degrees(camera.yaw - delta.x * settings.rotate_sensitivity);
    camera.pitch = settings.clamp_pitch(camera.pitch + delta.y * settings.rotate_sensitivity);
}

impl CameraStrategy for OrbitStrategy {
    fn mode(&self) -> CameraMode {
        CameraMode::Orbit
    }

    fn handle_input(
        &self,
        camera: &mut CameraComponent,
        input: &dyn InputSource,
        settings: &CameraSettings,
        _dt: f32,
    ) {
        let dragging = input.is_button_pressed(MouseButton::Primary)
            || input.is_button_pressed(MouseButton::Middle);

        if dragging && input.is_key_pressed(PAN_MODIFIER_KEY) {
            let delta = input.mouse_delta();
            let scale = settings.pan_speed * camera.distance;
            let right = yaw_right(camera.yaw);
            camera.pivot_offset += right * (-delta.x * scale) + Vec3::UP * (delta.y * scale);
        } else if input.is_button_pressed(MouseButton::Secondary) {
            rotate_from_pointer(camera, input, settings);
        }
    }

    fn update_target(
        &self,
        camera: &CameraComponent,
        target: Option<Vec3>,
        _dt: f32,
    ) -> CameraPose {
        let pivot = target.unwrap_or(Vec3::ZERO) + camera.pivot_offset;
        CameraPose {
            position: pivot + spherical_offset(camera.pitch, camera.yaw, camera.distance),
            rotation: Vec3::new(-camera.pitch, camera.yaw, 0.0),
            pivot,
            fov: camera.fov,
        }
    }

    fn supports_zoom(&self) -> bool {
        true
    }

    // Catch-up would snap visibly while the user zooms
    fn catch_up(&self) -> bool {
        false
    }
}

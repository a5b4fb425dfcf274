use super::{CameraComponent, CameraMode, CameraPose, CameraStrategy};
use crate::config::CameraSettings;
use crate::integration::InputSource;
use crate::math::Vec3;

/// 2.5D side view
///
/// The camera sits on the plane `z = distance` and tracks the target's X and
/// Y plus the pivot offset. Rotation is always zero and the camera itself
/// ignores input; only character movement changes the view.
#[derive(Clone, Copy, Debug, Default)]
pub struct SidescrollStrategy;

impl CameraStrategy for SidescrollStrategy {
    fn mode(&self) -> CameraMode {
        CameraMode::Sidescroll
    }

    fn handle_input(
        &self,
        _camera: &mut CameraComponent,
        _input: &dyn InputSource,
        _settings: &CameraSettings,
        _dt: f32,
    ) {
    }

    fn update_target(
        &self,
        camera: &CameraComponent,
        target: Option<Vec3>,
        _dt: f32,
    ) -> CameraPose {
        let target = target.unwrap_or(Vec3::ZERO);
        let x = target.x + camera.pivot_offset.x;
        let y = target.y + camera.pivot_offset.y;
        CameraPose {
            position: Vec3::new(x, y, camera.distance),
            rotation: Vec3::ZERO,
            pivot: Vec3::new(x, y, target.z),
            fov: camera.fov,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{InputState, MouseButton};

    #[test]
    fn test_fixed_depth_and_zero_rotation() {
        let mut camera = CameraComponent::new(CameraMode::Sidescroll).with_orbit(40.0, 70.0, 15.0);
        camera.pivot_offset = Vec3::new(0.0, 2.0, 0.0);
        let target = Some(Vec3::new(3.0, 1.0, -4.0));
        let pose = SidescrollStrategy.update_target(&camera, target, 0.016);
        assert_eq!(pose.position, Vec3::new(3.0, 3.0, 15.0));
        assert_eq!(pose.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_ignores_input() {
        let settings = CameraSettings::default();
        let mut camera = CameraComponent::new(CameraMode::Sidescroll);
        let mut input = InputState::new();
        input.set_button(MouseButton::Secondary, true);
        input.add_mouse_delta(30.0, 30.0);
        let before = camera.clone();
        SidescrollStrategy.handle_input(&mut camera, &input, &settings, 0.016);
        assert_eq!(camera.yaw, before.yaw);
        assert_eq!(camera.pitch, before.pitch);
    }
}

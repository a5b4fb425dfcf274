//! Pose interpolation
//!
//! `t = min(1, smooth_speed * dt)`, raised toward 1 when the squared position
//! error exceeds a threshold so a fast target cannot outrun the camera.
//! Position and pivot share the same factor; yaw takes the short way around.

use super::CameraPose;
use crate::math::{lerp, lerp_angle};

/// Base interpolation factor for one tick
pub fn smoothing_factor(smooth_speed: f32, dt: f32) -> f32 {
    (smooth_speed * dt).clamp(0.0, 1.0)
}

/// Boost `t` toward 1 in proportion to how far `error_sq` exceeds `threshold`
pub fn catch_up_factor(t: f32, error_sq: f32, threshold: f32, gain: f32) -> f32 {
    if error_sq <= threshold {
        return t;
    }
    let boost = ((error_sq - threshold) * gain).min(1.0);
    t + (1.0 - t) * boost
}

/// Interpolate every pose channel with factor `t`
pub fn smooth_pose(current: &CameraPose, desired: &CameraPose, t: f32) -> CameraPose {
    CameraPose {
        position: current.position.lerp(desired.position, t),
        rotation: crate::math::Vec3::new(
            lerp(current.rotation.x, desired.rotation.x, t),
            lerp_angle(current.rotation.y, desired.rotation.y, t),
            lerp(current.rotation.z, desired.rotation.z, t),
        ),
        pivot: current.pivot.lerp(desired.pivot, t),
        fov: lerp(current.fov, desired.fov, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn pose(x: f32, yaw: f32) -> CameraPose {
        CameraPose {
            position: Vec3::new(x, 2.0, 3.0),
            rotation: Vec3::new(-20.0, yaw, 0.0),
            pivot: Vec3::new(x, 0.0, 0.0),
            fov: 60.0,
        }
    }

    #[test]
    fn test_no_drift_at_rest() {
        let p = pose(1.25, 173.3);
        let mut current = p;
        for _ in 0..100 {
            current = smooth_pose(&current, &p, 0.37);
        }
        assert_eq!(current, p);
    }

    #[test]
    fn test_yaw_short_path() {
        let out = smooth_pose(&pose(0.0, 170.0), &pose(0.0, -170.0), 0.5);
        assert!((out.rotation.y.abs() - 180.0).abs() < 1e-3, "{}", out.rotation.y);
    }

    #[test]
    fn test_catch_up() {
        assert_eq!(catch_up_factor(0.1, 0.2, 0.25, 0.5), 0.1);
        let boosted = catch_up_factor(0.1, 1.25, 0.25, 0.5);
        assert!((boosted - 0.55).abs() < 1e-6);
        assert!((catch_up_factor(0.1, 100.0, 0.25, 0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_factor_clamped() {
        assert_eq!(smoothing_factor(8.0, 1.0), 1.0);
        assert!((smoothing_factor(8.0, 0.01) - 0.08).abs() < 1e-6);
    }
}

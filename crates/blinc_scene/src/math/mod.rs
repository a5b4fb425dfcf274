//! Math utilities for scene transforms and camera geometry
//!
//! Angles stored on components are in degrees; conversion to radians happens
//! at the point of use.

mod matrix;
mod vector;

pub use matrix::Mat4;
pub use vector::{Vec2, Vec3};

/// Degrees to radians
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
/// Radians to degrees
pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// Scalar linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap an angle in degrees into `[-180, 180)`
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Interpolate between two angles (degrees) along the shortest arc.
///
/// The result is wrapped into `[-180, 180)`, so `lerp_angle(350, 10, 0.5)`
/// lands on `0` rather than `180`. Equal angles come back untouched.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = wrap_degrees(to - from);
    if delta == 0.0 {
        return from;
    }
    wrap_degrees(from + delta * t)
}

/// Offset on a sphere of `distance` around a pivot.
///
/// `pitch` is the elevation above the horizon and `yaw` the rotation about +Y,
/// both in degrees. Zero pitch and yaw places the point on +Z.
pub fn spherical_offset(pitch: f32, yaw: f32, distance: f32) -> Vec3 {
    let p = pitch * DEG_TO_RAD;
    let y = yaw * DEG_TO_RAD;
    Vec3::new(
        distance * p.cos() * y.sin(),
        distance * p.sin(),
        distance * p.cos() * y.cos(),
    )
}

/// Horizontal forward vector for a yaw angle in degrees (yaw 0 looks down -Z)
pub fn yaw_forward(yaw: f32) -> Vec3 {
    let y = yaw * DEG_TO_RAD;
    Vec3::new(-y.sin(), 0.0, -y.cos())
}

/// Horizontal right vector for a yaw angle in degrees
pub fn yaw_right(yaw: f32) -> Vec3 {
    let y = yaw * DEG_TO_RAD;
    Vec3::new(y.cos(), 0.0, -y.sin())
}

/// Euler rotation (pitch, yaw, 0) in degrees that looks from `from` toward `to`
pub fn look_rotation(from: Vec3, to: Vec3) -> Vec3 {
    let dir = to - from;
    let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();
    if horizontal == 0.0 && dir.y == 0.0 {
        return Vec3::ZERO;
    }
    let yaw = (-dir.x).atan2(-dir.z) * RAD_TO_DEG;
    let pitch = dir.y.atan2(horizontal) * RAD_TO_DEG;
    Vec3::new(pitch, yaw, 0.0)
}

//! Render collaborator contract

use crate::camera::CameraPose;

/// Handle to a renderer-side camera that accepts plain poses
pub trait RenderCamera: Send {
    /// Write position, rotation (degrees) and fov
    fn apply_pose(&mut self, pose: &CameraPose);
}

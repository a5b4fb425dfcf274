//! Local transform with a cached world matrix

use crate::ecs::{Component, ComponentType};
use crate::math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Position, Euler rotation (degrees) and scale relative to the parent
///
/// Setters mark the transform local-dirty. Only the hierarchy pass writes the
/// world matrix and clears the dirty flags.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformComponent {
    position: Vec3,
    /// Pitch, yaw, roll in degrees
    rotation: Vec3,
    scale: Vec3,
    #[serde(skip)]
    world_matrix: Mat4,
    #[serde(skip, default = "dirty")]
    local_dirty: bool,
    #[serde(skip, default = "dirty")]
    world_dirty: bool,
}

fn dirty() -> bool {
    true
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Component for TransformComponent {
    const TYPE: ComponentType = "Transform";
}

impl TransformComponent {
    /// Create at a local position
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            world_matrix: Mat4::from_translation(position),
            local_dirty: true,
            world_dirty: true,
        }
    }

    /// Set rotation in degrees
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.local_dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.local_dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.local_dirty = true;
    }

    /// Move by a local-space offset
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Local matrix (T * R * S)
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::compose(self.position, self.rotation, self.scale)
    }

    /// World matrix as of the last hierarchy pass
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// World-space position as of the last hierarchy pass
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.translation()
    }

    /// Local values changed since the last hierarchy pass
    pub fn is_local_dirty(&self) -> bool {
        self.local_dirty
    }

    /// Some ancestor (or this entity's parenting) changed since the last pass
    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty
    }

    pub(crate) fn mark_world_dirty(&mut self) {
        self.world_dirty = true;
    }

    /// Store the computed world matrix and clear both dirty flags
    pub(crate) fn commit_world_matrix(&mut self, matrix: Mat4) {
        self.world_matrix = matrix;
        self.local_dirty = false;
        self.world_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_mark_dirty() {
        let mut t = TransformComponent::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(t.is_local_dirty());
        t.commit_world_matrix(t.local_matrix());
        assert!(!t.is_local_dirty());
        assert!(!t.is_world_dirty());

        t.set_rotation(Vec3::new(0.0, 45.0, 0.0));
        assert!(t.is_local_dirty());
        assert_eq!(t.world_position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_serde_skips_cache() {
        let t = TransformComponent::new(Vec3::new(4.0, 0.0, 0.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0));
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("world_matrix").is_none());
        assert!(json.get("local_dirty").is_none());

        let back: TransformComponent = serde_json::from_value(json).unwrap();
        assert_eq!(back.position(), t.position());
        assert_eq!(back.scale(), t.scale());
        assert!(back.is_local_dirty());
    }
}

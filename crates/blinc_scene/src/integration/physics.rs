//! Physics collaborator contract
//!
//! The scene never simulates. Character control only reads a body's current
//! velocity and writes a new one, leaving the vertical component to whatever
//! engine sits behind the bridge.

use crate::ecs::EntityId;
use crate::math::Vec3;

/// Snapshot of a rigid body as seen by the scene
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBodyState {
    /// Linear velocity in world units per second
    pub velocity: Vec3,
}

/// Narrow read/write access to a physics engine
pub trait PhysicsBridge: Send {
    /// Rigid body attached to an entity, if any
    fn get_rigid_body(&self, entity: EntityId) -> Option<RigidBodyState>;

    /// Overwrite an entity's linear velocity
    fn set_entity_velocity(&mut self, entity: EntityId, velocity: [f32; 3]);
}

//! Built-in scene components

mod character;
mod transform;

pub use character::CharacterComponent;
pub use transform::TransformComponent;

use crate::camera::CameraComponent;
use crate::ecs::ComponentRegistry;

/// Registry preloaded with every component kind this crate defines
pub fn builtin_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.register::<TransformComponent>();
    registry.register::<CharacterComponent>();
    registry.register::<CameraComponent>();
    registry
}

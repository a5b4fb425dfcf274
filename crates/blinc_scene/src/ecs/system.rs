//! System trait and execution context

use super::component::ComponentType;
use super::entity::EntityId;
use super::manager::EntityManager;
use crate::integration::SceneServices;
use std::any::Any;

/// Context provided to systems each tick
pub struct SystemContext<'a> {
    /// Entities and components
    pub entities: &'a mut EntityManager,
    /// Injected collaborators (input, physics, scene context)
    pub services: &'a mut SceneServices,
    /// Time since last tick in seconds
    pub delta_time: f32,
    /// Total elapsed time in seconds
    pub elapsed_time: f32,
    /// Current frame number
    pub frame: u64,
}

impl<'a> SystemContext<'a> {
    /// Create a new system context
    pub fn new(
        entities: &'a mut EntityManager,
        services: &'a mut SceneServices,
        delta_time: f32,
        elapsed_time: f32,
        frame: u64,
    ) -> Self {
        Self {
            entities,
            services,
            delta_time,
            elapsed_time,
            frame,
        }
    }
}

/// Per-tick update logic over entities matching a required component set
///
/// # Example
///
/// ```rust,ignore
/// use blinc_scene::ecs::{EntityId, System, SystemContext};
///
/// struct SpinSystem;
///
/// impl System for SpinSystem {
///     fn name(&self) -> &'static str {
///         "SpinSystem"
///     }
///
///     fn required_components(&self) -> &[ComponentType] {
///         &[TransformComponent::TYPE]
///     }
///
///     fn update(&mut self, ctx: &mut SystemContext, entities: &[EntityId]) {
///         for id in entities {
///             if let Some(t) = ctx.entities.get_component_mut::<TransformComponent>(*id) {
///                 let mut r = t.rotation();
///                 r.y += 90.0 * ctx.delta_time;
///                 t.set_rotation(r);
///             }
///         }
///     }
///
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
/// ```
pub trait System: Send + 'static {
    /// Unique system name
    fn name(&self) -> &'static str;

    /// Component types an entity must hold to be in this system's batch.
    ///
    /// An empty set matches every entity.
    fn required_components(&self) -> &[ComponentType] {
        &[]
    }

    /// Execution priority (lower runs first)
    fn priority(&self) -> i32 {
        0
    }

    /// Run the system over its batch of active, matching entities
    fn update(&mut self, ctx: &mut SystemContext, entities: &[EntityId]);

    /// The entity started matching `required_components`
    fn on_entity_added(&mut self, _entity: EntityId, _entities: &EntityManager) {}

    /// The entity stopped matching `required_components` (or was destroyed)
    fn on_entity_removed(&mut self, _entity: EntityId) {}

    /// Get as Any for typed lookup
    fn as_any(&self) -> &dyn Any;

    /// Get as mutable Any for typed lookup
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A boxed system for type erasure
pub type BoxedSystem = Box<dyn System>;

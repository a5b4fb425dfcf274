//! Transform hierarchy system

use crate::ecs::{Component, ComponentType, EntityId, EntityManager, System, SystemContext};
use crate::math::Mat4;
use crate::scene::TransformComponent;
use rustc_hash::FxHashMap;
use std::any::Any;

/// Priority of the hierarchy pass; runs before every other system
pub const HIERARCHY_PRIORITY: i32 = -1000;

/// System for propagating transforms through parents and sockets
///
/// Entities are processed in ascending depth. For an entity occupying a
/// socket, the effective parent matrix is `parent_world * socket_local`.
/// Matrices are rebuilt from local transforms up the whole chain, so inactive
/// ancestors still contribute their current values.
#[derive(Debug, Default)]
pub struct HierarchySystem;

impl HierarchySystem {
    /// Create a new hierarchy system
    pub fn new() -> Self {
        Self
    }

    /// Recompute world matrices for a batch of entities holding transforms
    pub fn propagate(&self, entities: &mut EntityManager, batch: &[EntityId]) {
        let mut ordered: Vec<(usize, EntityId)> = batch
            .iter()
            .filter_map(|id| entities.depth_of(*id).map(|depth| (depth, *id)))
            .collect();
        ordered.sort_unstable();

        let mut worlds = FxHashMap::default();
        for (_, id) in ordered {
            let Some(local_dirty) = entities
                .get_component::<TransformComponent>(id)
                .map(TransformComponent::is_local_dirty)
            else {
                continue;
            };
            let world = world_matrix(entities, id, &mut worlds);

            if local_dirty {
                for descendant in entities.descendants_of(id) {
                    if let Some(t) = entities.get_component_mut::<TransformComponent>(descendant) {
                        t.mark_world_dirty();
                    }
                }
            }

            if let Some(t) = entities.get_component_mut::<TransformComponent>(id) {
                t.commit_world_matrix(world);
            }
        }
    }
}

/// Matrix taking an entity's local space to world space.
///
/// This is the parent's world matrix, times the socket's local matrix when
/// the entity occupies one. Ancestors without a transform pass their own
/// parent space through unchanged, so grouping entities keep the transforms
/// above them. Roots and unknown ids get the identity.
pub fn parent_matrix(entities: &EntityManager, id: EntityId) -> Mat4 {
    parent_space(entities, id, &mut FxHashMap::default())
}

fn parent_space(
    entities: &EntityManager,
    id: EntityId,
    worlds: &mut FxHashMap<EntityId, Mat4>,
) -> Mat4 {
    let Some(parent_id) = entities.parent_of(id) else {
        return Mat4::IDENTITY;
    };
    let parent_world = world_matrix(entities, parent_id, worlds);
    let socket = entities
        .get_entity(id)
        .and_then(|e| e.socket_name())
        .and_then(|name| entities.get_entity(parent_id)?.socket(name));
    match socket {
        Some(socket) => parent_world.mul(&socket.local_matrix()),
        None => parent_world,
    }
}

/// World matrix from local transforms up the chain, memoized per pass
fn world_matrix(
    entities: &EntityManager,
    id: EntityId,
    worlds: &mut FxHashMap<EntityId, Mat4>,
) -> Mat4 {
    if let Some(world) = worlds.get(&id) {
        return *world;
    }
    let local = entities
        .get_component::<TransformComponent>(id)
        .map(TransformComponent::local_matrix)
        .unwrap_or(Mat4::IDENTITY);
    let world = parent_space(entities, id, worlds).mul(&local);
    worlds.insert(id, world);
    world
}

impl System for HierarchySystem {
    fn name(&self) -> &'static str {
        "HierarchySystem"
    }

    fn required_components(&self) -> &[ComponentType] {
        &[TransformComponent::TYPE]
    }

    fn priority(&self) -> i32 {
        HIERARCHY_PRIORITY
    }

    fn update(&mut self, ctx: &mut SystemContext, entities: &[EntityId]) {
        self.propagate(ctx.entities, entities);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

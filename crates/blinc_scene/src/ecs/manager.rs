//! Entity lifecycle, component index and hierarchy bookkeeping
//!
//! [`EntityManager`] is the only path for structural changes: creating and
//! destroying entities, attaching and detaching components, and reparenting.
//! Routing everything through it keeps three invariants together:
//!
//! - the component-type index always matches the entity table
//! - every entity lives in exactly one place, either a parent's children list
//!   or the root list
//! - presence transitions are recorded as [`LifecycleEvent`]s once a
//!   [`SystemManager`](super::SystemManager) is attached
//!
//! Operations on unknown ids return `false` / `None`. Editor UIs routinely
//! race deletions against other edits, so a missing entity is not an error.

use super::component::{
    AnyComponent, Component, ComponentRegistry, ComponentSlot, ComponentType, EntityIdMap,
};
use super::entity::{Entity, EntityId, Socket};
use super::snapshot::{SceneSnapshot, SerializedEntity};
use crate::math::Vec3;
use crate::scene::TransformComponent;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// A component presence transition on an entity
#[derive(Clone, Debug, PartialEq)]
pub struct LifecycleEvent {
    /// Entity whose component set changed
    pub entity: EntityId,
    /// Component type that was added or removed
    pub component_type: ComponentType,
    /// `true` for add, `false` for remove
    pub added: bool,
    /// Component types present before the change
    pub before: SmallVec<[ComponentType; 8]>,
}

impl LifecycleEvent {
    /// Check whether the entity held every required type before the change
    pub fn matched_before(&self, required: &[ComponentType]) -> bool {
        required.iter().all(|t| self.before.contains(t))
    }

    /// Check whether the entity holds every required type after the change
    pub fn matches_after(&self, required: &[ComponentType]) -> bool {
        required.iter().all(|t| {
            if *t == self.component_type {
                self.added
            } else {
                self.before.contains(t)
            }
        })
    }
}

/// Owns every entity in a scene
pub struct EntityManager {
    entities: FxHashMap<EntityId, Entity>,
    index: FxHashMap<ComponentType, FxHashSet<EntityId>>,
    roots: Vec<EntityId>,
    next_id: u64,
    registry: ComponentRegistry,
    /// `None` until a system manager attaches
    events: Option<Vec<LifecycleEvent>>,
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityManager {
    /// Create an empty manager with the built-in component kinds registered
    pub fn new() -> Self {
        Self::with_registry(crate::scene::builtin_registry())
    }

    /// Create an empty manager with a custom component registry
    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            entities: FxHashMap::default(),
            index: FxHashMap::default(),
            roots: Vec::new(),
            next_id: 1,
            registry,
            events: None,
        }
    }

    /// Component registry used by deserialization
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Mutable component registry
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    // === Lifecycle events ===

    /// Start recording lifecycle events
    pub(crate) fn enable_events(&mut self) {
        if self.events.is_none() {
            self.events = Some(Vec::new());
        }
    }

    /// Whether a listener is attached
    pub fn events_enabled(&self) -> bool {
        self.events.is_some()
    }

    /// Take all pending lifecycle events
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn record(&mut self, entity: EntityId, component_type: ComponentType, added: bool) {
        if self.events.is_none() {
            return;
        }
        let Some(before) = self.entities.get(&entity).map(|e| e.component_type_snapshot()) else {
            return;
        };
        if let Some(events) = self.events.as_mut() {
            events.push(LifecycleEvent {
                entity,
                component_type,
                added,
                before,
            });
        }
    }

    // === Entity lifecycle ===

    /// Create an entity as a new root.
    ///
    /// A requested id that is already taken is replaced by a fresh one.
    pub fn create_entity(&mut self, name: impl Into<String>, id: Option<EntityId>) -> EntityId {
        let id = match id {
            Some(requested) if !self.entities.contains_key(&requested) => {
                self.next_id = self.next_id.max(requested.0 + 1);
                requested
            }
            Some(requested) => {
                let fresh = self.allocate_id();
                tracing::warn!(%requested, %fresh, "entity id already in use, allocated a new one");
                fresh
            }
            None => self.allocate_id(),
        };

        let entity = Entity::new(id, name);
        tracing::debug!(%id, name = %entity.name, "entity created");
        self.entities.insert(id, entity);
        self.roots.push(id);
        id
    }

    fn allocate_id(&mut self) -> EntityId {
        while self.entities.contains_key(&EntityId(self.next_id)) {
            self.next_id += 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Destroy an entity and all of its descendants.
    ///
    /// Returns `false` if the entity does not exist.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get(&id) else {
            return false;
        };
        let children: SmallVec<[EntityId; 4]> = entity.children.clone();
        let mut types: SmallVec<[ComponentType; 8]> = entity.component_type_snapshot();
        types.sort_unstable();

        // Notify removal one component at a time so each crossing fires once
        for component_type in types {
            self.record(id, component_type, false);
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.components.remove(component_type);
            }
            self.unindex(id, component_type);
        }

        for child in children {
            self.destroy_entity(child);
        }

        self.detach(id);
        self.entities.remove(&id);
        tracing::debug!(%id, "entity destroyed");
        true
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        let roots = self.roots.clone();
        for root in roots {
            self.destroy_entity(root);
        }
    }

    /// Check if an entity exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Get an entity
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get an entity mutably (name, active flag, component fields)
    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate all entity ids (unordered)
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Root entities in creation order
    pub fn root_entities(&self) -> &[EntityId] {
        &self.roots
    }

    /// Find the first entity with a given name, lowest id first
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .values()
            .filter(|e| e.name == name)
            .map(|e| e.id())
            .min()
    }

    // === Components ===

    /// Attach a component.
    ///
    /// Returns `false` for unknown entities and for a type the entity already
    /// has; an existing component is never overwritten.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> bool {
        self.add_boxed_component(id, Box::new(component))
    }

    /// Attach a type-erased component
    pub fn add_boxed_component(&mut self, id: EntityId, component: Box<dyn AnyComponent>) -> bool {
        let component_type = component.component_type();
        match self.entities.get(&id) {
            None => return false,
            Some(entity) if entity.has(component_type) => {
                tracing::warn!(
                    %id,
                    component = component_type,
                    "entity already has this component type"
                );
                return false;
            }
            Some(_) => {}
        }

        self.record(id, component_type, true);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity
                .components
                .insert(component_type, ComponentSlot::from_boxed(component));
        }
        self.index.entry(component_type).or_default().insert(id);
        true
    }

    /// Detach a component by type
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> bool {
        self.remove_component_by_type(id, T::TYPE)
    }

    /// Detach a component by type tag
    pub fn remove_component_by_type(&mut self, id: EntityId, component_type: &str) -> bool {
        let Some(entity) = self.entities.get(&id) else {
            return false;
        };
        let Some(component_type) = entity.component_types().find(|t| *t == component_type) else {
            return false;
        };

        self.record(id, component_type, false);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.components.remove(component_type);
        }
        self.unindex(id, component_type);
        true
    }

    fn unindex(&mut self, id: EntityId, component_type: ComponentType) {
        if let Some(set) = self.index.get_mut(component_type) {
            set.remove(&id);
            if set.is_empty() {
                self.index.remove(component_type);
            }
        }
    }

    /// Get a component
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(&id)?.get::<T>()
    }

    /// Get a component mutably
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(&id)?.get_mut::<T>()
    }

    /// Check if an entity has a component type
    pub fn has_component(&self, id: EntityId, component_type: &str) -> bool {
        self.entities
            .get(&id)
            .map(|e| e.has(component_type))
            .unwrap_or(false)
    }

    /// Toggle a component's enabled flag without changing presence
    pub fn set_component_enabled(
        &mut self,
        id: EntityId,
        component_type: &str,
        enabled: bool,
    ) -> bool {
        match self
            .entities
            .get_mut(&id)
            .and_then(|e| e.components.get_mut(component_type))
        {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Number of entities holding a component type
    pub fn count_with(&self, component_type: &str) -> usize {
        self.index.get(component_type).map(|s| s.len()).unwrap_or(0)
    }

    /// Entities holding every listed component type, sorted by id.
    ///
    /// Intersects from the smallest indexed set. An empty type list matches
    /// every entity.
    pub fn get_entities_with_components(&self, types: &[ComponentType]) -> Vec<EntityId> {
        if types.is_empty() {
            let mut all: Vec<EntityId> = self.entities.keys().copied().collect();
            all.sort_unstable();
            return all;
        }

        let mut sets = Vec::with_capacity(types.len());
        for t in types {
            match self.index.get(t) {
                Some(set) if !set.is_empty() => sets.push(set),
                _ => return Vec::new(),
            }
        }
        sets.sort_by_key(|s| s.len());

        let (smallest, rest) = sets.split_at(1);
        let mut result: Vec<EntityId> = smallest[0]
            .iter()
            .filter(|id| rest.iter().all(|s| s.contains(*id)))
            .copied()
            .collect();
        result.sort_unstable();
        result
    }

    // === Hierarchy ===

    /// Parent of an entity
    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(&id)?.parent
    }

    /// Children of an entity
    pub fn children_of(&self, id: EntityId) -> Option<&[EntityId]> {
        self.entities.get(&id).map(|e| e.children())
    }

    /// Depth below the root list (roots are 0)
    pub fn depth_of(&self, id: EntityId) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.entities.get(&id)?.parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.entities.get(&parent).and_then(|e| e.parent);
        }
        Some(depth)
    }

    /// Check whether `ancestor` is `id` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.entities.get(&node).and_then(|e| e.parent);
        }
        false
    }

    /// All descendants, depth-first in child order
    pub fn descendants_of(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = match self.entities.get(&id) {
            Some(e) => e.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(e) = self.entities.get(&next) {
                stack.extend(e.children.iter().rev().copied());
            }
        }
        out
    }

    /// Reparent an entity, optionally into a named socket on the parent.
    ///
    /// `parent = None` moves the entity to the root list. Refused (with a
    /// warning, state untouched) when the new parent descends from the child,
    /// or when the socket is missing, occupied, or rejects the child's types.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
        socket: Option<&str>,
    ) -> bool {
        let Some(child_entity) = self.entities.get(&child) else {
            return false;
        };

        if let Some(parent) = parent {
            let Some(parent_entity) = self.entities.get(&parent) else {
                return false;
            };
            if self.is_ancestor(child, parent) {
                tracing::warn!(%child, %parent, "set_parent would create a cycle");
                return false;
            }
            if let Some(socket_name) = socket {
                let Some(slot) = parent_entity.socket(socket_name) else {
                    tracing::warn!(%parent, socket = socket_name, "socket not found");
                    return false;
                };
                if slot.occupant.is_some_and(|o| o != child) {
                    tracing::warn!(%parent, socket = socket_name, "socket already occupied");
                    return false;
                }
                if !slot.accepts(child_entity.component_types()) {
                    tracing::warn!(
                        %child,
                        socket = socket_name,
                        "entity type not allowed in socket"
                    );
                    return false;
                }
            }
        } else if socket.is_some() {
            tracing::warn!(%child, "socket given without a parent");
            return false;
        }

        self.detach(child);

        match parent {
            Some(parent) => {
                if let Some(parent_entity) = self.entities.get_mut(&parent) {
                    parent_entity.children.push(child);
                    if let Some(name) = socket {
                        if let Some(slot) = parent_entity.sockets.get_mut(name) {
                            slot.occupant = Some(child);
                        }
                    }
                }
                if let Some(child_entity) = self.entities.get_mut(&child) {
                    child_entity.parent = Some(parent);
                    child_entity.socket_name = socket.map(str::to_string);
                }
            }
            None => self.roots.push(child),
        }

        if let Some(transform) = self.get_component_mut::<TransformComponent>(child) {
            transform.mark_world_dirty();
        }
        true
    }

    /// Remove an entity from its parent's children (or the root list) and
    /// release any socket it occupies. Leaves it in neither place.
    fn detach(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let old_parent = entity.parent.take();
        let old_socket = entity.socket_name.take();

        match old_parent {
            Some(parent) => {
                if let Some(parent_entity) = self.entities.get_mut(&parent) {
                    parent_entity.children.retain(|c| *c != id);
                    if let Some(slot) = old_socket
                        .as_deref()
                        .and_then(|s| parent_entity.sockets.get_mut(s))
                    {
                        if slot.occupant == Some(id) {
                            slot.occupant = None;
                        }
                    }
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    // === Sockets ===

    /// Add a socket to an entity. Duplicate names are refused.
    pub fn add_socket(&mut self, id: EntityId, mut socket: Socket) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        if entity.sockets.contains_key(&socket.name) {
            tracing::warn!(%id, socket = %socket.name, "duplicate socket name");
            return false;
        }
        socket.occupant = None;
        entity.sockets.insert(socket.name.clone(), socket);
        true
    }

    /// Remove a socket. Its occupant stays a child but leaves the socket.
    pub fn remove_socket(&mut self, id: EntityId, name: &str) -> bool {
        let Some(socket) = self.entities.get_mut(&id).and_then(|e| e.sockets.remove(name)) else {
            return false;
        };
        if let Some(occupant) = socket.occupant {
            if let Some(child) = self.entities.get_mut(&occupant) {
                child.socket_name = None;
            }
            if let Some(transform) = self.get_component_mut::<TransformComponent>(occupant) {
                transform.mark_world_dirty();
            }
        }
        true
    }

    /// World-space position from the entity's transform
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.get_component::<TransformComponent>(id)
            .map(TransformComponent::world_position)
    }

    // === Serialization ===

    /// Serialize every entity, parents before children
    pub fn serialize_all(&self) -> serde_json::Result<SceneSnapshot> {
        let mut snapshot = SceneSnapshot {
            version: 1,
            entities: Vec::with_capacity(self.entities.len()),
        };
        for root in &self.roots {
            self.serialize_subtree(*root, &mut snapshot.entities)?;
        }
        Ok(snapshot)
    }

    fn serialize_subtree(
        &self,
        id: EntityId,
        out: &mut Vec<SerializedEntity>,
    ) -> serde_json::Result<()> {
        let Some(entity) = self.entities.get(&id) else {
            return Ok(());
        };

        let mut components = entity
            .components
            .values()
            .map(ComponentSlot::serialize)
            .collect::<serde_json::Result<Vec<_>>>()?;
        components.sort_by(|a, b| a.component_type.cmp(&b.component_type));

        let mut sockets: Vec<Socket> = entity.sockets.values().cloned().collect();
        sockets.sort_by(|a, b| a.name.cmp(&b.name));
        for socket in &mut sockets {
            socket.occupant = None;
        }

        out.push(SerializedEntity {
            id,
            name: entity.name.clone(),
            active: entity.active,
            components,
            sockets,
            parent_id: entity.parent,
            socket_name: entity.socket_name.clone(),
        });

        for child in &entity.children {
            self.serialize_subtree(*child, out)?;
        }
        Ok(())
    }

    /// Rebuild entities from a snapshot, adding them to this manager.
    ///
    /// Runs in three passes: construct entities and components, re-link
    /// parents and sockets, then replay add notifications so attached systems
    /// rebuild their per-entity state. Unknown component types are skipped
    /// and entities whose parent cannot be resolved stay roots. When a
    /// snapshot id is already taken the entity gets a fresh id, and entity
    /// references inside components are rewritten to match. Returns the
    /// number of entities created.
    pub fn deserialize_all(&mut self, snapshot: &SceneSnapshot) -> usize {
        let mut id_map = EntityIdMap::default();
        let suspended = self.events.take();

        // Pass 1: entities, components, sockets
        for serialized in &snapshot.entities {
            let id = self.create_entity(serialized.name.clone(), Some(serialized.id));
            id_map.insert(serialized.id, id);

            if let Some(entity) = self.entities.get_mut(&id) {
                entity.active = serialized.active;
            }

            for component in &serialized.components {
                match self.registry.create(&component.component_type, &component.data) {
                    None => {
                        tracing::warn!(
                            %id,
                            component = %component.component_type,
                            "unknown component type skipped"
                        );
                    }
                    Some(Err(err)) => {
                        tracing::warn!(
                            %id,
                            component = %component.component_type,
                            %err,
                            "component data rejected"
                        );
                    }
                    Some(Ok(boxed)) => {
                        if self.add_boxed_component(id, boxed) {
                            let tag = component.component_type.as_str();
                            self.set_component_enabled(id, tag, component.enabled);
                        }
                    }
                }
            }

            for socket in &serialized.sockets {
                self.add_socket(id, socket.clone());
            }
        }

        // Ids inside components still name snapshot entities
        if id_map.iter().any(|(from, to)| from != to) {
            for id in id_map.values() {
                if let Some(entity) = self.entities.get_mut(id) {
                    for slot in entity.components.values_mut() {
                        slot.remap_entity_ids(&id_map);
                    }
                }
            }
        }

        // Pass 2: hierarchy
        for serialized in &snapshot.entities {
            let (Some(&id), Some(parent_id)) = (id_map.get(&serialized.id), serialized.parent_id)
            else {
                continue;
            };
            let Some(&parent) = id_map.get(&parent_id) else {
                tracing::debug!(%id, %parent_id, "parent not found, entity stays a root");
                continue;
            };
            let socket = serialized.socket_name.as_deref();
            if !self.set_parent(id, Some(parent), socket) && socket.is_some() {
                self.set_parent(id, Some(parent), None);
            }
        }

        // Pass 3: replay notifications
        self.events = suspended;
        if self.events.is_some() {
            for serialized in &snapshot.entities {
                let Some(&id) = id_map.get(&serialized.id) else {
                    continue;
                };
                let Some(entity) = self.entities.get(&id) else {
                    continue;
                };
                let mut types: SmallVec<[ComponentType; 8]> = entity.component_type_snapshot();
                types.sort_unstable();
                let mut before: SmallVec<[ComponentType; 8]> = SmallVec::new();
                for component_type in types {
                    if let Some(events) = self.events.as_mut() {
                        events.push(LifecycleEvent {
                            entity: id,
                            component_type,
                            added: true,
                            before: before.clone(),
                        });
                    }
                    before.push(component_type);
                }
            }
        }

        id_map.len()
    }
}

//! Entities and sockets

use super::component::{Component, ComponentSlot, ComponentType};
use crate::math::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Stable identifier for an entity.
///
/// Ids survive serialization, so references between entities (parents,
/// camera targets) are stored as ids and re-resolved on use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named attachment point on a parent entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Socket name, unique per entity
    pub name: String,
    /// Local position relative to the owning entity
    pub position: Vec3,
    /// Local rotation in degrees (pitch, yaw, roll)
    pub rotation: Vec3,
    /// Local scale
    pub scale: Vec3,
    /// Component types an occupant may carry; empty allows anything
    #[serde(default)]
    pub allowed_types: Vec<String>,
    /// Current occupant
    #[serde(skip)]
    pub occupant: Option<EntityId>,
}

impl Socket {
    /// Create a socket at a local offset
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            allowed_types: Vec::new(),
            occupant: None,
        }
    }

    /// Set local rotation (degrees)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Restrict occupants to entities carrying one of these component types
    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Local transform matrix of the socket
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::compose(self.position, self.rotation, self.scale)
    }

    /// Check whether an entity with these component types may occupy the socket
    pub fn accepts<'a>(&self, mut types: impl Iterator<Item = &'a str>) -> bool {
        self.allowed_types.is_empty()
            || types.any(|t| self.allowed_types.iter().any(|allowed| allowed == t))
    }
}

/// A scene object: id, name, components, hierarchy links and sockets.
///
/// Hierarchy links are ids into the owning [`EntityManager`](super::EntityManager);
/// only the manager may change them.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    /// Display name
    pub name: String,
    /// Inactive entities are skipped by system batches
    pub active: bool,
    pub(crate) components: FxHashMap<ComponentType, ComponentSlot>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) socket_name: Option<String>,
    pub(crate) children: SmallVec<[EntityId; 4]>,
    pub(crate) sockets: FxHashMap<String, Socket>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            components: FxHashMap::default(),
            parent: None,
            socket_name: None,
            children: SmallVec::new(),
            sockets: FxHashMap::default(),
        }
    }

    /// Entity id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Parent entity, if any
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Socket this entity occupies on its parent
    pub fn socket_name(&self) -> Option<&str> {
        self.socket_name.as_deref()
    }

    /// Children in attachment order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Get a socket by name
    pub fn socket(&self, name: &str) -> Option<&Socket> {
        self.sockets.get(name)
    }

    /// Iterate sockets
    pub fn sockets(&self) -> impl Iterator<Item = &Socket> {
        self.sockets.values()
    }

    /// Check if a component type is attached
    pub fn has(&self, component_type: &str) -> bool {
        self.components.contains_key(component_type)
    }

    /// Typed component access
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components.get(T::TYPE)?.get::<T>()
    }

    /// Typed mutable component access.
    ///
    /// Mutating fields does not count as an add/remove transition.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.get_mut(T::TYPE)?.get_mut::<T>()
    }

    /// Whether a component is attached and enabled
    pub fn is_enabled(&self, component_type: &str) -> bool {
        self.components
            .get(component_type)
            .map(|slot| slot.enabled)
            .unwrap_or(false)
    }

    /// Attached component type tags
    pub fn component_types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.keys().copied()
    }

    pub(crate) fn component_type_snapshot(&self) -> SmallVec<[ComponentType; 8]> {
        self.components.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_accepts() {
        let open = Socket::new("hand", Vec3::ZERO);
        assert!(open.accepts(["Transform"].into_iter()));
        assert!(open.accepts(std::iter::empty()));

        let restricted = Socket::new("hand", Vec3::ZERO).with_allowed_types(["Weapon"]);
        assert!(!restricted.accepts(["Transform"].into_iter()));
        assert!(restricted.accepts(["Transform", "Weapon"].into_iter()));
    }

    #[test]
    fn test_socket_matrix_translation() {
        let socket = Socket::new("mount", Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(socket.local_matrix().translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId(42).to_string(), "42");
    }
}

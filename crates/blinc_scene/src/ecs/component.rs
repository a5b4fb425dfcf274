//! Component traits, type-erased storage slots and the deserializer registry
//!
//! A component is a serializable data unit owned by exactly one entity. Each
//! concrete kind carries a unique [`ComponentType`] tag; an entity holds at
//! most one component per tag.
//!
//! # Example
//!
//! ```rust,ignore
//! use blinc_scene::ecs::Component;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! struct Health {
//!     current: f32,
//!     max: f32,
//! }
//!
//! impl Component for Health {
//!     const TYPE: ComponentType = "Health";
//! }
//! ```

use super::entity::EntityId;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

/// Type tag identifying a concrete component kind
pub type ComponentType = &'static str;

/// Snapshot id to live id, built while loading a snapshot
pub type EntityIdMap = FxHashMap<EntityId, EntityId>;

/// Trait for all concrete components
///
/// Serialization goes through serde, so every behaviorally relevant field
/// must be serializable; derived state should be `#[serde(skip)]`.
pub trait Component: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Unique tag for this component kind
    const TYPE: ComponentType;

    /// Rewrite entity ids stored in fields after a snapshot load.
    ///
    /// Components that reference other entities by id must override this,
    /// since loading may hand out fresh ids when snapshot ids are taken.
    /// Ids missing from `map` point outside the snapshot and stay as they are.
    fn remap_entities(&mut self, _map: &EntityIdMap) {}
}

/// Object-safe view of a component, used for type-erased storage
pub trait AnyComponent: Any + Send + Sync {
    /// The component's type tag
    fn component_type(&self) -> ComponentType;

    /// Serialize to plain data
    fn serialize_value(&self) -> serde_json::Result<Value>;

    /// Overwrite this component from plain data
    fn deserialize_value(&mut self, data: &Value) -> serde_json::Result<()>;

    /// Rewrite stored entity ids
    fn remap_entity_ids(&mut self, map: &EntityIdMap);

    /// Get as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get as mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyComponent for T {
    fn component_type(&self) -> ComponentType {
        T::TYPE
    }

    fn serialize_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn deserialize_value(&mut self, data: &Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(data.clone())?;
        Ok(())
    }

    fn remap_entity_ids(&mut self, map: &EntityIdMap) {
        self.remap_entities(map);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A component attached to an entity, with its enabled flag
pub struct ComponentSlot {
    /// Disabled components stay attached and indexed but are skipped by logic
    pub enabled: bool,
    value: Box<dyn AnyComponent>,
}

impl ComponentSlot {
    /// Wrap a typed component
    pub fn new<T: Component>(component: T) -> Self {
        Self {
            enabled: true,
            value: Box::new(component),
        }
    }

    /// Wrap an already type-erased component
    pub fn from_boxed(value: Box<dyn AnyComponent>) -> Self {
        Self {
            enabled: true,
            value,
        }
    }

    /// Type tag of the wrapped component
    pub fn component_type(&self) -> ComponentType {
        self.value.component_type()
    }

    /// Downcast to a concrete component
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref()
    }

    /// Downcast to a concrete component mutably
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.value.as_any_mut().downcast_mut()
    }

    pub(crate) fn remap_entity_ids(&mut self, map: &EntityIdMap) {
        self.value.remap_entity_ids(map);
    }

    /// Serialize together with type tag and enabled flag
    pub fn serialize(&self) -> serde_json::Result<SerializedComponent> {
        Ok(SerializedComponent {
            component_type: self.component_type().to_string(),
            enabled: self.enabled,
            data: self.value.serialize_value()?,
        })
    }
}

impl std::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("type", &self.component_type())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Plain-data form of a component
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedComponent {
    /// Component type tag
    #[serde(rename = "type")]
    pub component_type: String,
    /// Enabled flag
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Component fields
    pub data: Value,
}

fn default_enabled() -> bool {
    true
}

type ComponentFactory = fn() -> Box<dyn AnyComponent>;

fn make_default<T: Component>() -> Box<dyn AnyComponent> {
    Box::new(T::default())
}

/// Registry of component kinds known to the scene, keyed by type tag.
///
/// Deserialization looks tags up here to construct the right concrete type.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: FxHashMap<ComponentType, ComponentFactory>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component kind. Re-registering the same tag is ignored.
    pub fn register<T: Component>(&mut self) {
        if self.factories.contains_key(T::TYPE) {
            tracing::warn!(component = T::TYPE, "component type already registered");
            return;
        }
        self.factories.insert(T::TYPE, make_default::<T>);
    }

    /// Check if a tag is registered
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Resolve a runtime tag to its static form
    pub fn resolve(&self, tag: &str) -> Option<ComponentType> {
        self.factories.get_key_value(tag).map(|(k, _)| *k)
    }

    /// Construct a component from serialized data.
    ///
    /// Returns `None` for unknown tags.
    pub fn create(
        &self,
        tag: &str,
        data: &Value,
    ) -> Option<serde_json::Result<Box<dyn AnyComponent>>> {
        let factory = self.factories.get(tag)?;
        let mut component = factory();
        Some(component.deserialize_value(data).map(|_| component))
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

//! Entity Component System (ECS)
//!
//! ## Overview
//!
//! - **Entity**: a stable id with a name, components, hierarchy links and sockets
//! - **Component**: serializable, type-tagged data owned by one entity
//! - **EntityManager**: the single owner of entities, the component index and
//!   the hierarchy
//! - **System**: per-tick logic over entities matching a required component set
//! - **SystemManager**: priority-ordered execution and edge-triggered
//!   lifecycle notifications

mod component;
mod entity;
mod manager;
mod schedule;
mod snapshot;
mod system;

pub use component::{
    AnyComponent, Component, ComponentRegistry, ComponentSlot, ComponentType, EntityIdMap,
    SerializedComponent,
};
pub use entity::{Entity, EntityId, Socket};
pub use manager::{EntityManager, LifecycleEvent};
pub use schedule::{Clock, SystemManager};
pub use snapshot::{SceneSnapshot, SerializedEntity};
pub use system::{BoxedSystem, System, SystemContext};

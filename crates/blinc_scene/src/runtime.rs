//! Scene runtime
//!
//! [`Scene`] owns the entity manager, the system manager and the injected
//! services. Structural edits made through it notify systems immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use blinc_scene::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig::default(), SceneServices::default());
//! let player = scene.create_entity("Player");
//! scene.add_component(player, TransformComponent::new(Vec3::ZERO));
//! scene.add_component(player, CharacterComponent::default());
//!
//! let camera = scene.create_entity("Camera");
//! scene.add_component(camera, TransformComponent::default());
//! scene.add_component(camera, CameraComponent::default());
//!
//! scene.set_context(SceneContext::Experience);
//! scene.apply_camera_preset(camera, "third_person")?;
//! scene.tick(1.0 / 60.0);
//! ```

use crate::camera::{switch_mode, CameraComponent, CameraMode, CameraSystem};
use crate::config::SceneConfig;
use crate::ecs::{Component, EntityId, EntityManager, SceneSnapshot, System, SystemManager};
use crate::error::PresetError;
use crate::integration::{RenderCamera, SceneContext, SceneServices};
use crate::systems::HierarchySystem;
use crate::Result;

const CAMERA_SYSTEM: &str = "CameraSystem";

/// A running scene
pub struct Scene {
    entities: EntityManager,
    systems: SystemManager,
    services: SceneServices,
    config: SceneConfig,
}

impl Scene {
    /// Create a scene with the hierarchy and camera systems registered.
    ///
    /// The starting context always comes from `config`; a different context
    /// in `services` is replaced with a warning.
    pub fn new(config: SceneConfig, mut services: SceneServices) -> Self {
        let mut entities = EntityManager::new();
        let mut systems = SystemManager::new();
        systems.attach(&mut entities);
        systems.register(HierarchySystem::new());
        systems.register(CameraSystem::new(config.camera.clone()));
        if services.context != config.context {
            tracing::warn!(
                services = ?services.context,
                config = ?config.context,
                "scene context taken from config"
            );
            services.context = config.context;
        }

        tracing::debug!(context = ?config.context, "scene created");
        Self {
            entities,
            systems,
            services,
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    /// Direct access to the entity manager.
    ///
    /// Lifecycle events recorded here reach systems on the next [`flush`](Self::flush)
    /// or [`tick`](Self::tick).
    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn systems(&self) -> &SystemManager {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut SystemManager {
        &mut self.systems
    }

    pub fn services_mut(&mut self) -> &mut SceneServices {
        &mut self.services
    }

    pub fn context(&self) -> SceneContext {
        self.services.context
    }

    /// Switch between editing and experience
    pub fn set_context(&mut self, context: SceneContext) {
        self.services.context = context;
    }

    /// Register an additional system
    pub fn register_system<S: System>(&mut self, system: S) -> bool {
        let added = self.systems.register(system);
        self.flush();
        added
    }

    /// Deliver pending lifecycle events to systems
    pub fn flush(&mut self) {
        self.systems.flush(&mut self.entities);
    }

    /// Advance one tick
    pub fn tick(&mut self, delta_time: f32) {
        self.systems.update(&mut self.entities, &mut self.services, delta_time);
    }

    // === Structural edits ===

    /// Create a root entity
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        self.entities.create_entity(name, None)
    }

    /// Destroy an entity and its descendants
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let destroyed = self.entities.destroy_entity(id);
        self.flush();
        destroyed
    }

    /// Attach a component
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> bool {
        let added = self.entities.add_component(id, component);
        self.flush();
        added
    }

    /// Detach a component
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> bool {
        let removed = self.entities.remove_component::<T>(id);
        self.flush();
        removed
    }

    /// Reparent an entity, optionally into a socket
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
        socket: Option<&str>,
    ) -> bool {
        self.entities.set_parent(child, parent, socket)
    }

    // === Cameras ===

    /// Apply a named preset to a camera entity
    pub fn apply_camera_preset(
        &mut self,
        camera: EntityId,
        preset_id: &str,
    ) -> std::result::Result<(), PresetError> {
        let system = self
            .systems
            .get::<CameraSystem>(CAMERA_SYSTEM)
            .ok_or(PresetError::CameraNotFound(camera.0))?;
        system.apply_preset(&mut self.entities, camera, preset_id, self.services.context)
    }

    /// Switch a camera's mode directly, outside the preset path
    pub fn set_camera_mode(&mut self, camera: EntityId, mode: CameraMode) -> bool {
        match self.entities.get_component_mut::<CameraComponent>(camera) {
            Some(component) => {
                switch_mode(component, mode);
                true
            }
            None => false,
        }
    }

    /// Forward a camera entity's pose to a renderer-side camera
    pub fn bind_render_camera(&mut self, camera: EntityId, handle: Box<dyn RenderCamera>) -> bool {
        match self.systems.get_mut::<CameraSystem>(CAMERA_SYSTEM) {
            Some(system) => {
                system.bind_render_camera(camera, handle);
                true
            }
            None => false,
        }
    }

    // === Persistence ===

    /// Snapshot every entity
    pub fn snapshot(&self) -> Result<SceneSnapshot> {
        Ok(self.entities.serialize_all()?)
    }

    /// Serialize the scene to JSON
    pub fn to_json(&self) -> Result<String> {
        self.snapshot()?.to_json()
    }

    /// Add the entities from a JSON snapshot. Returns how many were created.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let snapshot = SceneSnapshot::from_json(json)?;
        let created = self.entities.deserialize_all(&snapshot);
        self.flush();
        Ok(created)
    }

    /// Destroy every entity (notifying systems), then drop all systems
    pub fn shutdown(&mut self) {
        self.entities.clear();
        self.flush();
        self.systems.clear();
        tracing::debug!("scene shut down");
    }
}

//! System scheduling and lifecycle notification

use super::component::ComponentType;
use super::entity::EntityId;
use super::manager::{EntityManager, LifecycleEvent};
use super::system::{BoxedSystem, System, SystemContext};
use crate::integration::SceneServices;
use rustc_hash::FxHashMap;

/// Shared tick clock
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Total elapsed time in seconds
    pub elapsed: f32,
    /// Ticks run so far
    pub frame: u64,
    /// Delta of the most recent tick
    pub last_delta: f32,
}

impl Clock {
    fn advance(&mut self, delta_time: f32) {
        let delta_time = delta_time.max(0.0);
        self.elapsed += delta_time;
        self.last_delta = delta_time;
        self.frame += 1;
    }
}

struct SystemEntry {
    system: BoxedSystem,
    priority: i32,
    /// Has seen `on_entity_added` for entities that existed at registration
    synced: bool,
}

/// Priority-ordered system registry that drives ticks
///
/// Systems run in ascending priority. Ties keep registration order.
pub struct SystemManager {
    systems: Vec<SystemEntry>,
    lookup: FxHashMap<&'static str, usize>,
    sorted: bool,
    clock: Clock,
}

impl Default for SystemManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            lookup: FxHashMap::default(),
            sorted: true,
            clock: Clock::default(),
        }
    }

    /// Start receiving lifecycle events from an entity manager
    pub fn attach(&mut self, entities: &mut EntityManager) {
        entities.enable_events();
    }

    /// Register a system. A second system with the same name is ignored.
    pub fn register<S: System>(&mut self, system: S) -> bool {
        self.register_boxed(Box::new(system))
    }

    /// Register a boxed system
    pub fn register_boxed(&mut self, system: BoxedSystem) -> bool {
        let name = system.name();
        if self.lookup.contains_key(name) {
            tracing::warn!(system = name, "system already registered");
            return false;
        }
        let priority = system.priority();
        self.systems.push(SystemEntry {
            system,
            priority,
            synced: false,
        });
        self.lookup.insert(name, self.systems.len() - 1);
        self.sorted = false;
        tracing::debug!(system = name, priority, "system registered");
        true
    }

    /// Remove a system by name
    pub fn unregister(&mut self, name: &str) -> Option<BoxedSystem> {
        let index = self.lookup.get(name).copied()?;
        let entry = self.systems.remove(index);
        self.rebuild_lookup();
        Some(entry.system)
    }

    /// Typed access to a registered system
    pub fn get<T: System>(&self, name: &str) -> Option<&T> {
        let index = *self.lookup.get(name)?;
        self.systems[index].system.as_any().downcast_ref()
    }

    /// Typed mutable access to a registered system
    pub fn get_mut<T: System>(&mut self, name: &str) -> Option<&mut T> {
        let index = *self.lookup.get(name)?;
        self.systems[index].system.as_any_mut().downcast_mut()
    }

    /// Check if a system is registered
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// System names in execution order
    pub fn system_names(&mut self) -> Vec<&'static str> {
        self.sort_if_needed();
        self.systems.iter().map(|e| e.system.name()).collect()
    }

    /// Number of systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Tick clock
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Drop every system
    pub fn clear(&mut self) {
        self.systems.clear();
        self.lookup.clear();
        self.sorted = true;
    }

    fn sort_if_needed(&mut self) {
        if !self.sorted {
            // Stable sort keeps registration order among equal priorities
            self.systems.sort_by_key(|e| e.priority);
            self.rebuild_lookup();
            self.sorted = true;
        }
    }

    fn rebuild_lookup(&mut self) {
        self.lookup.clear();
        for (index, entry) in self.systems.iter().enumerate() {
            self.lookup.insert(entry.system.name(), index);
        }
    }

    /// Run one tick: advance the clock, then every system in priority order
    pub fn update(
        &mut self,
        entities: &mut EntityManager,
        services: &mut SceneServices,
        delta_time: f32,
    ) {
        self.clock.advance(delta_time);
        self.sort_if_needed();
        self.flush(entities);

        for index in 0..self.systems.len() {
            let batch = active_batch(entities, self.systems[index].system.required_components());
            let mut ctx = SystemContext::new(
                entities,
                services,
                self.clock.last_delta,
                self.clock.elapsed,
                self.clock.frame,
            );
            self.systems[index].system.update(&mut ctx, &batch);
            // Later systems observe structural changes made by earlier ones
            self.flush(entities);
        }
    }

    /// Deliver pending lifecycle events, then bring newly registered systems
    /// up to date with the entities that already exist
    pub fn flush(&mut self, entities: &mut EntityManager) {
        for event in entities.drain_events() {
            self.notify_component_changed(entities, &event);
        }

        for entry in self.systems.iter_mut().filter(|e| !e.synced) {
            entry.synced = true;
            let required = entry.system.required_components();
            if required.is_empty() {
                continue;
            }
            for id in entities.get_entities_with_components(required) {
                entry.system.on_entity_added(id, entities);
            }
        }
    }

    /// Fire `on_entity_added` / `on_entity_removed` on every system whose
    /// required set the entity just entered or left
    pub fn notify_component_changed(&mut self, entities: &EntityManager, event: &LifecycleEvent) {
        for entry in self.systems.iter_mut().filter(|e| e.synced) {
            let required = entry.system.required_components();
            if !required.contains(&event.component_type) {
                continue;
            }
            let before = event.matched_before(required);
            let after = event.matches_after(required);
            match (before, after) {
                (false, true) => {
                    tracing::trace!(
                        system = entry.system.name(),
                        entity = %event.entity,
                        "entity added"
                    );
                    entry.system.on_entity_added(event.entity, entities);
                }
                (true, false) => {
                    tracing::trace!(
                        system = entry.system.name(),
                        entity = %event.entity,
                        "entity removed"
                    );
                    entry.system.on_entity_removed(event.entity);
                }
                _ => {}
            }
        }
    }
}

fn active_batch(entities: &EntityManager, required: &[ComponentType]) -> Vec<EntityId> {
    let mut batch = entities.get_entities_with_components(required);
    batch.retain(|id| entities.get_entity(*id).map(|e| e.active).unwrap_or(false));
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CharacterComponent, TransformComponent};
    use crate::ecs::Component;
    use std::any::Any;

    #[derive(Default)]
    struct Recorder {
        name: &'static str,
        priority: i32,
        required: Vec<ComponentType>,
        added: Vec<EntityId>,
        removed: Vec<EntityId>,
        batches: Vec<Vec<EntityId>>,
        log: Option<std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn required_components(&self) -> &[ComponentType] {
            &self.required
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn update(&mut self, _ctx: &mut SystemContext, entities: &[EntityId]) {
            self.batches.push(entities.to_vec());
            if let Some(log) = &self.log {
                if let Ok(mut log) = log.lock() {
                    log.push(self.name);
                }
            }
        }

        fn on_entity_added(&mut self, entity: EntityId, _entities: &EntityManager) {
            self.added.push(entity);
        }

        fn on_entity_removed(&mut self, entity: EntityId) {
            self.removed.push(entity);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn recorder(name: &'static str, required: &[ComponentType]) -> Recorder {
        Recorder {
            name,
            required: required.to_vec(),
            ..Default::default()
        }
    }

    fn setup() -> (EntityManager, SystemManager, SceneServices) {
        let mut entities = EntityManager::new();
        let mut systems = SystemManager::new();
        systems.attach(&mut entities);
        (entities, systems, SceneServices::default())
    }

    #[test]
    fn test_priority_order() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let (mut entities, mut systems, mut services) = setup();
        for (name, priority) in [("late", 10), ("early", -5), ("middle", 0)] {
            systems.register(Recorder {
                name,
                priority,
                log: Some(log.clone()),
                ..Default::default()
            });
        }
        assert!(!systems.register(recorder("late", &[])));

        systems.update(&mut entities, &mut services, 0.016);
        assert_eq!(*log.lock().unwrap(), vec!["early", "middle", "late"]);
        assert_eq!(systems.system_names(), vec!["early", "middle", "late"]);
        assert_eq!(systems.clock().frame, 1);
    }

    #[test]
    fn test_edge_triggered_notifications() {
        let (mut entities, mut systems, _) = setup();
        systems.register(recorder("both", &[TransformComponent::TYPE, CharacterComponent::TYPE]));
        systems.flush(&mut entities);

        let e = entities.create_entity("E", None);
        entities.add_component(e, TransformComponent::default());
        systems.flush(&mut entities);
        assert!(systems.get::<Recorder>("both").unwrap().added.is_empty());

        entities.add_component(e, CharacterComponent::default());
        // Duplicate add is refused and must not notify again
        entities.add_component(e, CharacterComponent::default());
        systems.flush(&mut entities);
        assert_eq!(systems.get::<Recorder>("both").unwrap().added, vec![e]);

        entities.remove_component::<TransformComponent>(e);
        entities.remove_component::<CharacterComponent>(e);
        systems.flush(&mut entities);
        let rec = systems.get::<Recorder>("both").unwrap();
        assert_eq!(rec.added, vec![e]);
        assert_eq!(rec.removed, vec![e]);
    }

    #[test]
    fn test_destroy_notifies_once() {
        let (mut entities, mut systems, _) = setup();
        systems.register(recorder("both", &[TransformComponent::TYPE, CharacterComponent::TYPE]));
        systems.register(recorder("transform", &[TransformComponent::TYPE]));

        let parent = entities.create_entity("Parent", None);
        let child = entities.create_entity("Child", None);
        for e in [parent, child] {
            entities.add_component(e, TransformComponent::default());
            entities.add_component(e, CharacterComponent::default());
        }
        entities.set_parent(child, Some(parent), None);
        systems.flush(&mut entities);

        entities.destroy_entity(parent);
        systems.flush(&mut entities);
        for name in ["both", "transform"] {
            let rec = systems.get::<Recorder>(name).unwrap();
            let mut removed = rec.removed.clone();
            removed.sort();
            assert_eq!(removed, vec![parent, child], "{name}");
        }
    }

    #[test]
    fn test_late_registration_syncs_existing() {
        let (mut entities, mut systems, _) = setup();
        let e = entities.create_entity("E", None);
        entities.add_component(e, TransformComponent::default());

        systems.register(recorder("transform", &[TransformComponent::TYPE]));
        systems.flush(&mut entities);
        systems.flush(&mut entities);
        assert_eq!(systems.get::<Recorder>("transform").unwrap().added, vec![e]);
    }

    #[test]
    fn test_inactive_entities_skipped() {
        let (mut entities, mut systems, mut services) = setup();
        systems.register(recorder("transform", &[TransformComponent::TYPE]));
        let a = entities.create_entity("A", None);
        let b = entities.create_entity("B", None);
        entities.add_component(a, TransformComponent::default());
        entities.add_component(b, TransformComponent::default());
        if let Some(entity) = entities.get_entity_mut(b) {
            entity.active = false;
        }

        systems.update(&mut entities, &mut services, 0.016);
        assert_eq!(systems.get::<Recorder>("transform").unwrap().batches, vec![vec![a]]);
    }

    #[test]
    fn test_unregister() {
        let (_, mut systems, _) = setup();
        systems.register(recorder("a", &[]));
        systems.register(recorder("b", &[]));
        assert!(systems.unregister("a").is_some());
        assert!(systems.unregister("a").is_none());
        assert!(systems.get::<Recorder>("b").is_some());
        assert_eq!(systems.len(), 1);
    }
}

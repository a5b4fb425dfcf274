//! Camera system
//!
//! Per camera, per tick:
//!
//! 1. run a pending mode transition from the camera's own last-mode memo
//! 2. let the strategy read input, then apply wheel zoom
//! 3. drive the bound character from movement actions
//! 4. re-resolve the target by id, falling back to the safe preset if it
//!    vanished during the experience
//! 5. compute the desired pose and smooth toward it
//! 6. write the pose to the camera's transform and bound render handle
//!
//! Input deltas are reset once, after every camera has read them.

use super::presets::CameraPresetManager;
use super::smoothing::{catch_up_factor, smooth_pose, smoothing_factor};
use super::strategy::{strategy_for, ModeTransition};
use super::{CameraComponent, CameraMode, CameraPose};
use crate::config::CameraSettings;
use crate::ecs::{Component, ComponentType, EntityId, EntityManager, System, SystemContext};
use crate::integration::{actions, InputSource, PhysicsBridge, RenderCamera, SceneContext};
use crate::math::{yaw_forward, yaw_right, Mat4, Vec3};
use crate::scene::{CharacterComponent, TransformComponent};
use crate::systems::parent_matrix;
use rustc_hash::FxHashMap;
use std::any::Any;

/// Runs after physics so targets are in their final position for the tick
pub const CAMERA_PRIORITY: i32 = 200;

/// Drives every entity with a [`CameraComponent`]
pub struct CameraSystem {
    settings: CameraSettings,
    presets: CameraPresetManager,
    render_cameras: FxHashMap<EntityId, Box<dyn RenderCamera>>,
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

impl CameraSystem {
    /// Create a camera system with the built-in presets
    pub fn new(settings: CameraSettings) -> Self {
        let mut presets = CameraPresetManager::new();
        presets.set_safe_preset(settings.safe_preset.clone());
        Self {
            settings,
            presets,
            render_cameras: FxHashMap::default(),
        }
    }

    /// Replace the preset catalog
    pub fn with_presets(mut self, presets: CameraPresetManager) -> Self {
        self.presets = presets;
        self
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn presets(&self) -> &CameraPresetManager {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut CameraPresetManager {
        &mut self.presets
    }

    /// Forward a camera entity's pose to a renderer-side camera every tick
    pub fn bind_render_camera(&mut self, camera: EntityId, handle: Box<dyn RenderCamera>) {
        self.render_cameras.insert(camera, handle);
    }

    /// Stop forwarding poses for a camera entity
    pub fn unbind_render_camera(&mut self, camera: EntityId) -> Option<Box<dyn RenderCamera>> {
        self.render_cameras.remove(&camera)
    }

    /// Apply a preset to a camera entity
    pub fn apply_preset(
        &self,
        entities: &mut EntityManager,
        camera: EntityId,
        preset_id: &str,
        context: SceneContext,
    ) -> Result<(), crate::PresetError> {
        self.presets.apply_preset(entities, camera, preset_id, context)
    }

    fn update_camera(&mut self, ctx: &mut SystemContext, id: EntityId, dt: f32) {
        let Some(mut camera) = ctx.entities.get_component::<CameraComponent>(id).cloned() else {
            return;
        };
        let context = ctx.services.context;

        if let Some(transition) = ModeTransition::detect(&camera) {
            transition.apply(&mut camera);
        }

        let strategy = strategy_for(camera.mode);
        strategy.handle_input(&mut camera, ctx.services.input.as_ref(), &self.settings, dt);
        if strategy.supports_zoom() {
            let wheel = ctx.services.input.wheel_delta();
            if wheel != 0.0 {
                let distance = camera.distance - wheel * self.settings.zoom_speed;
                camera.distance = self.settings.clamp_distance(distance);
            }
        }

        self.drive_character(ctx, &mut camera, dt);

        let target = match camera.target_entity_id {
            Some(target) if ctx.entities.contains(target) => ctx.entities.world_position(target),
            Some(target) => {
                tracing::debug!(camera = %id, %target, "camera target lost");
                if context.is_experience() && camera.mode != CameraMode::Orbit {
                    self.presets.fallback_to_safe_preset(&mut camera, context);
                } else {
                    camera.target_entity_id = None;
                }
                None
            }
            None => None,
        };

        // Fallback may have switched modes
        let strategy = strategy_for(camera.mode);
        let desired = strategy.update_target(&camera, target, dt);
        let pose = match camera.current {
            Some(current) => self.smooth(&camera, &current, &desired, dt),
            None => desired,
        };
        camera.current = Some(pose);

        let (position, rotation) = local_pose(ctx.entities, id, &pose);
        if let Some(transform) = ctx.entities.get_component_mut::<TransformComponent>(id) {
            if transform.position() != position {
                transform.set_position(position);
            }
            if transform.rotation() != rotation {
                transform.set_rotation(rotation);
            }
        }
        if let Some(handle) = self.render_cameras.get_mut(&id) {
            handle.apply_pose(&pose);
        }
        if let Some(slot) = ctx.entities.get_component_mut::<CameraComponent>(id) {
            *slot = camera;
        }
    }

    fn smooth(
        &self,
        camera: &CameraComponent,
        current: &CameraPose,
        desired: &CameraPose,
        dt: f32,
    ) -> CameraPose {
        let strategy = strategy_for(camera.mode);
        let mut t = if strategy.instant() {
            1.0
        } else {
            smoothing_factor(camera.smooth_speed, dt)
        };
        if strategy.catch_up() {
            let error_sq = current.position.distance_squared(desired.position);
            t = catch_up_factor(
                t,
                error_sq,
                self.settings.catch_up_threshold,
                self.settings.catch_up_gain,
            );
        }
        smooth_pose(current, desired, t)
    }

    /// Translate movement actions into character motion
    fn drive_character(&self, ctx: &mut SystemContext, camera: &mut CameraComponent, dt: f32) {
        let Some(character) = camera.character_id else {
            return;
        };
        let Some(speed) = ctx
            .entities
            .get_component::<CharacterComponent>(character)
            .map(|c| c.move_speed)
        else {
            camera.character_id = None;
            return;
        };

        let input = ctx.services.input.as_ref();
        let velocity = match camera.mode {
            CameraMode::Sidescroll => {
                let x = axis(input, actions::MOVE_RIGHT, actions::MOVE_LEFT);
                Vec3::new(x * speed, 0.0, 0.0)
            }
            CameraMode::Isometric => isometric_velocity(input, camera.yaw, speed),
            _ => {
                let forward = axis(input, actions::MOVE_FORWARD, actions::MOVE_BACKWARD);
                let right = axis(input, actions::MOVE_RIGHT, actions::MOVE_LEFT);
                let direction = yaw_forward(camera.yaw) * forward + yaw_right(camera.yaw) * right;
                if direction.length_squared() > 0.0 {
                    direction.normalize() * speed
                } else {
                    Vec3::ZERO
                }
            }
        };

        apply_velocity(ctx.entities, ctx.services.physics.as_deref_mut(), character, velocity, dt);
    }
}

/// Express a world-space pose in the camera's parent space, so the hierarchy
/// pass puts the camera back where the pose says
fn local_pose(entities: &EntityManager, id: EntityId, pose: &CameraPose) -> (Vec3, Vec3) {
    if entities.parent_of(id).is_none() {
        return (pose.position, pose.rotation);
    }
    let Some(inverse) = parent_matrix(entities, id).inverse_affine() else {
        tracing::debug!(camera = %id, "parent space is singular, writing world pose");
        return (pose.position, pose.rotation);
    };
    let local = inverse.mul(&Mat4::compose(pose.position, pose.rotation, Vec3::ONE));
    (local.translation(), local.to_euler_degrees())
}

fn axis(input: &dyn InputSource, positive: &str, negative: &str) -> f32 {
    let mut value = 0.0;
    if input.is_action_pressed(positive) {
        value += 1.0;
    }
    if input.is_action_pressed(negative) {
        value -= 1.0;
    }
    value
}

/// Isometric character control.
///
/// Separate from the shared path and frozen: change only to fix
/// isometric-specific defects.
fn isometric_velocity(input: &dyn InputSource, yaw: f32, speed: f32) -> Vec3 {
    let forward = yaw_forward(yaw);
    let right = yaw_right(yaw);

    let mut direction = Vec3::ZERO;
    if input.is_action_pressed(actions::MOVE_FORWARD) {
        direction += forward;
    }
    if input.is_action_pressed(actions::MOVE_BACKWARD) {
        direction -= forward;
    }
    if input.is_action_pressed(actions::MOVE_RIGHT) {
        direction += right;
    }
    if input.is_action_pressed(actions::MOVE_LEFT) {
        direction -= right;
    }
    if direction.length_squared() == 0.0 {
        return Vec3::ZERO;
    }
    direction.normalize() * speed
}

/// Write horizontal velocity to the physics body, keeping its vertical
/// component, or move the transform directly when there is no body
fn apply_velocity(
    entities: &mut EntityManager,
    physics: Option<&mut (dyn PhysicsBridge + 'static)>,
    character: EntityId,
    velocity: Vec3,
    dt: f32,
) {
    if let Some(physics) = physics {
        if let Some(body) = physics.get_rigid_body(character) {
            physics.set_entity_velocity(character, [velocity.x, body.velocity.y, velocity.z]);
            return;
        }
    }
    if velocity == Vec3::ZERO {
        return;
    }
    if let Some(transform) = entities.get_component_mut::<TransformComponent>(character) {
        transform.translate(velocity * dt);
    }
}

impl System for CameraSystem {
    fn name(&self) -> &'static str {
        "CameraSystem"
    }

    fn required_components(&self) -> &[ComponentType] {
        &[CameraComponent::TYPE]
    }

    fn priority(&self) -> i32 {
        CAMERA_PRIORITY
    }

    fn update(&mut self, ctx: &mut SystemContext, entities: &[EntityId]) {
        let dt = ctx.delta_time;
        for id in entities {
            self.update_camera(ctx, *id, dt);
        }
        ctx.services.input.reset_deltas();
    }

    fn on_entity_added(&mut self, entity: EntityId, _entities: &EntityManager) {
        tracing::debug!(%entity, "camera registered");
    }

    fn on_entity_removed(&mut self, entity: EntityId) {
        self.render_cameras.remove(&entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Socket, SystemManager};
    use crate::integration::{InputState, MouseButton, RigidBodyState, SceneServices};
    use crate::math::Vec2;
    use crate::systems::HierarchySystem;
    use std::sync::{Arc, Mutex};

    const EPS: f32 = 1e-4;

    struct Harness {
        entities: EntityManager,
        systems: SystemManager,
        services: SceneServices,
    }

    impl Harness {
        fn new(context: SceneContext) -> Self {
            Self::with_input(context, Box::new(InputState::new()))
        }

        fn with_input(context: SceneContext, input: Box<dyn InputSource>) -> Self {
            let mut entities = EntityManager::new();
            let mut systems = SystemManager::new();
            systems.attach(&mut entities);
            systems.register(HierarchySystem::new());
            systems.register(CameraSystem::default());
            Self {
                entities,
                systems,
                services: SceneServices::new(context, input),
            }
        }

        fn tick(&mut self, dt: f32) {
            self.systems.update(&mut self.entities, &mut self.services, dt);
        }

        fn spawn(&mut self, name: &str, position: Vec3) -> EntityId {
            let id = self.entities.create_entity(name, None);
            self.entities.add_component(id, TransformComponent::new(position));
            id
        }

        fn camera(&self, id: EntityId) -> &CameraComponent {
            self.entities.get_component::<CameraComponent>(id).unwrap()
        }
    }

    #[test]
    fn test_orbit_scenario() {
        let mut h = Harness::new(SceneContext::Editing);
        let target = h.spawn("Target", Vec3::ZERO);
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::Orbit)
                .with_target(target)
                .with_orbit(0.0, 0.0, 10.0),
        );
        h.tick(0.016);

        let pose = *h.camera(cam).current_pose().unwrap();
        assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), EPS), "{pose:?}");
        assert!(pose.pivot.abs_diff_eq(Vec3::ZERO, EPS));
        let transform = h.entities.get_component::<TransformComponent>(cam).unwrap();
        assert!(transform.position().abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), EPS));
    }

    #[test]
    fn test_pose_at_rest_does_not_drift() {
        let mut h = Harness::new(SceneContext::Experience);
        let target = h.spawn("Target", Vec3::new(3.0, 0.0, -2.0));
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::ThirdPerson)
                .with_target(target)
                .with_orbit(25.0, 140.0, 6.0),
        );
        h.tick(0.016);
        let first = *h.camera(cam).current_pose().unwrap();
        for _ in 0..20 {
            h.tick(0.016);
        }
        assert_eq!(*h.camera(cam).current_pose().unwrap(), first);
    }

    #[test]
    fn test_target_destroyed_falls_back() {
        let mut h = Harness::new(SceneContext::Experience);
        let target = h.spawn("Player", Vec3::ZERO);
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::ThirdPerson).with_target(target),
        );
        h.tick(0.016);
        assert_eq!(h.camera(cam).mode, CameraMode::ThirdPerson);

        h.entities.destroy_entity(target);
        h.tick(0.016);
        let camera = h.camera(cam);
        assert_eq!(camera.mode, CameraMode::Isometric);
        assert!(camera.target_entity_id.is_none());
    }

    #[test]
    fn test_target_lost_while_editing_only_clears() {
        let mut h = Harness::new(SceneContext::Editing);
        let target = h.spawn("Player", Vec3::ZERO);
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::ThirdPerson).with_target(target),
        );
        h.tick(0.016);
        h.entities.destroy_entity(target);
        h.tick(0.016);
        let camera = h.camera(cam);
        assert_eq!(camera.mode, CameraMode::ThirdPerson);
        assert!(camera.target_entity_id.is_none());
    }

    #[test]
    fn test_independent_mode_memos() {
        let mut h = Harness::new(SceneContext::Experience);
        let a = h.spawn("CamA", Vec3::ZERO);
        let b = h.spawn("CamB", Vec3::ZERO);
        h.entities.add_component(a, CameraComponent::new(CameraMode::Orbit));
        h.entities.add_component(b, CameraComponent::new(CameraMode::Sidescroll));
        h.tick(0.016);

        if let Some(camera) = h.entities.get_component_mut::<CameraComponent>(a) {
            camera.pivot_offset = Vec3::new(2.0, 0.0, 0.0);
            camera.mode = CameraMode::Isometric;
        }
        if let Some(camera) = h.entities.get_component_mut::<CameraComponent>(b) {
            camera.pivot_offset = Vec3::new(0.0, 1.0, 0.0);
        }
        h.tick(0.016);

        // Only A switched, so only A ran orbit's exit
        assert_eq!(h.camera(a).last_mode, Some(CameraMode::Isometric));
        assert_eq!(h.camera(a).pivot_offset, Vec3::ZERO);
        assert_eq!(h.camera(a).pitch, 45.0);
        assert_eq!(h.camera(b).last_mode, Some(CameraMode::Sidescroll));
        assert_eq!(h.camera(b).pivot_offset, Vec3::new(0.0, 1.0, 0.0));
    }

    struct CountingInput {
        inner: InputState,
        resets: Arc<Mutex<usize>>,
    }

    impl InputSource for CountingInput {
        fn is_action_pressed(&self, action: &str) -> bool {
            self.inner.is_action_pressed(action)
        }

        fn is_key_pressed(&self, key: &str) -> bool {
            self.inner.is_key_pressed(key)
        }

        fn is_button_pressed(&self, button: MouseButton) -> bool {
            self.inner.is_button_pressed(button)
        }

        fn mouse_delta(&self) -> Vec2 {
            self.inner.mouse_delta()
        }

        fn wheel_delta(&self) -> f32 {
            self.inner.wheel_delta()
        }

        fn reset_deltas(&mut self) {
            self.inner.reset_deltas();
            if let Ok(mut n) = self.resets.lock() {
                *n += 1;
            }
        }
    }

    #[test]
    fn test_deltas_reset_once_for_all_cameras() {
        let resets = Arc::new(Mutex::new(0));
        let mut inner = InputState::new();
        inner.set_button(MouseButton::Secondary, true);
        inner.add_mouse_delta(8.0, 0.0);
        let input = CountingInput {
            inner,
            resets: resets.clone(),
        };
        let mut h = Harness::with_input(SceneContext::Editing, Box::new(input));

        let mut cams = Vec::new();
        for i in 0..3 {
            let cam = h.spawn(&format!("Cam{i}"), Vec3::ZERO);
            let camera = CameraComponent::new(CameraMode::Orbit).with_orbit(0.0, 0.0, 10.0);
            h.entities.add_component(cam, camera);
            cams.push(cam);
        }
        h.tick(0.016);

        assert_eq!(*resets.lock().unwrap(), 1);
        // Every camera saw the same frame of motion
        for cam in cams {
            assert_eq!(h.camera(cam).yaw, -2.0);
        }
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let mut input = InputState::new();
        input.add_wheel_delta(500.0);
        let mut h = Harness::with_input(SceneContext::Editing, Box::new(input));
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(cam, CameraComponent::new(CameraMode::Orbit));
        h.tick(0.016);
        assert_eq!(h.camera(cam).distance, CameraSettings::default().min_distance);
    }

    #[test]
    fn test_first_person_is_instant() {
        let mut h = Harness::new(SceneContext::Experience);
        let target = h.spawn("Player", Vec3::ZERO);
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::FirstPerson).with_target(target),
        );
        h.tick(0.016);

        if let Some(t) = h.entities.get_component_mut::<TransformComponent>(target) {
            t.set_position(Vec3::new(50.0, 0.0, 0.0));
        }
        h.tick(0.016);
        let pose = h.camera(cam).current_pose().unwrap();
        assert!(pose.position.abs_diff_eq(Vec3::new(50.0, 1.7, -0.6), EPS), "{pose:?}");
    }

    #[test]
    fn test_catch_up_only_outside_orbit() {
        let mut h = Harness::new(SceneContext::Experience);
        let target = h.spawn("Player", Vec3::ZERO);
        let orbit = h.spawn("Orbit", Vec3::ZERO);
        let chase = h.spawn("Chase", Vec3::ZERO);
        for (cam, mode) in [(orbit, CameraMode::Orbit), (chase, CameraMode::ThirdPerson)] {
            h.entities.add_component(
                cam,
                CameraComponent::new(mode).with_target(target).with_orbit(0.0, 0.0, 5.0),
            );
        }
        h.tick(0.016);

        if let Some(t) = h.entities.get_component_mut::<TransformComponent>(target) {
            t.set_position(Vec3::new(20.0, 0.0, 0.0));
        }
        h.tick(0.016);

        let orbit_x = h.camera(orbit).current_pose().unwrap().position.x;
        let chase_x = h.camera(chase).current_pose().unwrap().position.x;
        // Base factor is 8 * 0.016 = 0.128
        assert!((orbit_x - 20.0 * 0.128).abs() < 1e-3, "{orbit_x}");
        assert!(chase_x > orbit_x);
    }

    #[derive(Default)]
    struct RecordingPhysics {
        bodies: FxHashMap<EntityId, RigidBodyState>,
        writes: Arc<Mutex<Vec<(EntityId, [f32; 3])>>>,
    }

    impl PhysicsBridge for RecordingPhysics {
        fn get_rigid_body(&self, entity: EntityId) -> Option<RigidBodyState> {
            self.bodies.get(&entity).copied()
        }

        fn set_entity_velocity(&mut self, entity: EntityId, velocity: [f32; 3]) {
            if let Ok(mut writes) = self.writes.lock() {
                writes.push((entity, velocity));
            }
        }
    }

    #[test]
    fn test_character_velocity_preserves_vertical() {
        let input = InputState::new().with_action(actions::MOVE_FORWARD);
        let mut h = Harness::with_input(SceneContext::Experience, Box::new(input));
        let player = h.spawn("Player", Vec3::ZERO);
        h.entities.add_component(player, CharacterComponent::default().with_move_speed(4.0));
        let cam = h.spawn("Camera", Vec3::ZERO);
        let mut camera = CameraComponent::new(CameraMode::ThirdPerson).with_target(player);
        camera.character_id = Some(player);
        h.entities.add_component(cam, camera);

        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut physics = RecordingPhysics {
            writes: writes.clone(),
            ..Default::default()
        };
        physics.bodies.insert(
            player,
            RigidBodyState {
                velocity: Vec3::new(0.0, -3.0, 0.0),
            },
        );
        h.services.physics = Some(Box::new(physics));
        h.tick(0.016);

        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (entity, v) = writes[0];
        assert_eq!(entity, player);
        assert!((v[0]).abs() < EPS);
        assert_eq!(v[1], -3.0);
        assert!((v[2] + 4.0).abs() < EPS);
    }

    #[test]
    fn test_character_position_fallback_and_sidescroll_axis() {
        let input = InputState::new()
            .with_action(actions::MOVE_FORWARD)
            .with_action(actions::MOVE_RIGHT);
        let mut h = Harness::with_input(SceneContext::Experience, Box::new(input));
        let player = h.spawn("Player", Vec3::ZERO);
        h.entities.add_component(player, CharacterComponent::default().with_move_speed(2.0));
        let cam = h.spawn("Camera", Vec3::ZERO);
        let mut camera = CameraComponent::new(CameraMode::Sidescroll).with_target(player);
        camera.character_id = Some(player);
        h.entities.add_component(cam, camera);

        h.tick(0.5);
        let position = h.entities.get_component::<TransformComponent>(player).unwrap().position();
        assert_eq!(position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_isometric_movement_follows_yaw() {
        let input = InputState::new().with_action(actions::MOVE_FORWARD);
        let velocity = isometric_velocity(&input, 20.0, 1.0);
        assert!(velocity.abs_diff_eq(yaw_forward(20.0), EPS), "{velocity:?}");
        assert!(velocity.abs_diff_eq(Vec3::new(-0.342_02, 0.0, -0.939_69), 1e-4));

        let strafe = InputState::new()
            .with_action(actions::MOVE_FORWARD)
            .with_action(actions::MOVE_RIGHT);
        let velocity = isometric_velocity(&strafe, 20.0, 2.0);
        let expected = (yaw_forward(20.0) + yaw_right(20.0)).normalize() * 2.0;
        assert!(velocity.abs_diff_eq(expected, EPS), "{velocity:?}");
    }

    #[test]
    fn test_parented_camera_world_matches_pose() {
        let mut h = Harness::new(SceneContext::Editing);
        let root = h.spawn("Root", Vec3::new(0.0, 2.0, 0.0));
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::Orbit)
                .with_target(root)
                .with_orbit(0.0, 0.0, 10.0),
        );
        h.entities.set_parent(cam, Some(root), None);
        for _ in 0..3 {
            h.tick(0.016);
        }

        let pose = *h.camera(cam).current_pose().unwrap();
        assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 2.0, 10.0), EPS), "{pose:?}");
        let world = h.entities.world_position(cam).unwrap();
        assert!(world.abs_diff_eq(pose.position, EPS), "{world:?}");
    }

    #[test]
    fn test_camera_under_rotated_socket_keeps_world_pose() {
        let mut h = Harness::new(SceneContext::Experience);
        let rig = h.spawn("Rig", Vec3::new(5.0, 0.0, -3.0));
        if let Some(t) = h.entities.get_component_mut::<TransformComponent>(rig) {
            t.set_rotation(Vec3::new(0.0, 90.0, 0.0));
        }
        h.entities.add_socket(rig, Socket::new("boom", Vec3::new(0.0, 1.0, 2.0)));
        let target = h.spawn("Target", Vec3::new(1.0, 0.0, 1.0));
        let cam = h.spawn("Camera", Vec3::ZERO);
        h.entities.add_component(
            cam,
            CameraComponent::new(CameraMode::Orbit)
                .with_target(target)
                .with_orbit(30.0, 20.0, 8.0),
        );
        assert!(h.entities.set_parent(cam, Some(rig), Some("boom")));
        for _ in 0..3 {
            h.tick(0.016);
        }

        let pose = *h.camera(cam).current_pose().unwrap();
        let world = *h
            .entities
            .get_component::<TransformComponent>(cam)
            .unwrap()
            .world_matrix();
        assert!(world.translation().abs_diff_eq(pose.position, 1e-3), "{world:?}");
        assert!(world.to_euler_degrees().abs_diff_eq(pose.rotation, 1e-2));
    }

    #[test]
    fn test_dangling_character_cleared() {
        let mut h = Harness::new(SceneContext::Experience);
        let cam = h.spawn("Camera", Vec3::ZERO);
        let mut camera = CameraComponent::new(CameraMode::Isometric);
        camera.character_id = Some(EntityId(404));
        h.entities.add_component(cam, camera);
        h.tick(0.016);
        assert!(h.camera(cam).character_id.is_none());
    }

    struct SharedRender(Arc<Mutex<Vec<CameraPose>>>);

    impl RenderCamera for SharedRender {
        fn apply_pose(&mut self, pose: &CameraPose) {
            if let Ok(mut poses) = self.0.lock() {
                poses.push(*pose);
            }
        }
    }

    #[test]
    fn test_render_handle_receives_pose_until_removed() {
        let mut h = Harness::new(SceneContext::Editing);
        let cam = h.spawn("Camera", Vec3::ZERO);
        let camera = CameraComponent::new(CameraMode::Orbit).with_orbit(0.0, 0.0, 10.0);
        h.entities.add_component(cam, camera);
        let poses = Arc::new(Mutex::new(Vec::new()));
        if let Some(system) = h.systems.get_mut::<CameraSystem>("CameraSystem") {
            system.bind_render_camera(cam, Box::new(SharedRender(poses.clone())));
        }
        h.tick(0.016);
        assert_eq!(poses.lock().unwrap().len(), 1);
        assert_eq!(poses.lock().unwrap()[0].fov, 60.0);

        h.entities.remove_component::<CameraComponent>(cam);
        h.tick(0.016);
        assert!(h
            .systems
            .get_mut::<CameraSystem>("CameraSystem")
            .and_then(|s| s.unbind_render_camera(cam))
            .is_none());
    }
}

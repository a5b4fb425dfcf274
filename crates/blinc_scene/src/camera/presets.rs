//! Named camera presets
//!
//! A preset packages a mode with a partial set of camera fields. Presets are
//! for the running experience only; the editor works in orbit mode, which is
//! never a preset.

use super::strategy::strategy_for;
use super::{CameraComponent, CameraMode};
use crate::ecs::{Component, EntityId, EntityManager};
use crate::error::PresetError;
use crate::integration::SceneContext;
use crate::math::Vec3;
use crate::scene::CharacterComponent;
use rustc_hash::FxHashMap;

/// Isometric overview that needs no target; the default safe preset
pub const GOD_VIEW_PRESET: &str = "god_view";
pub const FIRST_PERSON_PRESET: &str = "first_person";
pub const THIRD_PERSON_PRESET: &str = "third_person";
pub const SIDE_SCROLL_PRESET: &str = "side_scroll";

/// Camera fields a preset overrides; `None` leaves the field alone
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresetSnapshot {
    pub pitch: Option<f32>,
    pub yaw: Option<f32>,
    pub distance: Option<f32>,
    pub fov: Option<f32>,
    pub smooth_speed: Option<f32>,
    pub pivot_offset: Option<Vec3>,
    pub iso_lock_axis: Option<bool>,
}

impl PresetSnapshot {
    fn apply(&self, camera: &mut CameraComponent) {
        if let Some(v) = self.pitch {
            camera.pitch = v;
        }
        if let Some(v) = self.yaw {
            camera.yaw = v;
        }
        if let Some(v) = self.distance {
            camera.distance = v;
        }
        if let Some(v) = self.fov {
            camera.fov = v;
        }
        if let Some(v) = self.smooth_speed {
            camera.smooth_speed = v;
        }
        if let Some(v) = self.pivot_offset {
            camera.pivot_offset = v;
        }
        if let Some(v) = self.iso_lock_axis {
            camera.iso_lock_axis = v;
        }
    }
}

/// An immutable named camera configuration
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPreset {
    id: String,
    mode: CameraMode,
    snapshot: PresetSnapshot,
    requires_bound_target: bool,
}

impl CameraPreset {
    /// Create a preset for a mode
    pub fn new(id: impl Into<String>, mode: CameraMode) -> Self {
        Self {
            id: id.into(),
            mode,
            snapshot: PresetSnapshot::default(),
            requires_bound_target: false,
        }
    }

    /// Set the overridden fields
    pub fn with_snapshot(mut self, snapshot: PresetSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Require a controllable character to bind as target
    pub fn requiring_target(mut self) -> Self {
        self.requires_bound_target = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn snapshot(&self) -> &PresetSnapshot {
        &self.snapshot
    }

    pub fn requires_bound_target(&self) -> bool {
        self.requires_bound_target
    }
}

/// Preset catalog plus the apply and fallback paths
#[derive(Clone, Debug)]
pub struct CameraPresetManager {
    presets: FxHashMap<String, CameraPreset>,
    order: Vec<String>,
    safe_preset: String,
}

impl Default for CameraPresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraPresetManager {
    /// Catalog with the built-in presets and `god_view` as the safe default
    pub fn new() -> Self {
        let mut manager = Self::empty(GOD_VIEW_PRESET);
        for preset in default_presets() {
            if let Err(err) = manager.register(preset) {
                tracing::warn!(%err, "built-in camera preset rejected");
            }
        }
        manager
    }

    /// Empty catalog
    pub fn empty(safe_preset: impl Into<String>) -> Self {
        Self {
            presets: FxHashMap::default(),
            order: Vec::new(),
            safe_preset: safe_preset.into(),
        }
    }

    /// Change which preset fallback forces
    pub fn set_safe_preset(&mut self, id: impl Into<String>) {
        self.safe_preset = id.into();
    }

    pub fn safe_preset(&self) -> &str {
        &self.safe_preset
    }

    /// Add a preset.
    ///
    /// Orbit presets are rejected. A duplicate id is ignored with a warning
    /// and returns `Ok(false)`.
    pub fn register(&mut self, preset: CameraPreset) -> Result<bool, PresetError> {
        if preset.mode == CameraMode::Orbit {
            return Err(PresetError::OrbitPreset(preset.id));
        }
        if self.presets.contains_key(&preset.id) {
            tracing::warn!(preset = %preset.id, "camera preset already registered");
            return Ok(false);
        }
        self.order.push(preset.id.clone());
        self.presets.insert(preset.id.clone(), preset);
        Ok(true)
    }

    /// Look up a preset
    pub fn get(&self, id: &str) -> Option<&CameraPreset> {
        self.presets.get(id)
    }

    /// Preset ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Apply a preset to a camera entity.
    ///
    /// A preset that needs a target binds the active character with the
    /// lowest id. On any error the camera is left untouched.
    pub fn apply_preset(
        &self,
        entities: &mut EntityManager,
        camera_id: EntityId,
        preset_id: &str,
        context: SceneContext,
    ) -> Result<(), PresetError> {
        if !context.is_experience() {
            return Err(PresetError::EditingContext);
        }
        let preset = self
            .get(preset_id)
            .ok_or_else(|| PresetError::UnknownPreset(preset_id.to_string()))?;
        if entities.get_component::<CameraComponent>(camera_id).is_none() {
            return Err(PresetError::CameraNotFound(camera_id.0));
        }

        let target = if preset.requires_bound_target {
            let player = find_player(entities)
                .ok_or_else(|| PresetError::NoTargetEntity(preset.id.clone()))?;
            Some(player)
        } else {
            None
        };

        let camera = entities
            .get_component_mut::<CameraComponent>(camera_id)
            .ok_or(PresetError::CameraNotFound(camera_id.0))?;
        apply_to(camera, preset, target);
        tracing::debug!(camera = %camera_id, preset = preset_id, "camera preset applied");
        Ok(())
    }

    /// Recover a camera whose target vanished.
    ///
    /// While editing, or in orbit, this only clears the target reference.
    /// Otherwise it forces the safe preset. Returns `true` if a preset was
    /// applied.
    pub fn fallback_to_safe_preset(
        &self,
        camera: &mut CameraComponent,
        context: SceneContext,
    ) -> bool {
        camera.target_entity_id = None;
        if !context.is_experience() || camera.mode == CameraMode::Orbit {
            return false;
        }

        match self.get(&self.safe_preset) {
            Some(preset) if !preset.requires_bound_target => {
                apply_to(camera, preset, None);
                tracing::debug!(preset = %preset.id, "camera fell back to safe preset");
                true
            }
            Some(_) => {
                tracing::warn!(
                    preset = %self.safe_preset,
                    "safe preset requires a target, fallback skipped"
                );
                false
            }
            None => {
                tracing::warn!(preset = %self.safe_preset, "safe preset not registered");
                false
            }
        }
    }
}

/// Active character with the lowest id
pub fn find_player(entities: &EntityManager) -> Option<EntityId> {
    entities
        .get_entities_with_components(&[CharacterComponent::TYPE])
        .into_iter()
        .find(|id| entities.get_entity(*id).map(|e| e.active).unwrap_or(false))
}

fn apply_to(camera: &mut CameraComponent, preset: &CameraPreset, target: Option<EntityId>) {
    strategy_for(camera.last_mode.unwrap_or(camera.mode)).exit(camera);

    camera.mode = preset.mode;
    preset.snapshot.apply(camera);
    camera.active_preset = Some(preset.id.clone());
    camera.push_preset_history(&preset.id);
    if let Some(target) = target {
        camera.target_entity_id = Some(target);
        camera.character_id = Some(target);
    }

    strategy_for(preset.mode).enter(camera);
    camera.last_mode = Some(preset.mode);
}

fn default_presets() -> Vec<CameraPreset> {
    vec![
        CameraPreset::new(GOD_VIEW_PRESET, CameraMode::Isometric).with_snapshot(PresetSnapshot {
            distance: Some(20.0),
            fov: Some(50.0),
            smooth_speed: Some(6.0),
            pivot_offset: Some(Vec3::ZERO),
            ..Default::default()
        }),
        CameraPreset::new(FIRST_PERSON_PRESET, CameraMode::FirstPerson)
            .with_snapshot(PresetSnapshot {
                fov: Some(75.0),
                ..Default::default()
            })
            .requiring_target(),
        CameraPreset::new(THIRD_PERSON_PRESET, CameraMode::ThirdPerson)
            .with_snapshot(PresetSnapshot {
                pitch: Some(15.0),
                distance: Some(6.0),
                fov: Some(60.0),
                smooth_speed: Some(8.0),
                ..Default::default()
            })
            .requiring_target(),
        CameraPreset::new(SIDE_SCROLL_PRESET, CameraMode::Sidescroll)
            .with_snapshot(PresetSnapshot {
                distance: Some(15.0),
                fov: Some(50.0),
                pivot_offset: Some(Vec3::new(0.0, 1.5, 0.0)),
                ..Default::default()
            })
            .requiring_target(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_camera() -> (EntityManager, EntityId) {
        let mut entities = EntityManager::new();
        let camera = entities.create_entity("Camera", None);
        entities.add_component(camera, CameraComponent::new(CameraMode::Orbit));
        (entities, camera)
    }

    #[test]
    fn test_builtin_catalog() {
        let presets = CameraPresetManager::new();
        let ids: Vec<&str> = presets.ids().collect();
        assert_eq!(
            ids,
            [GOD_VIEW_PRESET, FIRST_PERSON_PRESET, THIRD_PERSON_PRESET, SIDE_SCROLL_PRESET]
        );
        assert!(default_presets().iter().all(|p| p.mode() != CameraMode::Orbit));
        assert_eq!(presets.safe_preset(), GOD_VIEW_PRESET);
    }

    #[test]
    fn test_orbit_rejected() {
        let mut presets = CameraPresetManager::new();
        let err = presets
            .register(CameraPreset::new("editor", CameraMode::Orbit))
            .unwrap_err();
        assert_eq!(err.code(), "ORBIT_PRESET");
        let duplicate = CameraPreset::new(GOD_VIEW_PRESET, CameraMode::Isometric);
        assert_eq!(presets.register(duplicate), Ok(false));
        assert_eq!(presets.ids().count(), 4);
    }

    #[test]
    fn test_rejected_while_editing() {
        let presets = CameraPresetManager::new();
        let (mut entities, camera) = scene_with_camera();
        let err = presets
            .apply_preset(&mut entities, camera, GOD_VIEW_PRESET, SceneContext::Editing)
            .unwrap_err();
        assert_eq!(err, PresetError::EditingContext);
    }

    #[test]
    fn test_unknown_preset_and_camera() {
        let presets = CameraPresetManager::new();
        let (mut entities, camera) = scene_with_camera();
        let err = presets
            .apply_preset(&mut entities, camera, "cinematic", SceneContext::Experience)
            .unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_PRESET");

        let err = presets
            .apply_preset(&mut entities, EntityId(999), GOD_VIEW_PRESET, SceneContext::Experience)
            .unwrap_err();
        assert_eq!(err.code(), "CAMERA_NOT_FOUND");
    }

    #[test]
    fn test_third_person_without_player() {
        let presets = CameraPresetManager::new();
        let (mut entities, camera) = scene_with_camera();
        let err = presets
            .apply_preset(&mut entities, camera, THIRD_PERSON_PRESET, SceneContext::Experience)
            .unwrap_err();
        assert_eq!(err.code(), "NO_TARGET_ENTITY");
        let cam = entities.get_component::<CameraComponent>(camera).unwrap();
        assert_eq!(cam.mode, CameraMode::Orbit);
        assert!(cam.active_preset.is_none());
    }

    #[test]
    fn test_apply_binds_lowest_character() {
        let presets = CameraPresetManager::new();
        let (mut entities, camera) = scene_with_camera();
        let first = entities.create_entity("Hero", None);
        let second = entities.create_entity("Sidekick", None);
        entities.add_component(second, CharacterComponent::default());
        entities.add_component(first, CharacterComponent::default());

        presets
            .apply_preset(&mut entities, camera, THIRD_PERSON_PRESET, SceneContext::Experience)
            .unwrap();
        let cam = entities.get_component::<CameraComponent>(camera).unwrap();
        assert_eq!(cam.mode, CameraMode::ThirdPerson);
        assert_eq!(cam.target_entity_id, Some(first));
        assert_eq!(cam.character_id, Some(first));
        assert_eq!(cam.distance, 6.0);
        assert_eq!(cam.last_mode, Some(CameraMode::ThirdPerson));
        assert_eq!(cam.preset_history().collect::<Vec<_>>(), vec![THIRD_PERSON_PRESET]);
    }

    #[test]
    fn test_fallback() {
        let presets = CameraPresetManager::new();

        let mut orbit = CameraComponent::new(CameraMode::Orbit).with_target(EntityId(3));
        assert!(!presets.fallback_to_safe_preset(&mut orbit, SceneContext::Experience));
        assert_eq!(orbit.mode, CameraMode::Orbit);
        assert!(orbit.target_entity_id.is_none());

        let mut editing = CameraComponent::new(CameraMode::ThirdPerson).with_target(EntityId(3));
        assert!(!presets.fallback_to_safe_preset(&mut editing, SceneContext::Editing));
        assert_eq!(editing.mode, CameraMode::ThirdPerson);

        let mut tracking = CameraComponent::new(CameraMode::ThirdPerson).with_target(EntityId(3));
        tracking.last_mode = Some(CameraMode::ThirdPerson);
        assert!(presets.fallback_to_safe_preset(&mut tracking, SceneContext::Experience));
        assert_eq!(tracking.mode, CameraMode::Isometric);
        assert!(tracking.target_entity_id.is_none());
        assert_eq!(tracking.active_preset.as_deref(), Some(GOD_VIEW_PRESET));
    }
}

//! Camera component and mode enum

use super::CameraPose;
use crate::ecs::{Component, ComponentType, EntityId, EntityIdMap};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Number of preset ids remembered per camera
pub const PRESET_HISTORY_LEN: usize = 5;

/// Camera viewing mode. Exactly one is active per camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Editor orbit around a pivot
    #[default]
    Orbit,
    FirstPerson,
    ThirdPerson,
    /// Fixed 45 degree pitch
    Isometric,
    /// 2.5D side view
    Sidescroll,
}

impl CameraMode {
    /// All modes
    pub const ALL: [CameraMode; 5] = [
        CameraMode::Orbit,
        CameraMode::FirstPerson,
        CameraMode::ThirdPerson,
        CameraMode::Isometric,
        CameraMode::Sidescroll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::Orbit => "orbit",
            CameraMode::FirstPerson => "first_person",
            CameraMode::ThirdPerson => "third_person",
            CameraMode::Isometric => "isometric",
            CameraMode::Sidescroll => "sidescroll",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-camera state
///
/// The target is stored as an id and re-resolved every tick, so a destroyed
/// target shows up as a failed lookup rather than a dangling reference.
/// The current pose and the last-seen mode are runtime state owned by the
/// camera system and are not serialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraComponent {
    pub mode: CameraMode,
    /// Entity the camera looks at or follows
    pub target_entity_id: Option<EntityId>,
    /// Character driven by movement actions
    pub character_id: Option<EntityId>,
    /// Degrees above the horizon
    pub pitch: f32,
    /// Degrees about +Y, kept in `[-180, 180)`
    pub yaw: f32,
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Interpolation rate per second; higher follows tighter
    pub smooth_speed: f32,
    /// Manual pan offset added to the pivot
    pub pivot_offset: Vec3,
    /// Isometric only: report rotation straight from yaw
    pub iso_lock_axis: bool,
    pub active_preset: Option<String>,
    preset_history: VecDeque<String>,
    #[serde(skip)]
    pub(crate) last_mode: Option<CameraMode>,
    #[serde(skip)]
    pub(crate) current: Option<CameraPose>,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            mode: CameraMode::Orbit,
            target_entity_id: None,
            character_id: None,
            pitch: 30.0,
            yaw: 0.0,
            distance: 10.0,
            fov: 60.0,
            smooth_speed: 8.0,
            pivot_offset: Vec3::ZERO,
            iso_lock_axis: false,
            active_preset: None,
            preset_history: VecDeque::with_capacity(PRESET_HISTORY_LEN),
            last_mode: None,
            current: None,
        }
    }
}

impl Component for CameraComponent {
    const TYPE: ComponentType = "Camera";

    fn remap_entities(&mut self, map: &EntityIdMap) {
        let remap = |id: EntityId| map.get(&id).copied().unwrap_or(id);
        self.target_entity_id = self.target_entity_id.map(remap);
        self.character_id = self.character_id.map(remap);
    }
}

impl CameraComponent {
    /// Create a camera in a mode
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set the tracked target
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target_entity_id = Some(target);
        self
    }

    /// Set orbit angles and distance
    pub fn with_orbit(mut self, pitch: f32, yaw: f32, distance: f32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self.distance = distance;
        self
    }

    /// Pose applied on the most recent tick
    pub fn current_pose(&self) -> Option<&CameraPose> {
        self.current.as_ref()
    }

    /// Recently applied presets, oldest first
    pub fn preset_history(&self) -> impl Iterator<Item = &str> {
        self.preset_history.iter().map(String::as_str)
    }

    pub(crate) fn push_preset_history(&mut self, id: &str) {
        while self.preset_history.len() >= PRESET_HISTORY_LEN {
            self.preset_history.pop_front();
        }
        self.preset_history.push_back(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut camera = CameraComponent::default();
        for i in 0..8 {
            camera.push_preset_history(&format!("p{i}"));
        }
        let history: Vec<&str> = camera.preset_history().collect();
        assert_eq!(history, vec!["p3", "p4", "p5", "p6", "p7"]);
    }

    #[test]
    fn test_runtime_state_not_serialized() {
        let mut camera = CameraComponent::new(CameraMode::ThirdPerson).with_target(EntityId(4));
        camera.last_mode = Some(CameraMode::ThirdPerson);
        camera.push_preset_history("third_person");

        let json = serde_json::to_value(&camera).unwrap();
        assert_eq!(json["mode"], "third_person");
        assert_eq!(json["target_entity_id"], 4);
        assert!(json.get("last_mode").is_none());
        assert!(json.get("current").is_none());

        let back: CameraComponent = serde_json::from_value(json).unwrap();
        assert_eq!(back.mode, CameraMode::ThirdPerson);
        assert!(back.last_mode.is_none());
        assert_eq!(back.preset_history().count(), 1);
    }
}

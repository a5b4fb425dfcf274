//! Scene configuration
//!
//! Every camera tuning constant lives in [`CameraSettings`] so hosts can
//! adjust feel from a TOML file without touching code:
//!
//! ```toml
//! context = "experience"
//!
//! [camera]
//! rotate_sensitivity = 0.3
//! max_distance = 60.0
//! ```

use crate::integration::SceneContext;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level scene configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Initial context
    #[serde(default)]
    pub context: SceneContext,
    /// Camera tuning
    #[serde(default)]
    pub camera: CameraSettings,
}

impl SceneConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Camera tuning constants
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Degrees of yaw/pitch per pixel of pointer motion
    pub rotate_sensitivity: f32,
    /// World units of pan per pixel at distance 1
    pub pan_speed: f32,
    /// Distance change per wheel unit
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Squared position error above which catch-up boosts smoothing
    pub catch_up_threshold: f32,
    /// How fast catch-up saturates once over the threshold
    pub catch_up_gain: f32,
    /// Isometric free-roam pan speed (units per second)
    pub free_roam_speed: f32,
    /// Preset forced when a tracked target disappears
    pub safe_preset: String,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.25,
            pan_speed: 0.002,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 100.0,
            min_pitch: -89.0,
            max_pitch: 89.0,
            catch_up_threshold: 0.25,
            catch_up_gain: 0.5,
            free_roam_speed: 10.0,
            safe_preset: crate::camera::GOD_VIEW_PRESET.to_string(),
        }
    }
}

impl CameraSettings {
    /// Clamp a pitch angle to the configured range
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(self.min_pitch, self.max_pitch)
    }

    /// Clamp a distance to the configured range
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml() {
        let config = SceneConfig::from_toml_str(
            r#"
            context = "experience"

            [camera]
            max_distance = 42.0
            "#,
        )
        .unwrap();
        assert_eq!(config.context, SceneContext::Experience);
        assert_eq!(config.camera.max_distance, 42.0);
        assert_eq!(config.camera.min_distance, 1.0);
        assert_eq!(config.camera.safe_preset, "god_view");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SceneConfig::default();
        config.camera.rotate_sensitivity = 0.5;
        let text = config.to_toml_string().unwrap();
        assert_eq!(SceneConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_toml() {
        assert!(SceneConfig::from_toml_str("context = 3").is_err());
    }

    #[test]
    fn test_clamps() {
        let settings = CameraSettings::default();
        assert_eq!(settings.clamp_pitch(120.0), 89.0);
        assert_eq!(settings.clamp_distance(0.1), 1.0);
    }
}

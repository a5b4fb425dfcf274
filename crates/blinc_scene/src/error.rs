//! Error types for blinc_scene
//!
//! Not-found conditions are not errors here: lookups on unknown entity ids
//! return `false` / `None`. These enums cover failures a caller has to act on.

use thiserror::Error;

/// Errors raised while loading configuration or scene snapshots, or
/// surfaced from preset application
#[derive(Error, Debug)]
pub enum SceneError {
    /// Snapshot or component JSON could not be parsed
    #[error("Scene serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration TOML could not be parsed
    #[error("Config parse failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("Config write failed: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A camera preset could not be applied
    #[error(transparent)]
    Preset(#[from] PresetError),
}

/// Structured failure of a camera preset operation.
///
/// Each variant maps to a stable [`code`](PresetError::code) that UI layers
/// can switch on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// Presets only apply while running the experience
    #[error("Camera presets are unavailable while editing")]
    EditingContext,

    /// No preset registered under this id
    #[error("Unknown camera preset '{0}'")]
    UnknownPreset(String),

    /// The preset needs a controllable target and none exists
    #[error("Preset '{0}' requires a target entity but none is available")]
    NoTargetEntity(String),

    /// The camera entity does not exist or has no camera component
    #[error("Camera entity {0} not found")]
    CameraNotFound(u64),

    /// Orbit is the editing camera and cannot be packaged as a preset
    #[error("Orbit mode cannot be registered as a preset ('{0}')")]
    OrbitPreset(String),
}

impl PresetError {
    /// Stable error code for UI feedback
    pub fn code(&self) -> &'static str {
        match self {
            PresetError::EditingContext => "EDITING_CONTEXT",
            PresetError::UnknownPreset(_) => "UNKNOWN_PRESET",
            PresetError::NoTargetEntity(_) => "NO_TARGET_ENTITY",
            PresetError::CameraNotFound(_) => "CAMERA_NOT_FOUND",
            PresetError::OrbitPreset(_) => "ORBIT_PRESET",
        }
    }
}

/// Result type for blinc_scene operations
pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_error_codes() {
        assert_eq!(PresetError::EditingContext.code(), "EDITING_CONTEXT");
        assert_eq!(
            PresetError::NoTargetEntity("third_person".into()).code(),
            "NO_TARGET_ENTITY"
        );
        assert_eq!(PresetError::UnknownPreset("x".into()).code(), "UNKNOWN_PRESET");
    }

    #[test]
    fn test_scene_error_from_json() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let scene_err: SceneError = err.into();
        assert!(scene_err.to_string().starts_with("Scene serialization failed"));
    }
}

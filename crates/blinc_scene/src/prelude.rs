//! Prelude module for common imports
//!
//! ```rust,ignore
//! use blinc_scene::prelude::*;
//! ```

// ECS
pub use crate::ecs::{
    Component, ComponentType, Entity, EntityId, EntityManager, SceneSnapshot, Socket, System,
    SystemContext, SystemManager,
};

// Components
pub use crate::scene::{CharacterComponent, TransformComponent};

// Systems
pub use crate::systems::HierarchySystem;

// Camera
pub use crate::camera::{
    CameraComponent, CameraMode, CameraPose, CameraPreset, CameraPresetManager, CameraSystem,
    PresetSnapshot,
};

// Integration
pub use crate::integration::{
    actions, InputSource, InputState, MouseButton, PhysicsBridge, RenderCamera, RigidBodyState,
    SceneContext, SceneServices,
};

// Math
pub use crate::math::{Vec2, Vec3};

// Runtime
pub use crate::config::{CameraSettings, SceneConfig};
pub use crate::error::{PresetError, SceneError};
pub use crate::runtime::Scene;

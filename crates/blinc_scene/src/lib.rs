//! # Blinc Scene
//!
//! ECS runtime for a real-time 3D scene editor.
//!
//! This crate provides:
//! - **ECS** with an indexed component store, parent/child hierarchy and
//!   named sockets
//! - **Systems** run in priority order with edge-triggered lifecycle
//!   notifications
//! - **Hierarchy pass** computing world transforms through parents and sockets
//! - **Cameras** with five modes, pose smoothing and named presets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blinc_scene::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig::default(), SceneServices::default());
//! let camera = scene.create_entity("Camera");
//! scene.add_component(camera, TransformComponent::default());
//! scene.add_component(camera, CameraComponent::new(CameraMode::Orbit));
//!
//! loop {
//!     scene.tick(1.0 / 60.0);
//! }
//! ```

// Entity Component System
pub mod ecs;

// Built-in components
pub mod scene;

// Built-in systems
pub mod systems;

// Camera modes, presets and the camera system
pub mod camera;

// Input, physics and render contracts
pub mod integration;

// Math utilities
pub mod math;

pub mod config;
pub mod error;
pub mod runtime;

// Prelude for common imports
pub mod prelude;

pub use config::{CameraSettings, SceneConfig};
pub use ecs::{Component, EntityId, EntityManager, System, SystemContext, SystemManager};
pub use error::{PresetError, Result, SceneError};
pub use runtime::Scene;

//! External collaborators
//!
//! The scene talks to input, physics and rendering only through the narrow
//! traits in this module. Hosts construct a [`SceneServices`] and hand it to
//! [`Scene::new`](crate::Scene::new); nothing here is global.

mod input;
mod physics;
mod render;

pub use input::{actions, InputSource, InputState, MouseButton, PAN_MODIFIER_KEY};
pub use physics::{PhysicsBridge, RigidBodyState};
pub use render::RenderCamera;

use serde::{Deserialize, Serialize};

/// Whether the scene is being authored or played
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneContext {
    /// Editor authoring; presets and fallback are disabled
    #[default]
    Editing,
    /// Running experience
    Experience,
}

impl SceneContext {
    /// Check if this is the running experience
    pub fn is_experience(&self) -> bool {
        matches!(self, SceneContext::Experience)
    }
}

/// Injected collaborators shared by all systems
pub struct SceneServices {
    /// Editing or experience
    pub context: SceneContext,
    /// Input query
    pub input: Box<dyn InputSource>,
    /// Physics bridge, when a physics engine is present
    pub physics: Option<Box<dyn PhysicsBridge>>,
}

impl Default for SceneServices {
    fn default() -> Self {
        Self::new(SceneContext::Editing, Box::new(InputState::new()))
    }
}

impl SceneServices {
    /// Create services without physics
    pub fn new(context: SceneContext, input: Box<dyn InputSource>) -> Self {
        Self {
            context,
            input,
            physics: None,
        }
    }

    /// Attach a physics bridge
    pub fn with_physics(mut self, physics: Box<dyn PhysicsBridge>) -> Self {
        self.physics = Some(physics);
        self
    }
}

impl std::fmt::Debug for SceneServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneServices")
            .field("context", &self.context)
            .field("physics", &self.physics.is_some())
            .finish()
    }
}

use crate::ecs::{Component, ComponentType};
use serde::{Deserialize, Serialize};

/// Marks an entity as a player-controllable character
///
/// Camera presets that need a target bind to the character with the lowest id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterComponent {
    /// Horizontal speed in units per second
    pub move_speed: f32,
}

impl Default for CharacterComponent {
    fn default() -> Self {
        Self { move_speed: 5.0 }
    }
}

impl Component for CharacterComponent {
    const TYPE: ComponentType = "Character";
}

impl CharacterComponent {
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }
}

//! Plain-data scene snapshots
//!
//! A snapshot lists entities parents-first (depth-first from each root), with
//! components sorted by type tag and sockets sorted by name, so serializing
//! the same scene twice yields identical output.

use super::component::SerializedComponent;
use super::entity::{EntityId, Socket};
use serde::{Deserialize, Serialize};

/// Serialized entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedEntity {
    /// Stable id
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Active flag
    #[serde(default = "default_active")]
    pub active: bool,
    /// Attached components
    #[serde(default)]
    pub components: Vec<SerializedComponent>,
    /// Sockets owned by this entity (occupants are implied by children)
    #[serde(default)]
    pub sockets: Vec<Socket>,
    /// Parent id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    /// Socket occupied on the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_name: Option<String>,
}

fn default_active() -> bool {
    true
}

/// A complete serialized scene
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Entities, parents before children
    pub entities: Vec<SerializedEntity>,
}

fn default_version() -> u32 {
    1
}

impl SceneSnapshot {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

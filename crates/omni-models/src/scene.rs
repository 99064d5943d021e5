//! Scene graph and shot models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Derived world model for a generation request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneGraph {
    /// One-line scene summary (the normalized prompt).
    pub summary: String,
    /// Entities seeded from the prompt, in prompt order.
    pub entities: Vec<SceneEntity>,
    pub mood: String,
    pub lighting: String,
    /// Scene gravity vector (x, y, z) in m/s².
    pub gravity: [f64; 3],
}

/// A single entity derived from the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneEntity {
    /// Stable entity identifier ("entity_1", "entity_2", ...).
    pub id: String,
    pub label: String,
}

/// Camera treatment for a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraKind {
    #[default]
    Static,
    Pan,
    Zoom,
}

impl CameraKind {
    /// Get the camera kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraKind::Static => "static",
            CameraKind::Pan => "pan",
            CameraKind::Zoom => "zoom",
        }
    }
}

/// Dialogue window absorbed by a shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DialogueWindow {
    pub start_sec: f64,
    /// Capped to the owning shot's duration.
    pub end_sec: f64,
    pub emotion: String,
}

/// A contiguous time segment of the output video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Shot {
    /// Stable shot identifier ("shot_1", "shot_2").
    pub id: String,
    pub description: String,
    pub duration_sec: f64,
    pub camera: CameraKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue_window: Option<DialogueWindow>,
}

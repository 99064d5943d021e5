//! Storyboard assembly models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::CameraKind;

/// Transition into a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    ColdOpen,
    Cut,
    GentleDissolve,
}

/// Fixed camera movement for a shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CameraPath {
    pub kind: CameraKind,
    /// Normalized camera position at shot start.
    pub from: [f64; 3],
    /// Normalized camera position at shot end.
    pub to: [f64; 3],
    /// Field of view in degrees.
    pub fov: u32,
}

impl CameraPath {
    /// Fixed path table keyed by camera kind.
    pub fn for_camera(kind: CameraKind) -> Self {
        match kind {
            CameraKind::Pan => Self {
                kind,
                from: [-0.1, 0.0, 0.9],
                to: [0.1, 0.0, 0.9],
                fov: 46,
            },
            CameraKind::Zoom => Self {
                kind,
                from: [0.0, 0.0, 1.1],
                to: [0.0, 0.0, 0.85],
                fov: 40,
            },
            CameraKind::Static => Self {
                kind,
                from: [0.0, 0.0, 1.0],
                to: [0.0, 0.0, 1.0],
                fov: 44,
            },
        }
    }
}

/// Keyframe reference attached to a storyboard entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryboardKeyframe {
    pub index: usize,
    pub timestamp_sec: f64,
    pub file_path: String,
}

/// Presentation assembly for a single shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoryboardShot {
    pub shot_id: String,
    pub duration_sec: f64,
    pub description: String,
    pub transition_in: Transition,
    pub camera_path: CameraPath,
    /// Keyframes belonging to this shot, sorted by planned index.
    pub keyframes: Vec<StoryboardKeyframe>,
}

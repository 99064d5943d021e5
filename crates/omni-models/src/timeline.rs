//! Physics channels, dialogue timeline and entity tracks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Inferred contact hint for a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionHint {
    #[default]
    None,
    SurfaceContact,
    FluidInteraction,
}

/// Coarse motion-field description for a shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MotionField {
    /// "linear" when no collision hint is present, else "interaction-aware".
    pub mode: String,
    /// Sum of |vx| + |vy|.
    pub intensity: f64,
}

/// Per-shot motion hint derived from text heuristics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhysicsChannel {
    pub shot_id: String,
    /// Gravity vector (x, y, z) in m/s².
    pub gravity: [f64; 3],
    /// Base velocity vector (x, y, z).
    pub velocity: [f64; 3],
    pub collision_hint: CollisionHint,
    pub motion_field: MotionField,
}

/// Mouth-shape category for a viseme window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisemeShape {
    Open,
    Closed,
}

/// A per-token lip-sync hint window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VisemeWindow {
    pub token: String,
    pub start_sec: f64,
    pub end_sec: f64,
    pub viseme: VisemeShape,
}

/// Timing of a dialogue line within its shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SegmentTiming {
    pub start_sec: f64,
    /// Never exceeds the owning shot's duration.
    pub end_sec: f64,
    pub reaction_before_sec: f64,
    pub reaction_after_sec: f64,
}

/// A dialogue line aligned to a shot's time window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DialogueSegment {
    pub line_id: String,
    pub shot_id: String,
    pub speaker: String,
    pub emotion: String,
    pub text: String,
    pub timing: SegmentTiming,
    pub viseme_hints: Vec<VisemeWindow>,
}

/// Day/night classification of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

/// Scene-wide context shared by all shots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GlobalContext {
    pub theme: String,
    pub mood: String,
    /// "reference-conditioned" when reference images were supplied,
    /// else "prompt-defined".
    pub location: String,
    pub time_of_day: TimeOfDay,
    pub duration_sec: f64,
    pub style_hints: Vec<String>,
}

/// Entity presence state within a shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntityState {
    pub shot_id: String,
    /// Synthetic normalized position (not physically simulated).
    pub position: [f64; 3],
    /// "introduce" in the entity's first shot, "continue" thereafter.
    pub state: String,
}

/// Spatial path of an entity across all shots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntityTrack {
    pub entity_id: String,
    pub label: String,
    /// One state per shot.
    pub states: Vec<EntityState>,
}

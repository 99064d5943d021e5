//! The exported manifest and the final result contract.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::budget::ResourceBudget;
use crate::keyframe::RenderedKeyframe;
use crate::mode::{VideoFormat, VideoMode};
use crate::optimization::OptimizationPlan;
use crate::scene::{SceneGraph, Shot};
use crate::storyboard::StoryboardShot;
use crate::timeline::{DialogueSegment, EntityTrack, GlobalContext, PhysicsChannel};

/// Durable snapshot of the full generation plan.
///
/// Always produced; the authoritative output when encoding is skipped or
/// fails.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoManifest {
    pub mode: VideoMode,
    pub format: VideoFormat,
    pub budget: ResourceBudget,
    pub context: GlobalContext,
    pub scene_graph: SceneGraph,
    pub entity_tracks: Vec<EntityTrack>,
    pub shots: Vec<Shot>,
    pub physics_channels: Vec<PhysicsChannel>,
    pub dialogue_timeline: Vec<DialogueSegment>,
    pub storyboard: Vec<StoryboardShot>,
    pub optimization: OptimizationPlan,
    pub keyframes: Vec<RenderedKeyframe>,
    pub created_at: DateTime<Utc>,
}

/// Kind of the primary output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Manifest,
    Mp4,
    Gif,
}

impl From<VideoFormat> for OutputKind {
    fn from(format: VideoFormat) -> Self {
        match format {
            VideoFormat::Mp4 => OutputKind::Mp4,
            VideoFormat::Gif => OutputKind::Gif,
        }
    }
}

/// The primary output artifact of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OutputArtifact {
    pub kind: OutputKind,
    /// Encoded artifact path on success, else the manifest path.
    pub file_path: String,
    /// Manifest path, present alongside an encoded artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
}

/// Encoder stage summary surfaced to callers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncoderReport {
    pub used: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_mb: Option<f64>,
}

/// Self-contained result returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoClipResult {
    /// Unique id for this pipeline run.
    pub id: String,
    #[serde(flatten)]
    pub plan: VideoManifest,
    pub output: OutputArtifact,
    pub encoder: EncoderReport,
}

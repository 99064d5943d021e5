//! Shared data models for the Omni video pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Generation requests and their normalization rules
//! - Scene graphs, shots and resource budgets
//! - Physics, dialogue and entity-track timelines
//! - Keyframes, storyboards and optimization plans
//! - Encode-ladder configuration and outcomes
//! - The exported manifest and the final result contract

pub mod budget;
pub mod encoding;
pub mod keyframe;
pub mod manifest;
pub mod mode;
pub mod optimization;
pub mod request;
pub mod scene;
pub mod storyboard;
pub mod timeline;

// Re-export common types
pub use budget::ResourceBudget;
pub use encoding::{EncodeOutcome, GifAttempt, Mp4Attempt};
pub use keyframe::{KeyframeSpec, MomentLabel, RenderOptions, RenderedKeyframe};
pub use manifest::{EncoderReport, OutputArtifact, OutputKind, VideoClipResult, VideoManifest};
pub use mode::{QualityProfile, VideoFormat, VideoMode};
pub use optimization::{AdaptiveTier, OptimizationPlan};
pub use request::{
    DialogueLine, GenerationRequest, ImageOptions, RawDialogueLine, RequestError, RequestResult,
    VideoRequestOptions,
};
pub use scene::{CameraKind, DialogueWindow, SceneEntity, SceneGraph, Shot};
pub use storyboard::{CameraPath, StoryboardKeyframe, StoryboardShot, Transition};
pub use timeline::{
    CollisionHint, DialogueSegment, EntityState, EntityTrack, GlobalContext, MotionField,
    PhysicsChannel, SegmentTiming, TimeOfDay, VisemeShape, VisemeWindow,
};

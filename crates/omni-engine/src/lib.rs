//! Budget-constrained video synthesis pipeline.
//!
//! Turns a free-text prompt plus size/duration/format constraints into a
//! structured scene/shot/keyframe plan and either an encoded artifact that
//! fits the caller's byte budget, or a JSON manifest describing the plan
//! when encoding is disabled, unavailable or cannot meet budget.
//!
//! The pipeline is strictly sequenced: normalize → decompose → budget →
//! {physics, dialogue, context} → keyframes → storyboard → optimization →
//! manifest export → encode → result assembly. See [`VideoEngine`].

pub mod budget;
pub mod config;
pub mod context;
pub mod dialogue;
pub mod error;
pub mod keyframes;
pub mod logging;
pub mod manifest;
pub mod physics;
pub mod pipeline;
pub mod scene;
pub mod signals;
pub mod storyboard;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use keyframes::{KeyframeCache, KeyframeRenderer, RenderedImage};
pub use logging::PipelineLogger;
pub use pipeline::{VideoEngine, VideoEngineBuilder};
pub use signals::{KeywordClassifier, TextSignalClassifier};

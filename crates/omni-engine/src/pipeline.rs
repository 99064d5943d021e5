//! The pipeline orchestrator.
//!
//! Sequences every stage for one request and assembles the result
//! contract. Collaborators (renderer, classifier, encoder) are injected
//! through [`VideoEngineBuilder`]; the keyframe cache is owned here and
//! shared across requests.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use omni_media::orchestrator::EncodeOrchestrator;
use omni_media::Encoder;
use omni_models::{
    EncodeOutcome, EncoderReport, GenerationRequest, OptimizationPlan, OutputArtifact, OutputKind,
    VideoClipResult, VideoManifest, VideoRequestOptions,
};

use crate::budget::plan_budget;
use crate::config::EngineConfig;
use crate::context::{build_entity_tracks, build_global_context};
use crate::dialogue::align_dialogue_to_shots;
use crate::error::EngineResult;
use crate::keyframes::{generate_keyframes, plan_keyframes, KeyframeCache, KeyframeRenderer};
use crate::logging::PipelineLogger;
use crate::manifest::ManifestExporter;
use crate::physics::build_physics_channels;
use crate::scene::decompose;
use crate::signals::{KeywordClassifier, TextSignalClassifier};
use crate::storyboard::build_storyboard;

/// Builder for [`VideoEngine`].
pub struct VideoEngineBuilder {
    config: EngineConfig,
    classifier: Arc<dyn TextSignalClassifier>,
    renderer: Option<Arc<dyn KeyframeRenderer>>,
    encoder: Option<Arc<dyn Encoder>>,
}

impl VideoEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the keyframe renderer collaborator.
    pub fn renderer(mut self, renderer: Arc<dyn KeyframeRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Replace the keyword classifier.
    pub fn classifier(mut self, classifier: Arc<dyn TextSignalClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the subprocess encoder (used by tests).
    pub fn encoder(mut self, encoder: Arc<dyn Encoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Build the engine.
    pub fn build(self) -> VideoEngine {
        let settings = self.config.encoder_settings();
        let orchestrator = match self.encoder {
            Some(encoder) => EncodeOrchestrator::new(settings, encoder),
            None => EncodeOrchestrator::subprocess(settings),
        };
        let exporter = ManifestExporter::new(self.config.export_dir.clone());
        let cache = Mutex::new(KeyframeCache::new(self.config.keyframe_cache_capacity));

        VideoEngine {
            classifier: self.classifier,
            renderer: self.renderer,
            cache,
            orchestrator,
            exporter,
        }
    }
}

/// The budget-constrained video synthesis pipeline.
pub struct VideoEngine {
    classifier: Arc<dyn TextSignalClassifier>,
    renderer: Option<Arc<dyn KeyframeRenderer>>,
    cache: Mutex<KeyframeCache>,
    orchestrator: EncodeOrchestrator,
    exporter: ManifestExporter,
}

impl VideoEngine {
    /// Start building an engine with default configuration and classifier.
    pub fn builder() -> VideoEngineBuilder {
        VideoEngineBuilder {
            config: EngineConfig::default(),
            classifier: Arc::new(KeywordClassifier),
            renderer: None,
            encoder: None,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// Returns the assembled plan plus either the encoded artifact or the
    /// manifest as the authoritative output.
    pub async fn generate_video_clip(
        &self,
        prompt: &str,
        mode: &str,
        options: &VideoRequestOptions,
    ) -> EngineResult<VideoClipResult> {
        let request = GenerationRequest::normalize(prompt, mode, options)?;
        let request_id = format!("omni_video_{}", Uuid::new_v4().simple());
        let logger = PipelineLogger::new(&request_id);
        logger.log_stage("normalize", "request validated");

        let classifier = self.classifier.as_ref();
        let budget = plan_budget(&request, classifier);
        logger.log_stage(
            "budget",
            &format!(
                "{}x{} @{}fps for {:.2}s (est {:.3} MB, cap {} MB)",
                budget.width,
                budget.height,
                budget.fps,
                budget.duration_sec,
                budget.estimated_size_mb,
                budget.max_size_mb
            ),
        );

        let (scene_graph, shots) = decompose(&request, &budget, classifier);
        logger.log_stage("decompose", &format!("{} shots", shots.len()));

        let context = build_global_context(&request, &scene_graph, &budget, classifier);
        let entity_tracks = build_entity_tracks(&scene_graph, &shots);
        let physics_channels = build_physics_channels(&scene_graph, &shots, classifier);
        let dialogue_timeline = align_dialogue_to_shots(&request.dialogue, &shots);

        let plan = plan_keyframes(&request, &shots);
        let keyframes = generate_keyframes(
            self.renderer.as_ref(),
            &self.cache,
            &request,
            &budget,
            plan,
        )
        .await?;
        logger.log_stage("keyframes", &format!("{} rendered", keyframes.len()));

        let storyboard = build_storyboard(&shots, &keyframes);
        let optimization = OptimizationPlan::from_budget(&budget, request.strict_size);

        let manifest = VideoManifest {
            mode: request.mode,
            format: request.format,
            budget: budget.clone(),
            context,
            scene_graph,
            entity_tracks,
            shots,
            physics_channels,
            dialogue_timeline,
            storyboard,
            optimization,
            keyframes,
            created_at: Utc::now(),
        };

        let manifest_path = self.exporter.export(&manifest).await?;
        logger.log_stage("manifest", "plan exported");

        let outcome = self
            .orchestrator
            .maybe_encode(&request, &budget, &manifest.keyframes)
            .await?;

        let (output, encoder) = match outcome {
            EncodeOutcome::Encoded {
                file_path,
                size_mb,
                reason,
            } => {
                logger.log_stage("encode", &reason);
                (
                    OutputArtifact {
                        kind: OutputKind::from(request.format),
                        file_path,
                        manifest_path: Some(manifest_path.to_string_lossy().to_string()),
                    },
                    EncoderReport {
                        used: true,
                        reason,
                        size_mb: Some(size_mb),
                        budget_mb: Some(request.max_size_mb),
                    },
                )
            }
            EncodeOutcome::Skipped { reason } => {
                logger.log_stage("encode", &format!("skipped: {reason}"));
                (
                    OutputArtifact {
                        kind: OutputKind::Manifest,
                        file_path: manifest_path.to_string_lossy().to_string(),
                        manifest_path: None,
                    },
                    EncoderReport {
                        used: false,
                        reason,
                        size_mb: None,
                        budget_mb: None,
                    },
                )
            }
        };

        Ok(VideoClipResult {
            id: request_id,
            plan: manifest,
            output,
            encoder,
        })
    }
}

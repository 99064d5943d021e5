//! Multi-attempt encode orchestration against a byte budget.
//!
//! Encoding is off unless the request opts in or the environment flag is
//! set, and silently degrades to the manifest when the tool is missing or
//! no ladder attempt fits the budget. The transient concat script is
//! removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info, warn};

use omni_models::budget::round3;
use omni_models::encoding::{gif_ladder, mp4_ladder};
use omni_models::{EncodeOutcome, GenerationRequest, RenderedKeyframe, ResourceBudget, VideoFormat};

use crate::concat::ConcatScript;
use crate::encoder::{EncodeAttempt, Encoder, SubprocessEncoder};
use crate::error::{MediaError, MediaResult};
use crate::resolve::{is_truthy_flag, resolve_ffmpeg_binary};

/// Environment variable opting every request into encoding.
pub const ENABLE_ENCODING_ENV: &str = "OMNI_VIDEO_ENABLE_ENCODING";

/// Default per-attempt subprocess timeout in seconds.
pub const DEFAULT_ENCODE_TIMEOUT_SECS: u64 = 120;

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct EncoderSettings {
    /// Directory for output artifacts and the transient concat script.
    pub export_dir: PathBuf,
    /// Process-wide enablement from the environment.
    pub env_enabled: bool,
    /// Explicit FFmpeg binary override.
    pub ffmpeg_override: Option<PathBuf>,
    /// Per-attempt timeout; expiry advances the ladder.
    pub timeout_secs: u64,
}

impl EncoderSettings {
    /// Read enablement and binary override from the environment.
    pub fn from_env(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            env_enabled: std::env::var(ENABLE_ENCODING_ENV)
                .map(|v| is_truthy_flag(&v))
                .unwrap_or(false),
            ffmpeg_override: std::env::var(crate::resolve::FFMPEG_PATH_ENV)
                .ok()
                .map(|v| PathBuf::from(v.trim()))
                .filter(|p| !p.as_os_str().is_empty()),
            timeout_secs: DEFAULT_ENCODE_TIMEOUT_SECS,
        }
    }
}

/// Drives the encode ladder for one request at a time.
pub struct EncodeOrchestrator {
    settings: EncoderSettings,
    encoder: Arc<dyn Encoder>,
}

impl EncodeOrchestrator {
    /// Create an orchestrator over an injected encoder.
    pub fn new(settings: EncoderSettings, encoder: Arc<dyn Encoder>) -> Self {
        Self { settings, encoder }
    }

    /// Create an orchestrator backed by the resolved FFmpeg binary.
    pub fn subprocess(settings: EncoderSettings) -> Self {
        let binary = resolve_ffmpeg_binary(settings.ffmpeg_override.as_ref());
        let encoder = Arc::new(SubprocessEncoder::new(binary, settings.timeout_secs));
        Self { settings, encoder }
    }

    /// Encode the keyframe sequence if enabled and possible.
    ///
    /// Returns `Skipped` for every designed degraded path; an `Err` means
    /// an unexpected subprocess or filesystem failure and is fatal for
    /// this pass.
    pub async fn maybe_encode(
        &self,
        request: &GenerationRequest,
        budget: &ResourceBudget,
        keyframes: &[RenderedKeyframe],
    ) -> MediaResult<EncodeOutcome> {
        if !(request.enable_encoding || self.settings.env_enabled) {
            return Ok(EncodeOutcome::Skipped {
                reason: "encoding-disabled".to_string(),
            });
        }

        if !self.encoder.probe().await {
            return Ok(EncodeOutcome::Skipped {
                reason: "ffmpeg-unavailable".to_string(),
            });
        }

        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let concat_path = self
            .settings
            .export_dir
            .join(format!("omni_video_concat_{timestamp}.txt"));
        let output_path = self
            .settings
            .export_dir
            .join(format!("omni_video_{timestamp}.{}", request.format.extension()));

        let script = ConcatScript::build(keyframes, budget.duration_sec)?;
        script.write_to(&concat_path).await?;
        debug!(
            frames = script.frame_count(),
            concat = %concat_path.display(),
            "concat script written"
        );

        let result = self
            .run_ladder(request, budget, &concat_path, &output_path)
            .await;

        // The concat script never outlives the call, success or not
        let _ = fs::remove_file(&concat_path).await;

        result
    }

    /// Evaluate the ladder candidates in order, accepting the first whose
    /// measured output fits the budget.
    async fn run_ladder(
        &self,
        request: &GenerationRequest,
        budget: &ResourceBudget,
        concat_path: &Path,
        output_path: &Path,
    ) -> MediaResult<EncodeOutcome> {
        let ladder: Vec<EncodeAttempt> = match request.format {
            VideoFormat::Gif => gif_ladder(budget).into_iter().map(EncodeAttempt::Gif).collect(),
            VideoFormat::Mp4 => mp4_ladder(budget).into_iter().map(EncodeAttempt::Mp4).collect(),
        };

        let mut last_oversize_mb: Option<f64> = None;

        for attempt in &ladder {
            // No stale partial output may survive between attempts
            remove_if_exists(output_path).await;

            match self.encoder.encode(attempt, concat_path, output_path).await {
                Ok(()) => {
                    let size_bytes = fs::metadata(output_path).await?.len();
                    let size_mb = round3(size_bytes as f64 / (1024.0 * 1024.0));
                    if size_mb <= request.max_size_mb {
                        info!(
                            attempt = %attempt.reason(),
                            size_mb,
                            budget_mb = request.max_size_mb,
                            "encode attempt accepted"
                        );
                        return Ok(EncodeOutcome::Encoded {
                            file_path: output_path.to_string_lossy().to_string(),
                            size_mb,
                            reason: attempt.reason(),
                        });
                    }
                    debug!(
                        attempt = %attempt.reason(),
                        size_mb,
                        budget_mb = request.max_size_mb,
                        "encode attempt over budget, continuing ladder"
                    );
                    last_oversize_mb = Some(size_mb);
                }
                Err(MediaError::CodecUnavailable(detail)) => {
                    debug!(attempt = %attempt.reason(), detail = %detail, "codec unavailable, skipping");
                }
                Err(MediaError::Timeout(secs)) => {
                    warn!(attempt = %attempt.reason(), secs, "encode attempt timed out, skipping");
                }
                Err(err) => {
                    remove_if_exists(output_path).await;
                    return Err(err);
                }
            }
        }

        remove_if_exists(output_path).await;

        let reason = match last_oversize_mb {
            Some(size_mb) => format!(
                "encoded-size-exceeds-budget:{size_mb}MB>{}MB",
                request.max_size_mb
            ),
            None => "no-encode-attempt-succeeded".to_string(),
        };
        Ok(EncodeOutcome::Skipped { reason })
    }
}

async fn remove_if_exists(path: &Path) {
    let _ = fs::remove_file(path).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use omni_models::{KeyframeSpec, MomentLabel, VideoRequestOptions};
    use tempfile::TempDir;

    /// One scripted response per encode call.
    enum MockStep {
        /// Write an output file of this many bytes.
        Produce(usize),
        CodecUnavailable,
        Timeout,
        Fatal,
    }

    struct MockEncoder {
        available: bool,
        steps: Mutex<VecDeque<MockStep>>,
        calls: AtomicUsize,
    }

    impl MockEncoder {
        fn new(available: bool, steps: Vec<MockStep>) -> Self {
            Self {
                available,
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Encoder for MockEncoder {
        async fn probe(&self) -> bool {
            self.available
        }

        async fn encode(
            &self,
            _attempt: &EncodeAttempt,
            concat_script: &Path,
            output: &Path,
        ) -> MediaResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(concat_script.exists(), "concat script must exist during encode");
            let step = self.steps.lock().unwrap().pop_front().expect("unscripted call");
            match step {
                MockStep::Produce(bytes) => {
                    std::fs::write(output, vec![0u8; bytes]).unwrap();
                    Ok(())
                }
                MockStep::CodecUnavailable => {
                    Err(MediaError::CodecUnavailable("Unknown encoder".to_string()))
                }
                MockStep::Timeout => Err(MediaError::Timeout(1)),
                MockStep::Fatal => Err(MediaError::ffmpeg_failed("boom", None, Some(1))),
            }
        }
    }

    fn request(enable_encoding: bool, max_size_mb: f64) -> GenerationRequest {
        let options = VideoRequestOptions {
            enable_encoding: Some(enable_encoding),
            max_size_mb: Some(max_size_mb),
            ..Default::default()
        };
        GenerationRequest::normalize("a ship crosses a stormy sea", "balanced", &options).unwrap()
    }

    fn budget() -> ResourceBudget {
        ResourceBudget {
            max_size_mb: 2.0,
            width: 640,
            height: 360,
            fps: 12,
            duration_sec: 2.0,
            estimated_size_mb: 0.2,
            motion_complexity: 1.1,
        }
    }

    fn keyframes() -> Vec<RenderedKeyframe> {
        (0..3)
            .map(|index| RenderedKeyframe {
                spec: KeyframeSpec {
                    shot_id: "shot_1".to_string(),
                    index,
                    label: MomentLabel::ALL[index],
                    timestamp_sec: index as f64,
                    prompt: "p".to_string(),
                },
                file_path: format!("/tmp/frame_{index}.png"),
                cached: false,
            })
            .collect()
    }

    fn orchestrator(dir: &TempDir, encoder: Arc<MockEncoder>) -> EncodeOrchestrator {
        let settings = EncoderSettings {
            export_dir: dir.path().to_path_buf(),
            env_enabled: false,
            ffmpeg_override: None,
            timeout_secs: 5,
        };
        EncodeOrchestrator::new(settings, encoder)
    }

    fn leftover_files(dir: &TempDir) -> Vec<String> {
        std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_disabled_skips_without_probing() {
        let dir = TempDir::new().unwrap();
        let encoder = Arc::new(MockEncoder::new(true, vec![]));
        let orchestrator = orchestrator(&dir, encoder.clone());

        let outcome = orchestrator
            .maybe_encode(&request(false, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        assert!(!outcome.is_encoded());
        assert_eq!(outcome.reason(), "encoding-disabled");
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
        assert!(leftover_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_tool_skips() {
        let dir = TempDir::new().unwrap();
        let encoder = Arc::new(MockEncoder::new(false, vec![]));
        let orchestrator = orchestrator(&dir, encoder);

        let outcome = orchestrator
            .maybe_encode(&request(true, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        assert_eq!(outcome.reason(), "ffmpeg-unavailable");
        assert!(leftover_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_second_attempt_fits_budget() {
        let dir = TempDir::new().unwrap();
        let over = 3 * 1024 * 1024;
        let under = 1024 * 1024;
        let encoder = Arc::new(MockEncoder::new(
            true,
            vec![MockStep::Produce(over), MockStep::Produce(under)],
        ));
        let orchestrator = orchestrator(&dir, encoder.clone());

        let outcome = orchestrator
            .maybe_encode(&request(true, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        match outcome {
            EncodeOutcome::Encoded { file_path, size_mb, reason } => {
                assert!(size_mb <= 2.0);
                assert!(std::path::Path::new(&file_path).exists());
                // Reason names the winning candidate, not the first
                assert!(reason.contains("crf32"), "unexpected reason: {reason}");
            }
            other => panic!("expected encoded outcome, got {other:?}"),
        }
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);
        // Concat script cleaned up, only the artifact remains
        let files = leftover_files(&dir);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_all_attempts_over_budget() {
        let dir = TempDir::new().unwrap();
        let over = 5 * 1024 * 1024;
        let encoder = Arc::new(MockEncoder::new(
            true,
            vec![
                MockStep::Produce(over),
                MockStep::Produce(over),
                MockStep::Produce(over),
            ],
        ));
        let orchestrator = orchestrator(&dir, encoder);

        let outcome = orchestrator
            .maybe_encode(&request(true, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        assert!(!outcome.is_encoded());
        assert!(outcome.reason().starts_with("encoded-size-exceeds-budget:"));
        // No partial artifact or concat script survives
        assert!(leftover_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_codec_unavailable_advances_ladder() {
        let dir = TempDir::new().unwrap();
        let encoder = Arc::new(MockEncoder::new(
            true,
            vec![MockStep::CodecUnavailable, MockStep::Produce(1024)],
        ));
        let orchestrator = orchestrator(&dir, encoder.clone());

        let outcome = orchestrator
            .maybe_encode(&request(true, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        assert!(outcome.is_encoded());
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_advances_ladder() {
        let dir = TempDir::new().unwrap();
        let encoder = Arc::new(MockEncoder::new(
            true,
            vec![MockStep::Timeout, MockStep::Produce(1024)],
        ));
        let orchestrator = orchestrator(&dir, encoder);

        let outcome = orchestrator
            .maybe_encode(&request(true, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        assert!(outcome.is_encoded());
    }

    #[tokio::test]
    async fn test_fatal_error_propagates_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let encoder = Arc::new(MockEncoder::new(true, vec![MockStep::Fatal]));
        let orchestrator = orchestrator(&dir, encoder.clone());

        let result = orchestrator
            .maybe_encode(&request(true, 2.0), &budget(), &keyframes())
            .await;

        assert!(result.is_err());
        // No further ladder attempts after an unexpected failure
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);
        // The concat script is deleted even on the error path
        assert!(leftover_files(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_env_flag_enables_encoding() {
        let dir = TempDir::new().unwrap();
        let encoder = Arc::new(MockEncoder::new(true, vec![MockStep::Produce(1024)]));
        let settings = EncoderSettings {
            export_dir: dir.path().to_path_buf(),
            env_enabled: true,
            ffmpeg_override: None,
            timeout_secs: 5,
        };
        let orchestrator = EncodeOrchestrator::new(settings, encoder);

        let outcome = orchestrator
            .maybe_encode(&request(false, 2.0), &budget(), &keyframes())
            .await
            .unwrap();

        assert!(outcome.is_encoded());
    }
}

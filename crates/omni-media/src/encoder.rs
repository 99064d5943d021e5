//! The encoder seam and its subprocess-backed implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use omni_models::{GifAttempt, Mp4Attempt};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// A single candidate configuration from either ladder.
#[derive(Debug, Clone)]
pub enum EncodeAttempt {
    Mp4(Mp4Attempt),
    Gif(GifAttempt),
}

impl EncodeAttempt {
    /// Output arguments for this candidate.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        match self {
            EncodeAttempt::Mp4(attempt) => attempt.to_ffmpeg_args(),
            EncodeAttempt::Gif(attempt) => attempt.to_ffmpeg_args(),
        }
    }

    /// Observability label identifying this candidate.
    pub fn reason(&self) -> String {
        match self {
            EncodeAttempt::Mp4(attempt) => attempt.reason(),
            EncodeAttempt::Gif(attempt) => attempt.reason(),
        }
    }
}

/// Abstraction over the external encoding tool.
///
/// The concrete implementation shells out to FFmpeg; tests substitute a
/// mock to exercise the orchestrator's ladder and cleanup logic.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Whether the encoding tool is available.
    async fn probe(&self) -> bool;

    /// Run one encode attempt, reading frames from `concat_script` and
    /// writing the artifact to `output`.
    async fn encode(
        &self,
        attempt: &EncodeAttempt,
        concat_script: &Path,
        output: &Path,
    ) -> MediaResult<()>;
}

/// [`Encoder`] backed by an FFmpeg subprocess.
#[derive(Debug, Clone)]
pub struct SubprocessEncoder {
    runner: FfmpegRunner,
}

impl SubprocessEncoder {
    /// Create an encoder invoking the given binary.
    pub fn new(binary: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        Self {
            runner: FfmpegRunner::new(binary).with_timeout(timeout_secs),
        }
    }
}

#[async_trait]
impl Encoder for SubprocessEncoder {
    async fn probe(&self) -> bool {
        self.runner.probe().await
    }

    async fn encode(
        &self,
        attempt: &EncodeAttempt,
        concat_script: &Path,
        output: &Path,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::from_concat(concat_script, output)
            .output_args(attempt.to_ffmpeg_args());
        self.runner.run(&cmd).await
    }
}

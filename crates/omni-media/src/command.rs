//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg invocations over concat-demuxer input.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Concat script path (fed through `-f concat`)
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new command reading frames from a concat script.
    pub fn from_concat(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            log_level: "error".to_string(),
        }
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Path of the output file this command writes.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-v".to_string(),
            self.log_level.clone(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            self.input.to_string_lossy().to_string(),
        ];

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

/// Runner for FFmpeg commands with a per-invocation timeout.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    binary: PathBuf,
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a runner for a resolved FFmpeg binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout_secs: None,
        }
    }

    /// Set timeout. Expiry kills the subprocess.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// The binary this runner invokes.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Probe binary availability with a `-version` invocation.
    pub async fn probe(&self) -> bool {
        let result = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        matches!(result, Ok(status) if status.success())
    }

    /// Run an FFmpeg command to completion.
    ///
    /// A non-zero exit carrying an "unknown encoder" diagnostic maps to
    /// [`MediaError::CodecUnavailable`] so the caller can advance its
    /// ladder; any other failure carries the captured stderr.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let args = cmd.build_args();
        debug!("running ffmpeg: {} {}", self.binary.display(), args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr_pipe = child.stderr.take();

        let output_future = async {
            let mut stderr = String::new();
            if let Some(mut pipe) = stderr_pipe {
                use tokio::io::AsyncReadExt;
                let _ = pipe.read_to_string(&mut stderr).await;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stderr))
        };

        let (status, stderr) = match self.timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), output_future).await {
                    Ok(result) => result?,
                    Err(_) => {
                        warn!("ffmpeg timed out after {secs}s, killing process");
                        return Err(MediaError::Timeout(secs));
                    }
                }
            }
            None => output_future.await?,
        };

        if status.success() {
            return Ok(());
        }

        if is_codec_unavailable(&stderr) {
            return Err(MediaError::CodecUnavailable(stderr.trim().to_string()));
        }

        Err(MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some(stderr),
            status.code(),
        ))
    }
}

/// Detect the diagnostics FFmpeg emits for a codec that is not compiled in.
fn is_codec_unavailable(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("unknown encoder") || lower.contains("encoder not found")
}

//! Encode-ladder configuration and outcomes.
//!
//! Each ladder is an explicit ordered list of candidate configurations;
//! the orchestrator evaluates them with a single accept/continue loop.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::budget::ResourceBudget;
use crate::mode::{MIN_DIMENSION, MIN_FPS};

/// Fraction of the theoretical budget bitrate actually targeted, leaving
/// headroom for container overhead.
pub const BITRATE_SAFETY_FACTOR: f64 = 0.85;
/// Motion complexity above which GIF palettes start smaller.
pub const HIGH_MOTION_THRESHOLD: f64 = 1.25;

/// A single MP4 encode candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Mp4Attempt {
    /// Video codec (e.g. "libx265", "libx264").
    pub codec: String,
    /// Encoder preset.
    pub preset: String,
    /// Constant Rate Factor (quality, lower is better).
    pub crf: u8,
    /// Bitrate cap in kilobits per second.
    pub bitrate_kbps: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Mp4Attempt {
    /// Convert to FFmpeg output arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-vf".to_string(),
            format!(
                "fps={},scale={}:{}:flags=lanczos,format=yuv420p",
                self.fps, self.width, self.height
            ),
            "-an".to_string(),
            "-c:v".to_string(),
            self.codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-maxrate".to_string(),
            format!("{}k", self.bitrate_kbps),
            "-bufsize".to_string(),
            format!("{}k", self.bitrate_kbps * 2),
            "-movflags".to_string(),
            "+faststart".to_string(),
        ]
    }

    /// Observability label identifying this attempt.
    pub fn reason(&self) -> String {
        format!("mp4:{}:crf{}:{}kbps", self.codec, self.crf, self.bitrate_kbps)
    }
}

/// A single GIF encode candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GifAttempt {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    /// Palette size for palettegen.
    pub max_colors: u32,
}

impl GifAttempt {
    /// Palette-generate + palette-apply filter chain for this candidate.
    pub fn filter(&self) -> String {
        format!(
            "fps={},scale={}:{}:flags=lanczos,split[s0][s1];[s0]palettegen=max_colors={}[p];[s1][p]paletteuse=dither=floyd_steinberg",
            self.fps, self.width, self.height, self.max_colors
        )
    }

    /// Convert to FFmpeg output arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        vec!["-vf".to_string(), self.filter()]
    }

    /// Observability label identifying this attempt.
    pub fn reason(&self) -> String {
        format!("gif:fps{}:colors{}", self.fps, self.max_colors)
    }
}

/// Build the ordered MP4 candidate list for a settled budget.
///
/// Primary high-efficiency codec at two quality levels, then a
/// compatibility codec as last resort. Target bitrate derives from the
/// byte budget over the clip duration, discounted by motion complexity.
pub fn mp4_ladder(budget: &ResourceBudget) -> Vec<Mp4Attempt> {
    let duration = budget.duration_sec.max(0.1);
    let motion_penalty = budget.motion_complexity.max(1.0);
    let target_kbps =
        (((budget.max_size_mb * 8192.0) / duration) * BITRATE_SAFETY_FACTOR / motion_penalty)
            .max(64.0) as u32;

    let reduced_width = scaled_floor(budget.width);
    let reduced_height = scaled_floor(budget.height);

    vec![
        Mp4Attempt {
            codec: "libx265".to_string(),
            preset: "medium".to_string(),
            crf: 28,
            bitrate_kbps: target_kbps,
            width: budget.width,
            height: budget.height,
            fps: budget.fps,
        },
        Mp4Attempt {
            codec: "libx265".to_string(),
            preset: "fast".to_string(),
            crf: 32,
            bitrate_kbps: (target_kbps * 3) / 4,
            width: reduced_width,
            height: reduced_height,
            fps: budget.fps,
        },
        Mp4Attempt {
            codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 31,
            bitrate_kbps: (target_kbps * 3) / 5,
            width: reduced_width,
            height: reduced_height,
            fps: budget.fps.saturating_sub(2).max(MIN_FPS),
        },
    ]
}

/// Build the ordered GIF candidate list for a settled budget.
///
/// High-motion scenes start from a smaller palette; later candidates drop
/// frame rate, then resolution and palette together.
pub fn gif_ladder(budget: &ResourceBudget) -> Vec<GifAttempt> {
    let base_colors: u32 = if budget.motion_complexity > HIGH_MOTION_THRESHOLD {
        96
    } else {
        128
    };
    let reduced_fps = budget.fps.saturating_sub(2).max(MIN_FPS);

    vec![
        GifAttempt {
            fps: budget.fps,
            width: budget.width,
            height: budget.height,
            max_colors: base_colors,
        },
        GifAttempt {
            fps: reduced_fps,
            width: budget.width,
            height: budget.height,
            max_colors: base_colors.saturating_sub(32).max(64),
        },
        GifAttempt {
            fps: reduced_fps,
            width: scaled_floor(budget.width),
            height: scaled_floor(budget.height),
            max_colors: 64,
        },
    ]
}

fn scaled_floor(dimension: u32) -> u32 {
    (((f64::from(dimension)) * 0.85).floor() as u32).max(MIN_DIMENSION)
}

/// Outcome of the encoder stage.
///
/// `Skipped` is the designed degraded path (encoding disabled, tool
/// unavailable, or no candidate fit the budget), not an error; the
/// manifest stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EncodeOutcome {
    Encoded {
        file_path: String,
        size_mb: f64,
        /// Which ladder attempt produced the artifact.
        reason: String,
    },
    Skipped {
        reason: String,
    },
}

impl EncodeOutcome {
    /// Whether an artifact was produced.
    pub fn is_encoded(&self) -> bool {
        matches!(self, EncodeOutcome::Encoded { .. })
    }

    /// The outcome's observability reason.
    pub fn reason(&self) -> &str {
        match self {
            EncodeOutcome::Encoded { reason, .. } => reason,
            EncodeOutcome::Skipped { reason } => reason,
        }
    }
}

//! Quality modes, baseline profiles and output formats.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hard floor for output width and height in pixels.
pub const MIN_DIMENSION: u32 = 384;
/// Hard floor for output frame rate.
pub const MIN_FPS: u32 = 8;
/// Hard floor for output duration in seconds.
pub const MIN_DURATION_SEC: f64 = 1.0;

/// Named quality profile selected by the request mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VideoMode {
    /// Short clip, highest frame rate.
    CrispShort,
    /// Default trade-off between sharpness and length.
    #[default]
    Balanced,
    /// Longer clip at reduced resolution and frame rate.
    LongSoft,
}

impl VideoMode {
    /// Parse from string (case-insensitive). Unrecognized modes fall back
    /// to [`VideoMode::Balanced`]; an unknown mode is never an error.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "crisp-short" | "crisp_short" | "crisp" => VideoMode::CrispShort,
            "long-soft" | "long_soft" | "long" => VideoMode::LongSoft,
            _ => VideoMode::Balanced,
        }
    }

    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoMode::CrispShort => "crisp-short",
            VideoMode::Balanced => "balanced",
            VideoMode::LongSoft => "long-soft",
        }
    }

    /// Baseline resource profile for this mode.
    pub fn profile(&self) -> QualityProfile {
        match self {
            VideoMode::CrispShort => QualityProfile {
                width: 1280,
                height: 720,
                fps: 20,
                duration_sec: 2.5,
            },
            VideoMode::Balanced => QualityProfile {
                width: 1280,
                height: 720,
                fps: 16,
                duration_sec: 4.0,
            },
            VideoMode::LongSoft => QualityProfile {
                width: 960,
                height: 544,
                fps: 10,
                duration_sec: 8.0,
            },
        }
    }
}

impl std::fmt::Display for VideoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Baseline width/height/fps/duration for a quality mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct QualityProfile {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Output duration in seconds.
    pub duration_sec: f64,
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Mp4,
    Gif,
}

impl VideoFormat {
    /// Coerce from a raw string: `gif` only on exact (case-insensitive)
    /// match, everything else becomes mp4.
    pub fn coerce(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("gif") {
            VideoFormat::Gif
        } else {
            VideoFormat::Mp4
        }
    }

    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Gif => "gif",
        }
    }
}

impl std::fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

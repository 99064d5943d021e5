//! Keyframe planning and render models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::request::ImageOptions;

/// Position of a keyframe within its shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MomentLabel {
    Start,
    Mid,
    End,
}

impl MomentLabel {
    /// All moments in timeline order.
    pub const ALL: [MomentLabel; 3] = [MomentLabel::Start, MomentLabel::Mid, MomentLabel::End];

    /// Planned index within the shot (0 = start, 1 = mid, 2 = end).
    pub fn index(&self) -> usize {
        match self {
            MomentLabel::Start => 0,
            MomentLabel::Mid => 1,
            MomentLabel::End => 2,
        }
    }

    /// Get the moment name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentLabel::Start => "start",
            MomentLabel::Mid => "mid",
            MomentLabel::End => "end",
        }
    }
}

/// A planned still image anchored to a timestamp within a shot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeyframeSpec {
    pub shot_id: String,
    /// Planned index within the shot (0 = start, 1 = mid, 2 = end).
    pub index: usize,
    pub label: MomentLabel,
    /// Timestamp within the shot, in seconds.
    pub timestamp_sec: f64,
    /// Full render prompt for this keyframe.
    pub prompt: String,
}

/// A keyframe that has been rendered (or served from the cache).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderedKeyframe {
    #[serde(flatten)]
    pub spec: KeyframeSpec,
    pub file_path: String,
    /// Whether the render was served from the keyframe cache.
    pub cached: bool,
}

/// Options handed to the keyframe renderer for a single still.
///
/// Width/height/ratio always come from the resource budget; the rest is
/// inherited from the request's image options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Aspect ratio in "width:height" form.
    pub ratio: String,
    #[serde(flatten)]
    pub image_options: ImageOptions,
}

impl RenderOptions {
    /// Build render options from the budget envelope and request options.
    pub fn from_budget(width: u32, height: u32, image_options: &ImageOptions) -> Self {
        Self {
            width,
            height,
            ratio: format!("{width}:{height}"),
            image_options: image_options.clone(),
        }
    }

    /// Composite cache key for at-most-once rendering.
    ///
    /// Serializes the fields that determine render output; identical keys
    /// must yield identical files.
    pub fn cache_key(&self, prompt: &str) -> String {
        let stable = serde_json::json!({
            "prompt": prompt,
            "width": self.width,
            "height": self.height,
            "format": self.image_options.format.as_deref().unwrap_or("png"),
            "model": self.image_options.model.as_deref().unwrap_or("default"),
            "style": self.image_options.style.as_deref().unwrap_or("default"),
        });
        stable.to_string()
    }
}

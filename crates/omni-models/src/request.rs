//! Inbound request options and the canonical generation request.
//!
//! [`GenerationRequest::normalize`] is the only way to construct a request;
//! it validates the prompt, resolves the mode, clamps the size budget and
//! normalizes dialogue entries.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mode::{VideoFormat, VideoMode};

/// Lower clamp for the output size budget, in megabytes.
pub const MIN_SIZE_MB: f64 = 0.25;
/// Upper clamp for the output size budget, in megabytes.
pub const MAX_SIZE_MB: f64 = 10.0;
/// Default output size budget when the caller supplies none.
pub const DEFAULT_MAX_SIZE_MB: f64 = 2.0;

/// Clamp range for a single dialogue line, in seconds.
const MIN_LINE_DURATION_SEC: f64 = 0.4;
const MAX_LINE_DURATION_SEC: f64 = 8.0;
const DEFAULT_LINE_DURATION_SEC: f64 = 1.2;

/// Clause appended to prompts that carry no motion language of their own.
const SUBTLE_MOTION_CLAUSE: &str =
    "subtle motion: gentle camera breathing, light flicker, slight background parallax";

pub type RequestResult<T> = Result<T, RequestError>;

/// Errors raised while normalizing a raw request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("video generation requires a non-empty prompt string")]
    EmptyPrompt,
}

/// Raw request options, as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VideoRequestOptions {
    /// Output container format ("mp4" or "gif").
    #[serde(default)]
    pub format: Option<String>,
    /// Output size budget in megabytes.
    #[serde(default)]
    pub max_size_mb: Option<f64>,
    /// Explicit opt-in to real encoding.
    #[serde(default)]
    pub enable_encoding: Option<bool>,
    /// Whether the size budget is a hard requirement (advisory metadata).
    #[serde(default)]
    pub strict_size: Option<bool>,
    /// Dialogue script, one entry per spoken line.
    #[serde(default)]
    pub dialogue: Vec<RawDialogueLine>,
    /// Reference image identifiers for conditioning.
    #[serde(default)]
    pub reference_images: Vec<String>,
    /// Freeform style hints appended to keyframe prompts.
    #[serde(default)]
    pub style_hints: Vec<String>,
    /// Options forwarded to the keyframe renderer.
    #[serde(default)]
    pub image_options: ImageOptions,
}

/// Raw dialogue entry before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawDialogueLine {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub emotion: Option<String>,
}

/// Renderer options carried from the caller into every keyframe render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageOptions {
    /// Image format (defaults to "png" at the cache-key level).
    #[serde(default)]
    pub format: Option<String>,
    /// Renderer model identifier.
    #[serde(default)]
    pub model: Option<String>,
    /// Renderer style preset.
    #[serde(default)]
    pub style: Option<String>,
}

/// A normalized dialogue line.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DialogueLine {
    /// Stable line identifier ("line_1", "line_2", ...).
    pub id: String,
    pub speaker: String,
    pub text: String,
    pub duration_sec: f64,
    pub emotion: String,
}

/// Canonical, validated generation request.
///
/// Construct via [`GenerationRequest::normalize`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationRequest {
    pub prompt: String,
    pub mode: VideoMode,
    pub format: VideoFormat,
    /// Output size budget in megabytes, clamped to [0.25, 10].
    pub max_size_mb: f64,
    /// Set when the prompt carried no motion language and the subtle-motion
    /// clause was appended.
    pub motion_injected: bool,
    /// Explicit opt-in to real encoding (off unless requested).
    pub enable_encoding: bool,
    pub strict_size: bool,
    pub dialogue: Vec<DialogueLine>,
    pub reference_images: Vec<String>,
    pub style_hints: Vec<String>,
    pub image_options: ImageOptions,
}

impl GenerationRequest {
    /// Validate and normalize a raw request into its canonical form.
    ///
    /// Fails only on an empty prompt; every other field is clamped,
    /// coerced or defaulted.
    pub fn normalize(
        prompt: &str,
        mode: &str,
        options: &VideoRequestOptions,
    ) -> RequestResult<Self> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(RequestError::EmptyPrompt);
        }

        let motion_injected = !has_motion_language(trimmed);
        let prompt = if motion_injected {
            format!("{trimmed}. {SUBTLE_MOTION_CLAUSE}")
        } else {
            trimmed.to_string()
        };

        let format = VideoFormat::coerce(options.format.as_deref().unwrap_or("mp4"));
        let max_size_mb = options
            .max_size_mb
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_MAX_SIZE_MB)
            .clamp(MIN_SIZE_MB, MAX_SIZE_MB);

        Ok(Self {
            prompt,
            mode: VideoMode::from_str(mode),
            format,
            max_size_mb,
            motion_injected,
            enable_encoding: options.enable_encoding.unwrap_or(false),
            strict_size: options.strict_size.unwrap_or(true),
            dialogue: normalize_dialogue(&options.dialogue),
            reference_images: trim_strings(&options.reference_images),
            style_hints: trim_strings(&options.style_hints),
            image_options: options.image_options.clone(),
        })
    }
}

/// Check whether the prompt already speaks about motion or camera work.
fn has_motion_language(prompt: &str) -> bool {
    let pattern = Regex::new(
        r"(?i)\b(video|gif|animation|animated|motion|moving|pan|tilt|zoom|tracking|camera movement|transition|loop|sequence|frames)\b",
    )
    .unwrap();
    pattern.is_match(prompt)
}

/// Drop empty entries, clamp durations and fill defaults.
///
/// Line ids are numbered by their position in the raw script, so dropped
/// entries leave gaps rather than renumbering the survivors.
fn normalize_dialogue(dialogue: &[RawDialogueLine]) -> Vec<DialogueLine> {
    dialogue
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let text = line.text.as_deref().unwrap_or("").trim();
            if text.is_empty() {
                return None;
            }
            Some(DialogueLine {
                id: format!("line_{}", index + 1),
                speaker: non_empty_or(line.speaker.as_deref(), "narrator"),
                text: text.to_string(),
                duration_sec: line
                    .duration_sec
                    .filter(|v| v.is_finite())
                    .unwrap_or(DEFAULT_LINE_DURATION_SEC)
                    .clamp(MIN_LINE_DURATION_SEC, MAX_LINE_DURATION_SEC),
                emotion: non_empty_or(line.emotion.as_deref(), "neutral"),
            })
        })
        .collect()
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn trim_strings(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_rejected() {
        let options = VideoRequestOptions::default();
        assert!(GenerationRequest::normalize("", "balanced", &options).is_err());
        assert!(GenerationRequest::normalize("   ", "balanced", &options).is_err());
    }

    #[test]
    fn test_unknown_mode_falls_back() {
        let options = VideoRequestOptions::default();
        let request = GenerationRequest::normalize("a quiet forest", "imax", &options).unwrap();
        assert_eq!(request.mode, VideoMode::Balanced);
    }

    #[test]
    fn test_max_size_clamped() {
        let mut options = VideoRequestOptions::default();
        options.max_size_mb = Some(0.01);
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert!((request.max_size_mb - MIN_SIZE_MB).abs() < f64::EPSILON);

        options.max_size_mb = Some(500.0);
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert!((request.max_size_mb - MAX_SIZE_MB).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_coerced() {
        let mut options = VideoRequestOptions::default();
        options.format = Some("GIF".to_string());
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert_eq!(request.format, VideoFormat::Gif);

        options.format = Some("avi".to_string());
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert_eq!(request.format, VideoFormat::Mp4);
    }

    #[test]
    fn test_motion_clause_injected_once() {
        let options = VideoRequestOptions::default();
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert!(request.motion_injected);
        assert!(request.prompt.contains("subtle motion"));

        let request =
            GenerationRequest::normalize("a slow pan across the bay", "balanced", &options)
                .unwrap();
        assert!(!request.motion_injected);
        assert_eq!(request.prompt, "a slow pan across the bay");
    }

    #[test]
    fn test_dialogue_normalization() {
        let mut options = VideoRequestOptions::default();
        options.dialogue = vec![
            RawDialogueLine {
                speaker: None,
                text: Some("  hello there  ".to_string()),
                duration_sec: Some(20.0),
                emotion: None,
            },
            RawDialogueLine {
                text: Some("   ".to_string()),
                ..Default::default()
            },
            RawDialogueLine {
                speaker: Some("guide".to_string()),
                text: Some("this way".to_string()),
                duration_sec: Some(0.1),
                emotion: Some("calm".to_string()),
            },
        ];

        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert_eq!(request.dialogue.len(), 2);

        let first = &request.dialogue[0];
        assert_eq!(first.id, "line_1");
        assert_eq!(first.speaker, "narrator");
        assert_eq!(first.text, "hello there");
        assert!((first.duration_sec - MAX_LINE_DURATION_SEC).abs() < f64::EPSILON);
        assert_eq!(first.emotion, "neutral");

        // The blank entry is dropped but keeps its slot in the numbering
        let second = &request.dialogue[1];
        assert_eq!(second.id, "line_3");
        assert_eq!(second.speaker, "guide");
        assert!((second.duration_sec - MIN_LINE_DURATION_SEC).abs() < f64::EPSILON);
        assert_eq!(second.emotion, "calm");
    }

    #[test]
    fn test_reference_and_style_lists_trimmed() {
        let mut options = VideoRequestOptions::default();
        options.reference_images = vec!["  img_1 ".to_string(), "".to_string()];
        options.style_hints = vec!["noir".to_string(), "   ".to_string()];
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert_eq!(request.reference_images, vec!["img_1".to_string()]);
        assert_eq!(request.style_hints, vec!["noir".to_string()]);
    }

    #[test]
    fn test_encoding_disabled_by_default() {
        let options = VideoRequestOptions::default();
        let request = GenerationRequest::normalize("a quiet forest", "balanced", &options).unwrap();
        assert!(!request.enable_encoding);
        assert!(request.strict_size);
    }
}

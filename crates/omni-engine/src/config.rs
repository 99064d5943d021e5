//! Engine configuration.

use std::path::PathBuf;

use omni_media::orchestrator::{EncoderSettings, DEFAULT_ENCODE_TIMEOUT_SECS, ENABLE_ENCODING_ENV};
use omni_media::resolve::{is_truthy_flag, FFMPEG_PATH_ENV};

/// Default export directory, relative to the working directory.
pub const DEFAULT_EXPORT_DIR: &str = "omni_video_exports";
/// Default keyframe cache capacity (entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory for manifests, encoded artifacts and the transient
    /// concat script.
    pub export_dir: PathBuf,
    /// Bounded capacity of the shared keyframe render cache.
    pub keyframe_cache_capacity: usize,
    /// Process-wide encoder enablement (requests can still opt in).
    pub env_enable_encoding: bool,
    /// Explicit FFmpeg binary override.
    pub ffmpeg_override: Option<PathBuf>,
    /// Per-attempt encode timeout in seconds.
    pub encode_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            keyframe_cache_capacity: DEFAULT_CACHE_CAPACITY,
            env_enable_encoding: false,
            ffmpeg_override: None,
            encode_timeout_secs: DEFAULT_ENCODE_TIMEOUT_SECS,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            export_dir: std::env::var("OMNI_VIDEO_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_DIR)),
            keyframe_cache_capacity: std::env::var("OMNI_VIDEO_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
            env_enable_encoding: std::env::var(ENABLE_ENCODING_ENV)
                .map(|v| is_truthy_flag(&v))
                .unwrap_or(false),
            ffmpeg_override: std::env::var(FFMPEG_PATH_ENV)
                .ok()
                .map(|v| PathBuf::from(v.trim()))
                .filter(|p| !p.as_os_str().is_empty()),
            encode_timeout_secs: std::env::var("OMNI_VIDEO_ENCODE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_ENCODE_TIMEOUT_SECS),
        }
    }

    /// Encoder settings derived from this configuration.
    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            export_dir: self.export_dir.clone(),
            env_enabled: self.env_enable_encoding,
            ffmpeg_override: self.ffmpeg_override.clone(),
            timeout_secs: self.encode_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.export_dir, PathBuf::from(DEFAULT_EXPORT_DIR));
        assert_eq!(config.keyframe_cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(!config.env_enable_encoding);
        assert!(config.ffmpeg_override.is_none());
    }

    #[test]
    fn test_encoder_settings_mirror_config() {
        let config = EngineConfig {
            export_dir: PathBuf::from("/tmp/exports"),
            encode_timeout_secs: 30,
            ..Default::default()
        };
        let settings = config.encoder_settings();
        assert_eq!(settings.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(settings.timeout_secs, 30);
        assert!(!settings.env_enabled);
    }
}

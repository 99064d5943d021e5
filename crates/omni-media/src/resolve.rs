//! FFmpeg binary resolution.

use std::path::PathBuf;

/// Environment variable overriding the FFmpeg binary path.
pub const FFMPEG_PATH_ENV: &str = "OMNI_VIDEO_FFMPEG_PATH";

/// String values accepted as "on" for boolean environment flags.
const ENABLE_VALUES: [&str; 4] = ["1", "true", "yes", "on"];

/// Whether an environment-flag string counts as enabled.
pub fn is_truthy_flag(value: &str) -> bool {
    ENABLE_VALUES.contains(&value.trim().to_lowercase().as_str())
}

/// Resolve the FFmpeg binary to invoke.
///
/// Order: explicit override path, then `OMNI_VIDEO_FFMPEG_PATH`, then the
/// first `ffmpeg` on PATH, falling back to the bare command name so the
/// availability probe produces the failure diagnostics.
pub fn resolve_ffmpeg_binary(override_path: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = override_path {
        if path.exists() {
            return path.clone();
        }
    }

    if let Ok(env_path) = std::env::var(FFMPEG_PATH_ENV) {
        let candidate = PathBuf::from(env_path.trim());
        if !candidate.as_os_str().is_empty() && candidate.exists() {
            return candidate;
        }
    }

    which::which("ffmpeg").unwrap_or_else(|_| PathBuf::from("ffmpeg"))
}

//! Concat-demuxer script generation.

use std::path::{Path, PathBuf};
use tokio::fs;

use omni_models::RenderedKeyframe;

use crate::error::{MediaError, MediaResult};

/// An in-memory concat-demuxer script for a keyframe sequence.
///
/// Consecutive duplicate frame paths are collapsed; each surviving frame
/// gets an equal share of the clip duration, and the final frame is
/// repeated once without a duration as the demuxer's end sentinel.
#[derive(Debug, Clone)]
pub struct ConcatScript {
    contents: String,
    frame_count: usize,
}

impl ConcatScript {
    /// Build the script from rendered keyframes in timeline order.
    pub fn build(keyframes: &[RenderedKeyframe], duration_sec: f64) -> MediaResult<Self> {
        let mut unique: Vec<&str> = Vec::new();
        for frame in keyframes {
            if unique.last() != Some(&frame.file_path.as_str()) {
                unique.push(&frame.file_path);
            }
        }

        if unique.is_empty() {
            return Err(MediaError::NoKeyframes);
        }

        let frame_duration = round4(duration_sec / unique.len() as f64);
        let mut lines = vec!["ffconcat version 1.0".to_string()];
        for path in &unique {
            lines.push(format!("file '{}'", escape_path(path)));
            lines.push(format!("duration {frame_duration}"));
        }
        // Sentinel: the demuxer drops the last listed duration otherwise
        lines.push(format!("file '{}'", escape_path(unique[unique.len() - 1])));

        Ok(Self {
            contents: lines.join("\n"),
            frame_count: unique.len(),
        })
    }

    /// Number of unique consecutive frames in the script.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// The script text.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Write the script to disk.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> MediaResult<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, &self.contents).await?;
        Ok(path.to_path_buf())
    }
}

/// Normalize separators and escape single quotes for the concat format.
fn escape_path(path: &str) -> String {
    path.replace('\\', "/").replace('\'', "'\\''")
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_models::{KeyframeSpec, MomentLabel};

    fn frame(shot_id: &str, index: usize, file_path: &str) -> RenderedKeyframe {
        RenderedKeyframe {
            spec: KeyframeSpec {
                shot_id: shot_id.to_string(),
                index,
                label: MomentLabel::ALL[index.min(2)],
                timestamp_sec: index as f64,
                prompt: "p".to_string(),
            },
            file_path: file_path.to_string(),
            cached: false,
        }
    }

    #[test]
    fn test_adjacent_duplicates_collapsed() {
        let frames = vec![
            frame("shot_1", 0, "/tmp/a.png"),
            frame("shot_1", 1, "/tmp/a.png"),
            frame("shot_1", 2, "/tmp/b.png"),
            // Non-adjacent repeat survives
            frame("shot_2", 0, "/tmp/a.png"),
        ];
        let script = ConcatScript::build(&frames, 3.0).unwrap();
        assert_eq!(script.frame_count(), 3);
        assert_eq!(script.contents().matches("duration 1").count(), 3);
    }

    #[test]
    fn test_sentinel_tail_frame() {
        let frames = vec![frame("shot_1", 0, "/tmp/a.png"), frame("shot_1", 1, "/tmp/b.png")];
        let script = ConcatScript::build(&frames, 2.0).unwrap();
        let lines: Vec<&str> = script.contents().lines().collect();
        assert_eq!(lines[0], "ffconcat version 1.0");
        assert_eq!(*lines.last().unwrap(), "file '/tmp/b.png'");
        // Sentinel carries no duration line
        assert!(lines[lines.len() - 2].starts_with("duration"));
    }

    #[test]
    fn test_per_frame_duration_split() {
        let frames = vec![
            frame("shot_1", 0, "/tmp/a.png"),
            frame("shot_1", 1, "/tmp/b.png"),
            frame("shot_1", 2, "/tmp/c.png"),
        ];
        let script = ConcatScript::build(&frames, 2.0).unwrap();
        assert!(script.contents().contains("duration 0.6667"));
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(matches!(
            ConcatScript::build(&[], 2.0),
            Err(MediaError::NoKeyframes)
        ));
    }

    #[test]
    fn test_quote_escaping() {
        let frames = vec![frame("shot_1", 0, "/tmp/it's.png")];
        let script = ConcatScript::build(&frames, 1.0).unwrap();
        assert!(script.contents().contains("it'\\''s.png"));
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let frames = vec![frame("shot_1", 0, "/tmp/a.png")];
        let script = ConcatScript::build(&frames, 1.0).unwrap();
        let target = dir.path().join("nested").join("frames.txt");
        script.write_to(&target).await.unwrap();
        assert!(target.exists());
    }
}

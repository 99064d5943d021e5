//! Manifest export.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use omni_models::VideoManifest;

use crate::error::EngineResult;

/// Writes the full generation plan to a timestamped JSON file.
#[derive(Debug, Clone)]
pub struct ManifestExporter {
    export_dir: PathBuf,
}

impl ManifestExporter {
    /// Create an exporter targeting the given directory.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// The directory manifests are written to.
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Serialize the plan to disk. A filesystem failure is fatal.
    pub async fn export(&self, manifest: &VideoManifest) -> EngineResult<PathBuf> {
        fs::create_dir_all(&self.export_dir).await?;

        let timestamp = manifest.created_at.format("%Y-%m-%d_%H-%M-%S");
        let filename = format!(
            "omni_video_plan_{timestamp}.{}.json",
            manifest.format.extension()
        );
        let path = self.export_dir.join(filename);

        let json = serde_json::to_vec_pretty(manifest)?;
        fs::write(&path, json).await?;

        info!(path = %path.display(), "video manifest exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use omni_models::{
        GenerationRequest, OptimizationPlan, ResourceBudget, SceneGraph, VideoRequestOptions,
    };
    use tempfile::TempDir;

    fn manifest() -> VideoManifest {
        let request = GenerationRequest::normalize(
            "a slow pan across the harbor",
            "balanced",
            &VideoRequestOptions::default(),
        )
        .unwrap();
        let budget = ResourceBudget {
            max_size_mb: 2.0,
            width: 1280,
            height: 720,
            fps: 16,
            duration_sec: 4.0,
            estimated_size_mb: 0.8,
            motion_complexity: 1.0,
        };
        VideoManifest {
            mode: request.mode,
            format: request.format,
            context: omni_models::GlobalContext {
                theme: request.prompt.clone(),
                mood: "cinematic".to_string(),
                location: "prompt-defined".to_string(),
                time_of_day: omni_models::TimeOfDay::Day,
                duration_sec: budget.duration_sec,
                style_hints: vec![],
            },
            scene_graph: SceneGraph {
                summary: request.prompt.clone(),
                entities: vec![],
                mood: "cinematic".to_string(),
                lighting: "balanced".to_string(),
                gravity: [0.0, -9.8, 0.0],
            },
            entity_tracks: vec![],
            shots: vec![],
            physics_channels: vec![],
            dialogue_timeline: vec![],
            storyboard: vec![],
            optimization: OptimizationPlan::from_budget(&budget, true),
            keyframes: vec![],
            budget,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_export_writes_timestamped_json() {
        let dir = TempDir::new().unwrap();
        let exporter = ManifestExporter::new(dir.path());
        let path = exporter.export(&manifest()).await.unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("omni_video_plan_"));
        assert!(name.ends_with(".mp4.json"));

        // Round-trips as JSON
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["mode"], "balanced");
        assert!(parsed["optimization"]["adaptive_tiers"].as_array().unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn test_export_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("exports");
        let exporter = ManifestExporter::new(&nested);
        exporter.export(&manifest()).await.unwrap();
        assert!(nested.exists());
    }
}

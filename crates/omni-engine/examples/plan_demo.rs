//! Run the pipeline end to end with a stub renderer and print the result.
//!
//! ```bash
//! cargo run --example plan_demo -p omni-engine
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use omni_engine::{EngineConfig, EngineError, KeyframeRenderer, RenderedImage, VideoEngine};
use omni_models::{RenderOptions, VideoRequestOptions};

struct PlaceholderRenderer {
    counter: AtomicUsize,
}

#[async_trait]
impl KeyframeRenderer for PlaceholderRenderer {
    async fn render(
        &self,
        _prompt: &str,
        options: &RenderOptions,
    ) -> Result<RenderedImage, EngineError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "omni_demo_keyframe_{n}_{}x{}.png",
            options.width, options.height
        ));
        Ok(RenderedImage { file_path: path })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = EngineConfig {
        export_dir: PathBuf::from("omni_video_exports"),
        ..EngineConfig::from_env()
    };
    let engine = VideoEngine::builder()
        .config(config)
        .renderer(Arc::new(PlaceholderRenderer {
            counter: AtomicUsize::new(0),
        }))
        .build();

    let options = VideoRequestOptions {
        max_size_mb: Some(2.0),
        style_hints: vec!["retro-futurist".to_string()],
        ..Default::default()
    };
    let result = engine
        .generate_video_clip(
            "A lone explorer walks through a neon ruin at dusk. Wind moves dust in arcs.",
            "balanced",
            &options,
        )
        .await?;

    println!("run id:     {}", result.id);
    println!(
        "budget:     {}x{} @{}fps for {:.2}s (est {:.3} MB)",
        result.plan.budget.width,
        result.plan.budget.height,
        result.plan.budget.fps,
        result.plan.budget.duration_sec,
        result.plan.budget.estimated_size_mb
    );
    println!("shots:      {}", result.plan.shots.len());
    println!("keyframes:  {}", result.plan.keyframes.len());
    println!("output:     {:?} -> {}", result.output.kind, result.output.file_path);
    println!("encoder:    used={} ({})", result.encoder.used, result.encoder.reason);

    Ok(())
}

//! Keyframe planning, rendering and the shared render cache.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use omni_models::budget::round2;
use omni_models::{
    GenerationRequest, KeyframeSpec, MomentLabel, RenderOptions, RenderedKeyframe, ResourceBudget,
    Shot,
};

use crate::error::{EngineError, EngineResult};

/// A rendered still returned by the injected renderer.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub file_path: PathBuf,
}

/// The keyframe renderer collaborator.
///
/// Must be supplied before any keyframes are generated; there is no
/// synthetic fallback image.
#[async_trait]
pub trait KeyframeRenderer: Send + Sync {
    async fn render(&self, prompt: &str, options: &RenderOptions) -> EngineResult<RenderedImage>;
}

/// Bounded LRU cache from composite render key to rendered file path.
///
/// Shared across requests through the engine; a race costs at most one
/// redundant render because writes are idempotent (same key, same file).
#[derive(Debug)]
pub struct KeyframeCache {
    capacity: usize,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl KeyframeCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let value = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    /// Insert a key, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: String, file_path: String) {
        if self.entries.insert(key.clone(), file_path).is_none() {
            while self.entries.len() > self.capacity {
                if let Some(evicted) = self.order.pop_front() {
                    self.entries.remove(&evicted);
                } else {
                    break;
                }
            }
            self.order.push_back(key);
        } else {
            self.touch(&key);
        }
    }

    /// Number of cached renders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(position) = self.order.iter().position(|k| k == key) {
            if let Some(key) = self.order.remove(position) {
                self.order.push_back(key);
            }
        }
    }
}

/// Plan exactly three keyframes (start, mid, end) per shot.
pub fn plan_keyframes(request: &GenerationRequest, shots: &[Shot]) -> Vec<KeyframeSpec> {
    shots
        .iter()
        .flat_map(|shot| {
            MomentLabel::ALL.into_iter().map(|label| KeyframeSpec {
                shot_id: shot.id.clone(),
                index: label.index(),
                label,
                timestamp_sec: round2((shot.duration_sec / 2.0) * label.index() as f64),
                prompt: build_keyframe_prompt(request, shot, label),
            })
        })
        .collect()
}

/// Assemble the full render prompt for one keyframe.
fn build_keyframe_prompt(request: &GenerationRequest, shot: &Shot, label: MomentLabel) -> String {
    let mut parts = vec![
        request.prompt.clone(),
        format!("shot: {}", shot.description),
        format!("camera: {}", shot.camera.as_str()),
        format!("moment: {}", label.as_str()),
        "motion continuity: preserve temporal coherence between adjacent frames".to_string(),
    ];
    if !request.style_hints.is_empty() {
        parts.push(format!("style: {}", request.style_hints.join(", ")));
    }
    if !request.reference_images.is_empty() {
        parts.push(format!("references: {}", request.reference_images.join(", ")));
    }
    parts.join(" | ")
}

/// Render every planned keyframe, consulting the shared cache first.
pub async fn generate_keyframes(
    renderer: Option<&Arc<dyn KeyframeRenderer>>,
    cache: &tokio::sync::Mutex<KeyframeCache>,
    request: &GenerationRequest,
    budget: &ResourceBudget,
    plan: Vec<KeyframeSpec>,
) -> EngineResult<Vec<RenderedKeyframe>> {
    let renderer = renderer.ok_or(EngineError::RendererMissing)?;
    let options = RenderOptions::from_budget(budget.width, budget.height, &request.image_options);

    let mut rendered = Vec::with_capacity(plan.len());
    for spec in plan {
        let key = options.cache_key(&spec.prompt);
        let hit = cache.lock().await.get(&key);
        let (file_path, cached) = match hit {
            Some(path) => {
                debug!(shot_id = %spec.shot_id, index = spec.index, "keyframe cache hit");
                (path, true)
            }
            None => {
                let image = renderer.render(&spec.prompt, &options).await?;
                let path = image.file_path.to_string_lossy().to_string();
                cache.lock().await.insert(key, path.clone());
                (path, false)
            }
        };
        rendered.push(RenderedKeyframe {
            spec,
            file_path,
            cached,
        });
    }

    Ok(rendered)
}

//! Global scene context and per-entity spatial tracks.

use omni_models::budget::round2;
use omni_models::{
    EntityState, EntityTrack, GenerationRequest, GlobalContext, ResourceBudget, SceneGraph, Shot,
};

use crate::signals::TextSignalClassifier;

/// Build the scene-wide context shared by all shots.
pub fn build_global_context(
    request: &GenerationRequest,
    scene_graph: &SceneGraph,
    budget: &ResourceBudget,
    classifier: &dyn TextSignalClassifier,
) -> GlobalContext {
    let mood = scene_graph.mood.trim().to_lowercase();
    GlobalContext {
        theme: scene_graph.summary.clone(),
        mood: if mood.is_empty() {
            "cinematic".to_string()
        } else {
            mood
        },
        location: if request.reference_images.is_empty() {
            "prompt-defined".to_string()
        } else {
            "reference-conditioned".to_string()
        },
        time_of_day: classifier.time_of_day(&request.prompt),
        duration_sec: budget.duration_sec,
        style_hints: request.style_hints.clone(),
    }
}

/// Build a synthetic spatial track for each entity across all shots.
///
/// Positions follow a deterministic index formula, not a simulation; the
/// first shot introduces an entity and later shots continue it.
pub fn build_entity_tracks(scene_graph: &SceneGraph, shots: &[Shot]) -> Vec<EntityTrack> {
    scene_graph
        .entities
        .iter()
        .enumerate()
        .map(|(entity_index, entity)| EntityTrack {
            entity_id: entity.id.clone(),
            label: entity.label.clone(),
            states: shots
                .iter()
                .enumerate()
                .map(|(shot_index, shot)| EntityState {
                    shot_id: shot.id.clone(),
                    position: [
                        round2(entity_index as f64 * 0.12 + shot_index as f64 * 0.07),
                        round2(0.45 - shot_index as f64 * 0.08),
                        round2(0.2 + entity_index as f64 * 0.03),
                    ],
                    state: if shot_index == 0 {
                        "introduce".to_string()
                    } else {
                        "continue".to_string()
                    },
                })
                .collect(),
        })
        .collect()
}

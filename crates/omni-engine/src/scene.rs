//! Scene and shot decomposition.

use omni_models::budget::round2;
use omni_models::{
    DialogueWindow, GenerationRequest, ResourceBudget, SceneEntity, SceneGraph, Shot,
};

use crate::signals::TextSignalClassifier;

/// Entities are seeded from at most this many leading prompt words.
const MAX_SEED_WORDS: usize = 6;
/// Words shorter than this never become entities.
const MIN_ENTITY_WORD_LEN: usize = 4;
/// A clip never has more shots than this.
const MAX_SHOTS: usize = 2;

const DEFAULT_MOOD: &str = "cinematic";

/// Derive the scene graph and ordered shot list for a request.
/// Deterministic given identical input.
pub fn decompose(
    request: &GenerationRequest,
    budget: &ResourceBudget,
    classifier: &dyn TextSignalClassifier,
) -> (SceneGraph, Vec<Shot>) {
    let scene_graph = build_scene_graph(request);
    let shots = build_shots(request, budget, classifier);
    (scene_graph, shots)
}

fn build_scene_graph(request: &GenerationRequest) -> SceneGraph {
    let entities = request
        .prompt
        .to_lowercase()
        .split_whitespace()
        .take(MAX_SEED_WORDS)
        .enumerate()
        .filter(|(_, word)| word.len() >= MIN_ENTITY_WORD_LEN)
        .map(|(index, word)| SceneEntity {
            id: format!("entity_{}", index + 1),
            label: word.to_string(),
        })
        .collect();

    SceneGraph {
        summary: request.prompt.clone(),
        entities,
        mood: DEFAULT_MOOD.to_string(),
        lighting: "balanced".to_string(),
        gravity: [0.0, -9.8, 0.0],
    }
}

/// Split the prompt on sentence terminators into non-empty chunks.
fn split_prompt_chunks(prompt: &str) -> Vec<String> {
    prompt
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_shots(
    request: &GenerationRequest,
    budget: &ResourceBudget,
    classifier: &dyn TextSignalClassifier,
) -> Vec<Shot> {
    let chunks = split_prompt_chunks(&request.prompt);
    let shot_count = chunks.len().clamp(1, MAX_SHOTS);
    let duration_per_shot = round2(budget.duration_sec / shot_count as f64);

    (0..shot_count)
        .map(|index| {
            let description = chunks
                .get(index)
                .cloned()
                .unwrap_or_else(|| request.prompt.clone());
            // The dialogue line at this shot's index is absorbed, if present
            let dialogue_window = request.dialogue.get(index).map(|line| DialogueWindow {
                start_sec: 0.0,
                end_sec: round2(duration_per_shot.min(line.duration_sec)),
                emotion: line.emotion.clone(),
            });

            Shot {
                id: format!("shot_{}", index + 1),
                camera: classifier.camera(&description),
                description,
                duration_sec: duration_per_shot,
                dialogue_window,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::KeywordClassifier;
    use omni_models::{RawDialogueLine, VideoRequestOptions};

    fn budget(duration_sec: f64) -> ResourceBudget {
        ResourceBudget {
            max_size_mb: 2.0,
            width: 1280,
            height: 720,
            fps: 16,
            duration_sec,
            estimated_size_mb: 0.8,
            motion_complexity: 1.0,
        }
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::normalize(prompt, "balanced", &VideoRequestOptions::default()).unwrap()
    }

    #[test]
    fn test_entities_from_leading_words() {
        let request = request("A lone explorer walks through a neon ruin at dusk");
        let (scene, _) = decompose(&request, &budget(4.0), &KeywordClassifier);
        // Only the first six words are considered; short words are skipped
        let labels: Vec<&str> = scene.entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["lone", "explorer", "walks", "through"]);
        // Ids keep the seed-word position
        assert_eq!(scene.entities[0].id, "entity_2");
    }

    #[test]
    fn test_two_sentences_two_shots() {
        let request = request("A ship crosses the strait. A storm gathers behind it.");
        let (_, shots) = decompose(&request, &budget(4.0), &KeywordClassifier);
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].id, "shot_1");
        assert_eq!(shots[1].id, "shot_2");
        let total: f64 = shots.iter().map(|s| s.duration_sec).sum();
        assert!((total - 4.0).abs() < 0.02);
    }

    #[test]
    fn test_many_sentences_cap_at_two_shots() {
        let request = request("One. Two! Three? Four.");
        let (_, shots) = decompose(&request, &budget(4.0), &KeywordClassifier);
        assert_eq!(shots.len(), 2);
    }

    #[test]
    fn test_single_chunk_single_shot() {
        // The injected motion clause adds a second sentence chunk only when
        // the prompt lacks motion language, so use a motion-bearing prompt
        let request = request("a slow pan across the frozen harbor");
        let (_, shots) = decompose(&request, &budget(4.0), &KeywordClassifier);
        assert_eq!(shots.len(), 1);
        assert!((shots[0].duration_sec - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dialogue_window_capped_to_shot() {
        let options = VideoRequestOptions {
            dialogue: vec![RawDialogueLine {
                text: Some("a very long line".to_string()),
                duration_sec: Some(8.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let request =
            GenerationRequest::normalize("A slow pan across the harbor", "balanced", &options)
                .unwrap();
        let (_, shots) = decompose(&request, &budget(4.0), &KeywordClassifier);
        let window = shots[0].dialogue_window.as_ref().unwrap();
        assert!((window.end_sec - 4.0).abs() < f64::EPSILON);
        assert!((window.start_sec).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deterministic() {
        let request = request("A ship crosses the strait. A storm gathers.");
        let (scene_a, shots_a) = decompose(&request, &budget(4.0), &KeywordClassifier);
        let (scene_b, shots_b) = decompose(&request, &budget(4.0), &KeywordClassifier);
        assert_eq!(scene_a.entities.len(), scene_b.entities.len());
        assert_eq!(shots_a.len(), shots_b.len());
        assert_eq!(shots_a[0].description, shots_b[0].description);
    }
}

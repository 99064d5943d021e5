//! Per-shot physics conditioning.

use omni_models::budget::round2;
use omni_models::{CollisionHint, MotionField, PhysicsChannel, SceneGraph, Shot};

use crate::signals::TextSignalClassifier;

/// Build one physics channel per shot from text heuristics.
pub fn build_physics_channels(
    scene_graph: &SceneGraph,
    shots: &[Shot],
    classifier: &dyn TextSignalClassifier,
) -> Vec<PhysicsChannel> {
    shots
        .iter()
        .map(|shot| {
            let velocity = classifier.velocity(&shot.description);
            let collision_hint = classifier.collision_hint(&shot.description);
            let mode = if collision_hint == CollisionHint::None {
                "linear"
            } else {
                "interaction-aware"
            };

            PhysicsChannel {
                shot_id: shot.id.clone(),
                gravity: scene_graph.gravity,
                velocity,
                collision_hint,
                motion_field: MotionField {
                    mode: mode.to_string(),
                    intensity: round2(velocity[0].abs() + velocity[1].abs()),
                },
            }
        })
        .collect()
}

//! Text-signal classification.
//!
//! The pipeline never inspects raw text directly; every keyword heuristic
//! goes through [`TextSignalClassifier`] so the tables can be replaced by
//! a model-backed implementation without touching control flow.

use omni_models::{CameraKind, CollisionHint, TimeOfDay};

/// High-motion terms; each counts at most once toward motion complexity.
const HIGH_MOTION_TERMS: [&str; 9] = [
    "run", "explode", "fight", "storm", "chase", "rapid", "chaotic", "shaking", "camera move",
];

const FORWARD_TERMS: [&str; 5] = ["run", "dash", "chase", "sprint", "fast"];
const FLOAT_TERMS: [&str; 3] = ["float", "hover", "drift"];
const FALL_TERMS: [&str; 3] = ["fall", "drop", "collapse"];

const SURFACE_TERMS: [&str; 6] = ["wall", "ground", "floor", "table", "street", "road"];
const FLUID_TERMS: [&str; 4] = ["water", "ocean", "river", "rain"];

const NIGHT_TERMS: [&str; 4] = ["night", "dusk", "midnight", "moon"];

const PAN_TERMS: [&str; 2] = ["pan", "sweep"];
const ZOOM_TERMS: [&str; 3] = ["zoom", "close-up", "close up"];

/// Classifies free text into the coarse signals the pipeline consumes.
pub trait TextSignalClassifier: Send + Sync {
    /// Number of distinct high-motion terms present in the text.
    fn motion_hits(&self, text: &str) -> u32;

    /// Base velocity vector (x, y, z) for a shot description.
    fn velocity(&self, text: &str) -> [f64; 3];

    /// Contact hint for a shot description.
    fn collision_hint(&self, text: &str) -> CollisionHint;

    /// Day/night classification for the scene prompt.
    fn time_of_day(&self, text: &str) -> TimeOfDay;

    /// Camera treatment inferred from a shot description.
    fn camera(&self, text: &str) -> CameraKind;
}

/// Default classifier backed by fixed keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl TextSignalClassifier for KeywordClassifier {
    fn motion_hits(&self, text: &str) -> u32 {
        let lower = text.to_lowercase();
        HIGH_MOTION_TERMS
            .iter()
            .filter(|term| lower.contains(*term))
            .count() as u32
    }

    fn velocity(&self, text: &str) -> [f64; 3] {
        let lower = text.to_lowercase();
        if contains_any(&lower, &FORWARD_TERMS) {
            [2.4, 0.0, 0.0]
        } else if contains_any(&lower, &FLOAT_TERMS) {
            [0.5, 0.2, 0.0]
        } else if contains_any(&lower, &FALL_TERMS) {
            [0.0, -1.2, 0.0]
        } else {
            [0.8, 0.0, 0.0]
        }
    }

    fn collision_hint(&self, text: &str) -> CollisionHint {
        let lower = text.to_lowercase();
        if contains_any(&lower, &SURFACE_TERMS) {
            CollisionHint::SurfaceContact
        } else if contains_any(&lower, &FLUID_TERMS) {
            CollisionHint::FluidInteraction
        } else {
            CollisionHint::None
        }
    }

    fn time_of_day(&self, text: &str) -> TimeOfDay {
        let lower = text.to_lowercase();
        if contains_any(&lower, &NIGHT_TERMS) {
            TimeOfDay::Night
        } else {
            TimeOfDay::Day
        }
    }

    fn camera(&self, text: &str) -> CameraKind {
        let lower = text.to_lowercase();
        if contains_any(&lower, &PAN_TERMS) {
            CameraKind::Pan
        } else if contains_any(&lower, &ZOOM_TERMS) {
            CameraKind::Zoom
        } else {
            CameraKind::Static
        }
    }
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}

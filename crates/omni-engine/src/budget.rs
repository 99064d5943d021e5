//! Resource budget planning.
//!
//! Starts from the mode's baseline profile and walks a fixed, ordered
//! degradation ladder until the size estimate fits the caller budget or
//! every step has been spent. Best effort: the floored envelope is kept
//! even when still over budget, and the encoder runs its own ladder later.

use tracing::debug;

use omni_models::budget::round2;
use omni_models::mode::{MIN_DIMENSION, MIN_DURATION_SEC, MIN_FPS};
use omni_models::{GenerationRequest, ResourceBudget};

use crate::signals::TextSignalClassifier;

/// Cap on the motion-complexity bonus.
const MOTION_BONUS_CAP: f64 = 0.6;
/// Bonus per distinct high-motion term.
const MOTION_BONUS_PER_HIT: f64 = 0.1;

/// A single degradation step. Each step is applied at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeStep {
    /// Reduce fps by 15%, floor 8.
    ReduceFps,
    /// Reduce width and height by 15% uniformly, floor 384 px.
    ReduceResolution,
    /// Reduce duration by 20%, floor 1 s.
    ReduceDuration,
}

/// The fixed degradation order.
pub const DEGRADE_LADDER: [DegradeStep; 3] = [
    DegradeStep::ReduceFps,
    DegradeStep::ReduceResolution,
    DegradeStep::ReduceDuration,
];

/// Compute the resource envelope for a request.
pub fn plan_budget(
    request: &GenerationRequest,
    classifier: &dyn TextSignalClassifier,
) -> ResourceBudget {
    let profile = request.mode.profile();
    let hits = classifier.motion_hits(&request.prompt);
    let motion_complexity = 1.0 + (f64::from(hits) * MOTION_BONUS_PER_HIT).min(MOTION_BONUS_CAP);

    let mut budget = ResourceBudget {
        max_size_mb: request.max_size_mb,
        width: profile.width,
        height: profile.height,
        fps: profile.fps,
        duration_sec: profile.duration_sec,
        estimated_size_mb: 0.0,
        motion_complexity,
    };
    budget.refresh_estimate();

    for step in DEGRADE_LADDER {
        if budget.within_budget() {
            break;
        }
        apply_step(&mut budget, step);
        budget.refresh_estimate();
        debug!(
            ?step,
            estimated_size_mb = budget.estimated_size_mb,
            max_size_mb = budget.max_size_mb,
            "degradation step applied"
        );
    }

    budget
}

fn apply_step(budget: &mut ResourceBudget, step: DegradeStep) {
    match step {
        DegradeStep::ReduceFps => {
            budget.fps = ((f64::from(budget.fps) * 0.85).floor() as u32).max(MIN_FPS);
        }
        DegradeStep::ReduceResolution => {
            budget.width = ((f64::from(budget.width) * 0.85).floor() as u32).max(MIN_DIMENSION);
            budget.height = ((f64::from(budget.height) * 0.85).floor() as u32).max(MIN_DIMENSION);
        }
        DegradeStep::ReduceDuration => {
            budget.duration_sec = round2(budget.duration_sec * 0.8).max(MIN_DURATION_SEC);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::KeywordClassifier;
    use omni_models::VideoRequestOptions;

    fn request(prompt: &str, max_size_mb: f64) -> GenerationRequest {
        let options = VideoRequestOptions {
            max_size_mb: Some(max_size_mb),
            ..Default::default()
        };
        GenerationRequest::normalize(prompt, "balanced", &options).unwrap()
    }

    #[test]
    fn test_no_degradation_when_within_budget() {
        let budget = plan_budget(
            &request("a quiet meadow under a pale sky", 2.0),
            &KeywordClassifier,
        );
        assert_eq!(budget.width, 1280);
        assert_eq!(budget.height, 720);
        assert_eq!(budget.fps, 16);
        assert!((budget.duration_sec - 4.0).abs() < f64::EPSILON);
        assert!(budget.within_budget());
    }

    #[test]
    fn test_fps_reduced_first() {
        // Balanced at motion 1.0 estimates ~0.82 MB; 0.75 MB needs only
        // the fps step
        let budget = plan_budget(
            &request("a quiet meadow under a pale sky", 0.75),
            &KeywordClassifier,
        );
        assert_eq!(budget.fps, 13);
        assert_eq!(budget.width, 1280, "resolution must be untouched");
        assert!((budget.duration_sec - 4.0).abs() < f64::EPSILON);
        assert!(budget.within_budget());
    }

    #[test]
    fn test_full_ladder_in_fixed_order() {
        // High-motion prompt with the budget clamped up to 0.25 MB walks
        // every step and still ends over budget (best effort)
        let budget = plan_budget(
            &request("robots explode while drones chase them", 0.01),
            &KeywordClassifier,
        );
        assert!((budget.max_size_mb - 0.25).abs() < f64::EPSILON);
        assert!((budget.motion_complexity - 1.2).abs() < 1e-9);
        assert_eq!(budget.fps, 13);
        assert_eq!(budget.width, 1088);
        assert_eq!(budget.height, 612);
        assert!((budget.duration_sec - 3.2).abs() < 1e-9);
        // Estimate was recomputed after the last step
        assert!((budget.estimated_size_mb - budget.estimate_size_mb()).abs() < 1e-9);
        assert!(!budget.within_budget());
    }

    #[test]
    fn test_floors_hold() {
        let budget = plan_budget(
            &request("a rapid chaotic storm chase with shaking cameras", 0.25),
            &KeywordClassifier,
        );
        assert!(budget.width >= MIN_DIMENSION);
        assert!(budget.height >= MIN_DIMENSION);
        assert!(budget.fps >= MIN_FPS);
        assert!(budget.duration_sec >= MIN_DURATION_SEC);
    }

    #[test]
    fn test_motion_complexity_capped() {
        let busy = "run explode fight storm chase rapid chaotic shaking camera move";
        let budget = plan_budget(&request(busy, 2.0), &KeywordClassifier);
        assert!((budget.motion_complexity - 1.6).abs() < 1e-9);
    }
}

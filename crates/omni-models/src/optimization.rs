//! Advisory fallback quality tiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::budget::{round2, ResourceBudget};
use crate::mode::{MIN_DIMENSION, MIN_DURATION_SEC, MIN_FPS};

/// A single fallback quality tier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdaptiveTier {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_sec: f64,
}

impl AdaptiveTier {
    /// Relative resource cost of this tier (pixels per second of video).
    pub fn cost(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height) * f64::from(self.fps) * self.duration_sec
    }
}

/// Ordered fallback tiers surfaced to callers. Advisory metadata only;
/// the encoder runs its own ladder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OptimizationPlan {
    pub target_max_size_mb: f64,
    pub strict_size: bool,
    pub adaptive_tiers: Vec<AdaptiveTier>,
}

impl OptimizationPlan {
    /// Build the tier list from the settled budget: the current envelope
    /// first, then fps-, resolution- and duration-reduced tiers with the
    /// standard floors applied.
    pub fn from_budget(budget: &ResourceBudget, strict_size: bool) -> Self {
        let reduced_fps = budget.fps.saturating_sub(2).max(MIN_FPS);
        let reduced_width = scaled_floor(budget.width);
        let reduced_height = scaled_floor(budget.height);

        let adaptive_tiers = vec![
            AdaptiveTier {
                name: "current".to_string(),
                width: budget.width,
                height: budget.height,
                fps: budget.fps,
                duration_sec: budget.duration_sec,
            },
            AdaptiveTier {
                name: "fps-reduced".to_string(),
                width: budget.width,
                height: budget.height,
                fps: reduced_fps,
                duration_sec: budget.duration_sec,
            },
            AdaptiveTier {
                name: "resolution-reduced".to_string(),
                width: reduced_width,
                height: reduced_height,
                fps: reduced_fps,
                duration_sec: budget.duration_sec,
            },
            AdaptiveTier {
                name: "duration-reduced".to_string(),
                width: reduced_width,
                height: reduced_height,
                fps: reduced_fps,
                duration_sec: round2(budget.duration_sec * 0.75).max(MIN_DURATION_SEC),
            },
        ];

        Self {
            target_max_size_mb: budget.max_size_mb,
            strict_size,
            adaptive_tiers,
        }
    }
}

fn scaled_floor(dimension: u32) -> u32 {
    (((f64::from(dimension)) * 0.85).floor() as u32).max(MIN_DIMENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> ResourceBudget {
        ResourceBudget {
            max_size_mb: 2.0,
            width: 1280,
            height: 720,
            fps: 16,
            duration_sec: 4.0,
            estimated_size_mb: 0.8,
            motion_complexity: 1.0,
        }
    }

    #[test]
    fn test_tier_count_and_names() {
        let plan = OptimizationPlan::from_budget(&budget(), true);
        assert!(plan.adaptive_tiers.len() >= 3);
        let names: Vec<&str> = plan
            .adaptive_tiers
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "current",
                "fps-reduced",
                "resolution-reduced",
                "duration-reduced"
            ]
        );
    }

    #[test]
    fn test_tiers_monotonically_cheaper() {
        let plan = OptimizationPlan::from_budget(&budget(), true);
        let costs: Vec<f64> = plan.adaptive_tiers.iter().map(AdaptiveTier::cost).collect();
        for pair in costs.windows(2) {
            assert!(pair[1] <= pair[0], "tier costs must never increase");
        }
    }

    #[test]
    fn test_tiers_respect_floors() {
        let floor_budget = ResourceBudget {
            max_size_mb: 0.25,
            width: MIN_DIMENSION,
            height: MIN_DIMENSION,
            fps: MIN_FPS,
            duration_sec: MIN_DURATION_SEC,
            estimated_size_mb: 0.3,
            motion_complexity: 1.6,
        };
        let plan = OptimizationPlan::from_budget(&floor_budget, false);
        for tier in &plan.adaptive_tiers {
            assert!(tier.width >= MIN_DIMENSION);
            assert!(tier.height >= MIN_DIMENSION);
            assert!(tier.fps >= MIN_FPS);
            assert!(tier.duration_sec >= MIN_DURATION_SEC);
        }
    }
}

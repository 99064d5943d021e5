//! Output resource envelope and the size-estimate formula.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference pixel count the bitrate model is calibrated against (640x480).
const REFERENCE_PIXELS: f64 = 307_200.0;
/// Calibrated kilobits per reference-frame at unit motion complexity.
const KBPS_PER_REFERENCE_FRAME: f64 = 35.0;

/// Output resource envelope for a request.
///
/// Mutated in place by the degradation ladder; every other pipeline stage
/// treats it as read-only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceBudget {
    /// Caller byte budget in megabytes.
    pub max_size_mb: f64,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_sec: f64,
    /// Estimate under the current width/height/fps/duration, recomputed
    /// after every degradation step.
    pub estimated_size_mb: f64,
    /// Motion multiplier in [1.0, 1.6] derived from prompt keywords.
    pub motion_complexity: f64,
}

impl ResourceBudget {
    /// Estimated output size in megabytes for the current envelope.
    pub fn estimate_size_mb(&self) -> f64 {
        let pixels = f64::from(self.width) * f64::from(self.height);
        let kbps = (pixels / REFERENCE_PIXELS) * f64::from(self.fps)
            * KBPS_PER_REFERENCE_FRAME
            * self.motion_complexity;
        round3((kbps * self.duration_sec) / 8192.0)
    }

    /// Recompute and store the size estimate.
    pub fn refresh_estimate(&mut self) {
        self.estimated_size_mb = self.estimate_size_mb();
    }

    /// Whether the current estimate fits the caller budget.
    pub fn within_budget(&self) -> bool {
        self.estimated_size_mb <= self.max_size_mb
    }
}

/// Round to three decimal places (megabyte precision used throughout).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round to two decimal places (second precision used throughout).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

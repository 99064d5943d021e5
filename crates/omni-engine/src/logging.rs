//! Structured pipeline logging.
//!
//! Provides consistent logging for pipeline runs with automatic
//! contextual information (request id, stage name).

use tracing::{error, info, warn, Span};

/// Pipeline logger carrying the request id through every stage.
#[derive(Debug, Clone)]
pub struct PipelineLogger {
    request_id: String,
}

impl PipelineLogger {
    /// Create a logger for one pipeline run.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Log a stage transition.
    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(
            request_id = %self.request_id,
            stage = %stage,
            "{}", message
        );
    }

    /// Log a warning during a stage.
    pub fn log_warning(&self, stage: &str, message: &str) {
        warn!(
            request_id = %self.request_id,
            stage = %stage,
            "{}", message
        );
    }

    /// Log a pipeline failure.
    pub fn log_error(&self, stage: &str, message: &str) {
        error!(
            request_id = %self.request_id,
            stage = %stage,
            "{}", message
        );
    }

    /// Get the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Create a tracing span covering the whole run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("video_pipeline", request_id = %self.request_id)
    }
}

//! Engine error types.

use thiserror::Error;

use omni_media::MediaError;
use omni_models::RequestError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    /// The pipeline was built without a keyframe renderer but a request
    /// needed keyframes. There is no synthetic fallback image.
    #[error("keyframe generation requires an injected renderer")]
    RendererMissing,

    #[error("keyframe render failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a render failure error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

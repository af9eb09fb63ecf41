//! Renderer error types.

use deck_core::ResolveError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during image resolution and export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// The resource kind is not supported.
    #[error("Unsupported resource: {0}")]
    Unsupported(String),

    /// Rendering or encoding an export failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Writing export output failed.
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RenderError> for ResolveError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Unsupported(what) => Self::Unsupported(what),
            RenderError::Io(e) => Self::Io(e.to_string()),
            RenderError::Resource(msg) | RenderError::Export(msg) => Self::Decode(msg),
        }
    }
}

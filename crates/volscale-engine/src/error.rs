//! Engine error types.

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort an entire invocation.
///
/// Per-volume fetch and mutation failures are not errors at this
/// level; they surface as `SkipReason`s in the outcome list.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid strategy configuration. Raised before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The candidate volume set could not be resolved at all.
    #[error("directory error: {0}")]
    Directory(#[from] volscale_directory::DirectoryError),
}

//! Error types for the volume directory client.

use thiserror::Error;

/// Result type alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors that can occur talking to the volume directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("credential error: {0}")]
    Credential(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("volume not found: {0}")]
    VolumeNotFound(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Api {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None => Self::Network(e.to_string()),
        }
    }
}

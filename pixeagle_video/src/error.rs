//! Error type for the video capture layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("no video backend registered for scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("backend '{0}' is not registered")]
    BackendNotFound(String),

    #[error("failed to open '{uri}': {detail}")]
    OpenFailed { uri: String, detail: String },

    #[error("failed to read frame: {0}")]
    ReadFailed(String),

    #[error("no frame received within stall timeout")]
    StallTimeout,

    #[error("video source failed to reopen after {attempts} attempt(s)")]
    ReopenBudgetExhausted { attempts: u32 },
}

//! Error type for the detector layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("backend '{0}' is not registered")]
    BackendNotFound(String),

    #[error("model '{0}' is not in the model directory")]
    ModelNotFound(String),

    #[error("failed to load model '{model}': {detail}")]
    ModelLoadFailed { model: String, detail: String },

    #[error("inference timed out after {0}ms")]
    InferenceTimeout(u64),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("model directory error: {0}")]
    Io(#[from] std::io::Error),
}

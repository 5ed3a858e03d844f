use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or invoking the classifier artifacts.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read.
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact file is not valid JSON for the expected schema.
    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but its internal structure is inconsistent.
    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    /// A call needed an artifact that was not loaded.
    #[error("artifact not loaded: {0}")]
    Unavailable(&'static str),

    /// A feature vector did not match the model's expected input width.
    #[error("feature vector length {got} does not match model input {expected}")]
    FeatureShape { expected: usize, got: usize },
}

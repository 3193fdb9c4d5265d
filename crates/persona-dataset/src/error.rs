//! Error types for the dataset builder

use persona_core::PersonaError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Fatal errors. Malformed transcript lines are not fatal and never surface here;
/// see [`crate::transcript::RecordError`].
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read transcript {path}: {source}")]
    ReadTranscript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write dataset {path}: {source}")]
    WriteDataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] PersonaError),
}

//! Error types for the post-processing layer
//!
//! Collection, alignment and accumulation never fail: missing fields degrade
//! to zero fill, ragged sub-entity structure is padded, and topology gaps are
//! closed by the outer join at finalize time. Only schema-contract violations
//! at the public query/store boundary surface as errors.

use thiserror::Error;

/// Main error type for post-processing operations
#[derive(Error, Debug)]
pub enum PostError {
    #[error("Unknown response key '{requested}' - valid keys are {valid:?}")]
    UnknownResponseKey {
        requested: String,
        valid: Vec<String>,
    },

    #[error("Group '{0}' not found in store")]
    GroupNotFound(String),

    #[error("Dataset '{0}' not found in store")]
    DatasetNotFound(String),

    #[error("Accumulator not initialized - call initialize() first")]
    NotInitialized,

    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for post-processing operations
pub type PostResult<T> = Result<T, PostError>;

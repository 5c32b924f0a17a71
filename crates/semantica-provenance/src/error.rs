//! Error types for provenance tracking

use semantica_store::StoreError;
use thiserror::Error;

/// Result type alias for provenance operations
pub type Result<T> = std::result::Result<T, ProvenanceError>;

/// Errors that can occur while recording or querying provenance
///
/// Looking up an unknown id is never an error; these variants cover caller
/// misuse and backend failure only.
#[derive(Error, Debug)]
pub enum ProvenanceError {
    /// Structurally invalid input (empty id, non-finite confidence, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding of a metadata payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

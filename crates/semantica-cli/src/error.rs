//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provenance manager error
    #[error("{0}")]
    Provenance(#[from] semantica_provenance::ProvenanceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No entry with the given id
    #[error("No provenance entry for '{0}'")]
    NotFound(String),

    /// Stored checksums did not verify
    #[error("Integrity check failed for {0} entr(ies)")]
    IntegrityFailed(usize),
}

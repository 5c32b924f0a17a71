//! Semantica Storage Layer
//!
//! Implements the `ProvenanceStorage` trait twice:
//!
//! - [`InMemoryStorage`]: a hash map, for tests and short-lived pipelines
//! - [`SqliteStorage`]: a single SQLite table with JSON text columns for
//!   `used_entities` and `metadata`, persistent across processes
//!
//! # Examples
//!
//! ```no_run
//! use semantica_domain::{ProvenanceEntry, ProvenanceStorage};
//! use semantica_store::SqliteStorage;
//!
//! let mut storage = SqliteStorage::new("provenance.db").unwrap();
//! storage.store(&ProvenanceEntry::new("doc_1", "document", "ingest")).unwrap();
//! let lineage = storage.trace_lineage("doc_1").unwrap();
//! assert_eq!(lineage.len(), 1);
//! ```

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON encoding of a text column failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable database path
    #[error("Invalid database path: {0}")]
    InvalidPath(String),
}

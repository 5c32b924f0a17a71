//! Semantica Domain Layer
//!
//! This crate contains the schema of Semantica's provenance subsystem and the
//! trait interface every storage backend implements. It deliberately carries
//! only serialization and time primitives as dependencies; storage engines,
//! hashing and the manager live in other crates.
//!
//! ## Key Concepts
//!
//! - **ProvenanceEntry**: one recorded fact "entity X was produced by activity Y
//!   from source Z at time T"
//! - **SourceReference**: an audit-grade citation of external material
//! - **PropertySource**: one property value bound to the sources asserting it
//! - **Lineage**: the transitive closure of an entry's upstream links
//!
//! ## Architecture
//!
//! - Value objects only; no I/O
//! - `ProvenanceStorage` is the seam implemented by `semantica-store`
//! - Lineage traversal is defined once here and reused by every backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod id;
pub mod metadata;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use entry::{ProvenanceEntry, DEFAULT_AGENT_ID, DEFAULT_VERSION};
pub use id::generate_entity_id;
pub use metadata::{now_timestamp, Metadata};
pub use source::{PropertySource, SourceReference};
pub use traits::{breadth_first_lineage, ProvenanceStorage};

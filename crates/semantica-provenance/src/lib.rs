//! Semantica Provenance
//!
//! Records where every derived artifact of a knowledge pipeline came from and
//! answers lineage questions about it.
//!
//! # Overview
//!
//! Producers (ingestion, chunking, extraction, LLM calls, ...) report what
//! they made through the [`ProvenanceManager`]. The manager builds a
//! [`ProvenanceEntry`](semantica_domain::ProvenanceEntry), stamps it with a
//! SHA-256 checksum and upserts it into the configured backend. Any consumer
//! can later walk the recorded parent and `used_entities` links with
//! [`ProvenanceManager::get_lineage`].
//!
//! # Architecture
//!
//! ```text
//! producer → ProvenanceManager → integrity (checksum) → ProvenanceStorage
//!                    ↑                                    ├ InMemoryStorage
//!            BridgeAxiom / chains                         └ SqliteStorage
//! ```
//!
//! # Key Features
//!
//! - **Audit-grade citations**: document, location and verbatim quote per entry
//! - **Fan-in lineage**: a parent link plus any number of used entities
//! - **Tamper detection**: [`integrity`] checksums over identity fields
//! - **Property conflicts**: per-source bindings of disputed property values
//! - **Bridge axioms**: cited unit conversions chained with weakest-link confidence
//!
//! # Example Usage
//!
//! ```
//! use semantica_provenance::{ProvenanceConfig, ProvenanceManager, TrackOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut manager = ProvenanceManager::new(ProvenanceConfig::in_memory())?;
//!
//! manager.track_entity(
//!     "person_ada",
//!     "biography.pdf",
//!     TrackOptions::new()
//!         .entity_type("person")
//!         .activity("ner_extraction")
//!         .location("page 4")
//!         .confidence(0.93),
//! )?;
//!
//! let entry = manager.get_provenance("person_ada")?.ok_or("missing")?;
//! assert!(semantica_provenance::integrity::verify_checksum(&entry, None));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod integrity;
pub mod manager;
pub mod types;

pub use bridge::{
    create_translation_chain, trace_translation_chain, AxiomApplication, BridgeAxiom,
    ChainBuilder, ChainInput, ChainLayer, ChainTrace, LayerLineage, LayerType, TranslationChain,
};
pub use config::{BatchFailurePolicy, ProvenanceConfig};
pub use error::{ProvenanceError, Result};
pub use manager::{BoxedStorage, ProvenanceManager};
pub use types::{
    ChunkRecord, ChunkSpan, EntityRecord, IntegrityReport, LineageReport, ProvenanceStatistics,
    TrackOptions,
};

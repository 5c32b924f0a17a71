//! Semantica Provenance Adapters
//!
//! Opt-in provenance tracking for the producers of a knowledge pipeline.
//!
//! # Architecture
//!
//! Each producer family is a trait (`Ingestor`, `EntityExtractor`,
//! `LlmProvider`, ...). Wrapping an implementation in [`Tracked`] yields the
//! same trait with provenance recorded after every successful call:
//!
//! ```text
//! caller → Tracked<T> → T (unchanged result)
//!              └──────→ ProvenanceManager (best effort, errors logged)
//! ```
//!
//! With tracking disabled the wrapper adds nothing but a `None` check, and a
//! failure to record provenance never fails the wrapped operation.
//!
//! # Producers
//!
//! | Module      | Traits                                                    |
//! |-------------|-----------------------------------------------------------|
//! | `document`  | `Ingestor`, `DocumentParser`, `Normalizer`, `Chunker`     |
//! | `embeddings`| `Embedder`                                                |
//! | `extract`   | `EntityExtractor`, `RelationExtractor`, `Deduplicator`    |
//! | `llms`      | `LlmProvider`                                             |
//! | `knowledge` | `Reasoner`, `ContextBuilder`, `OntologyGenerator`         |
//! | `stores`    | `GraphStore`, `VectorStore`, `TripletStore`               |
//! | `output`    | `Exporter`, `Visualizer`                                  |
//! | `pipeline`  | `PipelineStep`                                            |

#![warn(missing_docs)]

pub mod document;
pub mod embeddings;
pub mod extract;
pub mod knowledge;
pub mod llms;
pub mod output;
pub mod pipeline;
pub mod stores;
pub mod toggle;
pub mod tracked;

pub use document::{
    Chunker, Document, DocumentParser, Ingestor, NormalizedText, Normalizer, ParsedDocument,
    TextChunk,
};
pub use embeddings::{Embedder, Embedding};
pub use extract::{Deduplicated, Deduplicator, Entity, EntityExtractor, Relation, RelationExtractor};
pub use knowledge::{Context, ContextBuilder, Inference, Ontology, OntologyGenerator, Reasoner};
pub use llms::{estimate_tokens, LlmError, LlmProvider, MockProvider};
pub use output::{ExportReceipt, Exporter, Rendering, Visualizer};
pub use pipeline::PipelineStep;
pub use stores::{GraphEdge, GraphNode, GraphStore, Triple, TripletStore, VectorStore};
pub use toggle::{share, ProvenanceToggle, SharedManager};
pub use tracked::Tracked;

//! Request and report types for the ProvenanceManager

use semantica_domain::{Metadata, ProvenanceEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional fields accepted by the `track_*` methods
///
/// Anything left unset falls back to the method's default (entity type,
/// activity) or the manager's configuration (agent, version).
///
/// # Examples
///
/// ```
/// use semantica_provenance::TrackOptions;
///
/// let options = TrackOptions::new()
///     .entity_type("person")
///     .activity("ner_extraction")
///     .confidence(0.92)
///     .metadata_value("text", "Ada Lovelace");
/// assert_eq!(options.confidence, Some(0.92));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackOptions {
    /// Entity type override
    pub entity_type: Option<String>,
    /// Producing activity
    pub activity_id: Option<String>,
    /// Responsible agent
    pub agent_id: Option<String>,
    /// Location within the source
    pub source_location: Option<String>,
    /// Verbatim source excerpt
    pub source_quote: Option<String>,
    /// Upstream derivation link
    pub parent_entity_id: Option<String>,
    /// Additional upstream entities
    pub used_entities: Vec<String>,
    /// Start offset within the source
    pub start_index: Option<i64>,
    /// End offset within the source
    pub end_index: Option<i64>,
    /// Reliability score
    pub confidence: Option<f64>,
    /// Source trust score
    pub credibility: Option<f64>,
    /// Free-form payload
    pub metadata: Metadata,
    /// Entry version override
    pub version: Option<String>,
}

impl TrackOptions {
    /// Options with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity type
    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Set the producing activity
    pub fn activity(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }

    /// Set the responsible agent
    pub fn agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Set the location within the source
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.source_location = Some(location.into());
        self
    }

    /// Set the verbatim source excerpt
    pub fn quote(mut self, quote: impl Into<String>) -> Self {
        self.source_quote = Some(quote.into());
        self
    }

    /// Set the upstream derivation link
    pub fn parent(mut self, parent_entity_id: impl Into<String>) -> Self {
        self.parent_entity_id = Some(parent_entity_id.into());
        self
    }

    /// Append an upstream entity
    pub fn used_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.used_entities.push(entity_id.into());
        self
    }

    /// Set the reliability score
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the source trust score
    pub fn credibility(mut self, credibility: f64) -> Self {
        self.credibility = Some(credibility);
        self
    }

    /// Replace the metadata payload
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Insert one metadata value
    pub fn metadata_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the character span within the source
    pub fn span(mut self, start_index: i64, end_index: i64) -> Self {
        self.start_index = Some(start_index);
        self.end_index = Some(end_index);
        self
    }

    /// Set the entry version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Position of a chunk within its source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// Filesystem path or URL the chunk was read from
    #[serde(default)]
    pub source_path: Option<String>,
    /// Start character offset
    #[serde(default)]
    pub start_index: Option<i64>,
    /// End character offset
    #[serde(default)]
    pub end_index: Option<i64>,
    /// Chunk (or document) this chunk was split from
    #[serde(default)]
    pub parent_chunk_id: Option<String>,
}

impl ChunkSpan {
    /// Span over `[start, end)` with no parent
    pub fn new(start_index: i64, end_index: i64) -> Self {
        Self {
            start_index: Some(start_index),
            end_index: Some(end_index),
            ..Self::default()
        }
    }

    /// Set the parent chunk
    pub fn with_parent(mut self, parent_chunk_id: impl Into<String>) -> Self {
        self.parent_chunk_id = Some(parent_chunk_id.into());
        self
    }

    /// Set the source path
    pub fn with_source_path(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }
}

/// One item of an entity batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Entity identifier
    pub entity_id: String,
    /// Entity type; "entity" when absent
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Surface text, stored under the `text` metadata key
    #[serde(default)]
    pub text: Option<String>,
    /// Extraction confidence
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Extra payload
    #[serde(default)]
    pub metadata: Metadata,
}

impl EntityRecord {
    /// Record with only an id
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_options(&self) -> TrackOptions {
        let mut options = TrackOptions::new().metadata(self.metadata.clone());
        options.entity_type = self.entity_type.clone();
        options.confidence = self.confidence;
        if let Some(text) = &self.text {
            options.metadata.insert("text".to_string(), text.clone().into());
        }
        options
    }
}

/// One item of a chunk batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk identifier
    pub chunk_id: String,
    /// Position within the source
    #[serde(flatten)]
    pub span: ChunkSpan,
    /// Chunk text, stored under the `text` metadata key
    #[serde(default)]
    pub text: Option<String>,
    /// Extra payload
    #[serde(default)]
    pub metadata: Metadata,
}

impl ChunkRecord {
    /// Record for a chunk at the given span
    pub fn new(chunk_id: impl Into<String>, span: ChunkSpan) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            span,
            text: None,
            metadata: Metadata::new(),
        }
    }

    pub(crate) fn to_options(&self) -> TrackOptions {
        let mut options = TrackOptions::new().metadata(self.metadata.clone());
        if let Some(text) = &self.text {
            options.metadata.insert("text".to_string(), text.clone().into());
        }
        options
    }
}

/// Full derivation chain of one entity
///
/// An empty report (unknown entity) serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageReport {
    /// Entity the walk started from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entity_id: String,

    /// Reachable entries in breadth-first discovery order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage_chain: Vec<ProvenanceEntry>,

    /// Distinct source documents, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_documents: Vec<String>,

    /// Distinct activities, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,

    /// Distinct agents, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<String>,

    /// Number of entries in the chain
    #[serde(default, skip_serializing_if = "is_zero")]
    pub depth: usize,

    /// Weakest confidence anywhere in the chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

impl LineageReport {
    /// Build a report from a traced chain; an empty chain gives an empty report
    pub fn from_chain(entity_id: &str, chain: Vec<ProvenanceEntry>) -> Self {
        if chain.is_empty() {
            return Self::default();
        }

        let mut report = Self {
            entity_id: entity_id.to_string(),
            depth: chain.len(),
            ..Self::default()
        };

        for entry in &chain {
            if let Some(doc) = &entry.source_document {
                push_unique(&mut report.source_documents, doc);
            }
            push_unique(&mut report.activities, &entry.activity_id);
            push_unique(&mut report.agents, &entry.agent_id);
            report.min_confidence = Some(match report.min_confidence {
                Some(current) => current.min(entry.confidence),
                None => entry.confidence,
            });
        }

        report.lineage_chain = chain;
        report
    }

    /// Whether the entity was unknown
    pub fn is_empty(&self) -> bool {
        self.lineage_chain.is_empty()
    }

    /// Whether `entity_id` appears anywhere in the chain
    pub fn contains(&self, entity_id: &str) -> bool {
        self.lineage_chain.iter().any(|e| e.entity_id == entity_id)
    }

    /// Entries upstream of the starting entity
    pub fn ancestors(&self) -> &[ProvenanceEntry] {
        self.lineage_chain.get(1..).unwrap_or(&[])
    }
}

/// Aggregate counts over everything in storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceStatistics {
    /// Number of stored entries
    pub total_entries: usize,
    /// Entries per entity type
    pub entity_types: BTreeMap<String, usize>,
    /// Entries per activity
    pub activities: BTreeMap<String, usize>,
    /// Number of distinct source documents
    pub source_documents: usize,
    /// Mean confidence (0.0 when empty)
    pub average_confidence: f64,
}

/// Result of re-verifying stored checksums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Entries examined
    pub checked: usize,
    /// Entries whose checksum matched
    pub valid: usize,
    /// Entries whose checksum did not match
    pub invalid: Vec<String>,
    /// Entries stored without a checksum
    pub missing_checksum: Vec<String>,
}

impl IntegrityReport {
    /// True when every examined entry verified
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.missing_checksum.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_report_serializes_as_empty_object() {
        let report = LineageReport::from_chain("missing", Vec::new());
        assert!(report.is_empty());
        assert_eq!(serde_json::to_value(&report).unwrap(), json!({}));
    }

    #[test]
    fn test_report_aggregates() {
        let chain = vec![
            ProvenanceEntry::new("entity_1", "entity", "ner")
                .with_source_document("chunk_1")
                .with_confidence(0.9),
            ProvenanceEntry::new("chunk_1", "chunk", "chunking")
                .with_source_document("doc_1")
                .with_confidence(0.7),
            ProvenanceEntry::new("doc_1", "document", "ingest")
                .with_source_document("doc_1")
                .with_agent("crawler"),
        ];
        let report = LineageReport::from_chain("entity_1", chain);

        assert_eq!(report.depth, 3);
        assert_eq!(report.source_documents, vec!["chunk_1", "doc_1"]);
        assert_eq!(report.activities, vec!["ner", "chunking", "ingest"]);
        assert_eq!(report.agents, vec!["semantica", "crawler"]);
        assert_eq!(report.min_confidence, Some(0.7));
        assert_eq!(report.ancestors().len(), 2);
        assert!(report.contains("doc_1"));
    }

    #[test]
    fn test_entity_record_text_lands_in_metadata() {
        let mut record = EntityRecord::new("e1");
        record.text = Some("Ada".to_string());
        record.confidence = Some(0.5);
        let options = record.to_options();
        assert_eq!(options.metadata["text"], json!("Ada"));
        assert_eq!(options.confidence, Some(0.5));
    }

    #[test]
    fn test_chunk_record_deserializes_flat_span() {
        let record: ChunkRecord = serde_json::from_value(json!({
            "chunk_id": "c1",
            "start_index": 0,
            "end_index": 10,
            "parent_chunk_id": "doc_1"
        }))
        .unwrap();
        assert_eq!(record.span.end_index, Some(10));
        assert_eq!(record.span.parent_chunk_id.as_deref(), Some("doc_1"));
    }
}

//! Provenance entries, the unit of lineage (PROV-O inspired)

use crate::metadata::{now_timestamp, Metadata};
use serde::{Deserialize, Serialize};

/// Agent recorded when the caller does not name one
pub const DEFAULT_AGENT_ID: &str = "semantica";

/// Schema version stamped on new entries
pub const DEFAULT_VERSION: &str = "1.0";

/// A single provenance entry describing how one artifact was produced
///
/// Entries are value objects. Storing an entry copies it into the backend;
/// mutating a retrieved entry never changes stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    /// Identifier of the derived artifact (unique per storage backend)
    pub entity_id: String,

    /// Category tag: "entity", "relationship", "chunk", "property", ...
    pub entity_type: String,

    /// Operation that produced this entry (e.g. "ner_extraction")
    #[serde(default)]
    pub activity_id: String,

    /// Responsible system or agent
    #[serde(default = "default_agent_id")]
    pub agent_id: String,

    /// Originating document identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,

    /// Location within the source (page, figure, section)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<String>,

    /// Verbatim excerpt from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_quote: Option<String>,

    /// When this entry was recorded (ISO-8601)
    pub timestamp: String,

    /// First time this entity id was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,

    /// Most recent time this entity id was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Caller-supplied reliability score, nominally [0.0, 1.0]
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// SHA-256 hex digest over the identity fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Single upstream derivation link (PROV "wasDerivedFrom")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_entity_id: Option<String>,

    /// Additional upstream entities consumed (PROV "used")
    #[serde(default)]
    pub used_entities: Vec<String>,

    /// Start of the character span (chunks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,

    /// End of the character span (chunks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<i64>,

    /// Source-level trust score, distinct from `confidence`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility: Option<f64>,

    /// Free-form payload
    #[serde(default)]
    pub metadata: Metadata,

    /// Entry schema version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_agent_id() -> String {
    DEFAULT_AGENT_ID.to_string()
}

fn default_confidence() -> f64 {
    1.0
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl ProvenanceEntry {
    /// Create a new entry stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use semantica_domain::ProvenanceEntry;
    ///
    /// let entry = ProvenanceEntry::new("entity_1", "entity", "ner_extraction")
    ///     .with_source_document("paper.pdf")
    ///     .with_confidence(0.9);
    /// assert_eq!(entry.agent_id, "semantica");
    /// assert_eq!(entry.source_document.as_deref(), Some("paper.pdf"));
    /// ```
    pub fn new(
        entity_id: impl Into<String>,
        entity_type: impl Into<String>,
        activity_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type: entity_type.into(),
            activity_id: activity_id.into(),
            agent_id: default_agent_id(),
            source_document: None,
            source_location: None,
            source_quote: None,
            timestamp: now_timestamp(),
            first_seen: None,
            last_updated: None,
            confidence: 1.0,
            checksum: None,
            parent_entity_id: None,
            used_entities: Vec::new(),
            start_index: None,
            end_index: None,
            credibility: None,
            metadata: Metadata::new(),
            version: default_version(),
        }
    }

    /// Set the responsible agent
    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    /// Set the originating document
    pub fn with_source_document(mut self, document: impl Into<String>) -> Self {
        self.source_document = Some(document.into());
        self
    }

    /// Set the location within the source
    pub fn with_source_location(mut self, location: impl Into<String>) -> Self {
        self.source_location = Some(location.into());
        self
    }

    /// Set the verbatim source excerpt
    pub fn with_source_quote(mut self, quote: impl Into<String>) -> Self {
        self.source_quote = Some(quote.into());
        self
    }

    /// Override the recording timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Set the confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the parent derivation link
    pub fn with_parent(mut self, parent_entity_id: impl Into<String>) -> Self {
        self.parent_entity_id = Some(parent_entity_id.into());
        self
    }

    /// Append an upstream entity consumed by this one
    pub fn with_used_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.used_entities.push(entity_id.into());
        self
    }

    /// Set the character span
    pub fn with_span(mut self, start_index: Option<i64>, end_index: Option<i64>) -> Self {
        self.start_index = start_index;
        self.end_index = end_index;
        self
    }

    /// Set the source credibility score
    pub fn with_credibility(mut self, credibility: f64) -> Self {
        self.credibility = Some(credibility);
        self
    }

    /// Replace the metadata payload
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Insert a single metadata value
    pub fn with_metadata_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Upstream ids in traversal order: the parent first, then `used_entities`
    pub fn upstream_ids(&self) -> impl Iterator<Item = &str> {
        self.parent_entity_id
            .as_deref()
            .into_iter()
            .chain(self.used_entities.iter().map(String::as_str))
    }

    /// Render the entry as a plain JSON mapping
    pub fn to_map(&self) -> Metadata {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A struct of strings, numbers and maps always serializes to an object
            _ => Metadata::new(),
        }
    }
}

//! The ProvenanceManager façade

use crate::config::{BatchFailurePolicy, ProvenanceConfig};
use crate::error::{ProvenanceError, Result};
use crate::integrity::{compute_checksum, verify_checksum};
use crate::types::{
    ChunkRecord, ChunkSpan, EntityRecord, IntegrityReport, LineageReport, ProvenanceStatistics,
    TrackOptions,
};
use semantica_domain::{
    now_timestamp, Metadata, PropertySource, ProvenanceEntry, ProvenanceStorage, SourceReference,
};
use semantica_store::{InMemoryStorage, SqliteStorage, StoreError};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, info, warn};

/// Storage backend owned by a manager
pub type BoxedStorage = Box<dyn ProvenanceStorage<Error = StoreError> + Send>;

const ENTITY: &str = "entity";
const RELATIONSHIP: &str = "relationship";
const CHUNK: &str = "chunk";
const PROPERTY: &str = "property";

/// Single entry point for recording and querying provenance
///
/// Writes validate strictly and fail fast; reads of unknown ids return
/// empty results.
///
/// # Examples
///
/// ```
/// use semantica_provenance::{ChunkSpan, ProvenanceManager, TrackOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut manager = ProvenanceManager::in_memory();
///
/// manager.track_entity("doc_1", "file.pdf", TrackOptions::new().entity_type("document"))?;
/// manager.track_chunk("chunk_1", "doc_1", ChunkSpan::new(0, 512).with_parent("doc_1"), TrackOptions::new())?;
/// manager.track_entity("entity_1", "chunk_1", TrackOptions::new().activity("ner_extraction"))?;
///
/// let lineage = manager.get_lineage("entity_1")?;
/// assert_eq!(lineage.depth, 3);
/// assert!(lineage.source_documents.contains(&"doc_1".to_string()));
/// # Ok(())
/// # }
/// ```
pub struct ProvenanceManager {
    storage: BoxedStorage,
    config: ProvenanceConfig,
}

impl fmt::Debug for ProvenanceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvenanceManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProvenanceManager {
    /// Create a manager, choosing SQLite when `storage_path` is set and
    /// in-memory storage otherwise
    pub fn new(config: ProvenanceConfig) -> Result<Self> {
        config.validate().map_err(ProvenanceError::Config)?;

        let storage: BoxedStorage = match &config.storage_path {
            Some(path) => Box::new(SqliteStorage::new(path)?),
            None => Box::new(InMemoryStorage::new()),
        };

        info!(
            "Provenance manager ready ({})",
            match &config.storage_path {
                Some(path) => format!("sqlite: {}", path.display()),
                None => "in-memory".to_string(),
            }
        );
        Ok(Self { storage, config })
    }

    /// Create a manager over fresh in-memory storage with default settings
    pub fn in_memory() -> Self {
        Self {
            storage: Box::new(InMemoryStorage::new()),
            config: ProvenanceConfig::in_memory(),
        }
    }

    /// Create a manager over an existing backend
    ///
    /// `config.storage_path` is ignored; the given backend is used as is.
    pub fn with_storage<S>(storage: S, config: ProvenanceConfig) -> Self
    where
        S: ProvenanceStorage<Error = StoreError> + Send + 'static,
    {
        Self {
            storage: Box::new(storage),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ProvenanceConfig {
        &self.config
    }

    /// Record the provenance of an entity
    ///
    /// `source` is the originating document or upstream entity id. Entity
    /// type defaults to "entity".
    pub fn track_entity(
        &mut self,
        entity_id: &str,
        source: &str,
        options: TrackOptions,
    ) -> Result<ProvenanceEntry> {
        let entry = self.build_entry(entity_id, ENTITY, "entity_tracking", source, options)?;
        self.persist(entry)
    }

    /// Record the provenance of a relationship
    pub fn track_relationship(
        &mut self,
        relationship_id: &str,
        source: &str,
        mut options: TrackOptions,
    ) -> Result<ProvenanceEntry> {
        options.entity_type = Some(RELATIONSHIP.to_string());
        let entry = self.build_entry(
            relationship_id,
            RELATIONSHIP,
            "relationship_tracking",
            source,
            options,
        )?;
        self.persist(entry)
    }

    /// Record the provenance of a document chunk
    ///
    /// The span's `parent_chunk_id` becomes the parent link and its
    /// `source_path` the source location.
    pub fn track_chunk(
        &mut self,
        chunk_id: &str,
        source_document: &str,
        span: ChunkSpan,
        mut options: TrackOptions,
    ) -> Result<ProvenanceEntry> {
        options.start_index = span.start_index;
        options.end_index = span.end_index;
        options.entity_type = Some(CHUNK.to_string());
        if span.parent_chunk_id.is_some() {
            options.parent_entity_id = span.parent_chunk_id.clone();
        }
        if let Some(path) = &span.source_path {
            options
                .metadata
                .insert("source_path".to_string(), path.clone().into());
            if options.source_location.is_none() {
                options.source_location = Some(path.clone());
            }
        }

        let entry = self.build_entry(chunk_id, CHUNK, "chunking", source_document, options)?;
        self.persist(entry)
    }

    /// Record which source asserted one property value of an entity
    ///
    /// Each (entity, property, document) triple gets its own entry with id
    /// `"{entity_id}:{property_name}:{document}"`, parented to the entity, so
    /// conflicting values from different sources coexist. `\` and `:` inside
    /// a part are backslash-escaped so distinct triples never share an id.
    pub fn track_property_source(
        &mut self,
        entity_id: &str,
        property_name: &str,
        value: serde_json::Value,
        source: &SourceReference,
        metadata: Metadata,
    ) -> Result<ProvenanceEntry> {
        require_non_empty("entity_id", entity_id)?;
        require_non_empty("property_name", property_name)?;
        require_non_empty("source document", &source.document)?;

        let mut payload = metadata;
        payload.insert("entity_id".to_string(), entity_id.into());
        payload.insert("property_name".to_string(), property_name.into());
        payload.insert("value".to_string(), value);
        payload.insert("source".to_string(), serde_json::to_value(source)?);

        let mut options = TrackOptions::new()
            .entity_type(PROPERTY)
            .activity("property_tracking")
            .parent(entity_id)
            .confidence(source.confidence)
            .metadata(payload);
        options.source_location = source.location();

        let property_entry_id = property_entry_id(entity_id, property_name, &source.document);
        let mut entry = self.build_entry(
            &property_entry_id,
            PROPERTY,
            "property_tracking",
            &source.document,
            options,
        )?;
        if let Some(observed) = &source.timestamp {
            entry.first_seen = Some(observed.clone());
        }
        self.persist(entry)
    }

    /// Regroup recorded property sources of an entity by (property, value)
    ///
    /// Several `PropertySource`s sharing a property name indicate a conflict.
    pub fn get_property_sources(&self, entity_id: &str) -> Result<Vec<PropertySource>> {
        let mut grouped: Vec<PropertySource> = Vec::new();

        for entry in self.storage.retrieve_all(Some(PROPERTY))? {
            if entry.metadata.get("entity_id").and_then(|v| v.as_str()) != Some(entity_id) {
                continue;
            }
            let Some(property_name) = entry.metadata.get("property_name").and_then(|v| v.as_str())
            else {
                continue;
            };
            let value = entry
                .metadata
                .get("value")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            let source = entry
                .metadata
                .get("source")
                .and_then(|s| serde_json::from_value::<SourceReference>(s.clone()).ok())
                .unwrap_or_else(|| {
                    SourceReference::new(entry.source_document.clone().unwrap_or_default())
                        .with_confidence(entry.confidence)
                });

            match grouped
                .iter_mut()
                .find(|p| p.property_name == property_name && p.value == value)
            {
                Some(existing) => existing.add_source(source),
                None => {
                    let mut binding = PropertySource::new(entity_id, property_name, value);
                    binding.add_source(source);
                    grouped.push(binding);
                }
            }
        }

        grouped.sort_by(|a, b| a.property_name.cmp(&b.property_name));
        Ok(grouped)
    }

    /// Track many entities from one source, returning how many were recorded
    ///
    /// Per-item failures follow the configured `BatchFailurePolicy`.
    pub fn track_entities_batch(&mut self, entities: &[EntityRecord], source: &str) -> Result<usize> {
        let mut tracked = 0;
        for record in entities {
            let outcome = self.track_entity(&record.entity_id, source, record.to_options());
            tracked += self.batch_outcome(outcome, &record.entity_id)?;
        }

        info!("Tracked {}/{} entities from {}", tracked, entities.len(), source);
        Ok(tracked)
    }

    /// Track many chunks of one document, returning how many were recorded
    pub fn track_chunks_batch(
        &mut self,
        chunks: &[ChunkRecord],
        source_document: &str,
    ) -> Result<usize> {
        let mut tracked = 0;
        for record in chunks {
            let outcome = self.track_chunk(
                &record.chunk_id,
                source_document,
                record.span.clone(),
                record.to_options(),
            );
            tracked += self.batch_outcome(outcome, &record.chunk_id)?;
        }

        info!(
            "Tracked {}/{} chunks of {}",
            tracked,
            chunks.len(),
            source_document
        );
        Ok(tracked)
    }

    fn batch_outcome(&self, outcome: Result<ProvenanceEntry>, item_id: &str) -> Result<usize> {
        match (outcome, self.config.batch_failure_policy) {
            (Ok(_), _) => Ok(1),
            (Err(e), BatchFailurePolicy::FailFast) => Err(e),
            (Err(e), BatchFailurePolicy::SkipFailed) => {
                warn!("Skipping batch item '{}': {}", item_id, e);
                Ok(0)
            }
        }
    }

    /// Get the recorded entry for an id
    pub fn get_provenance(&self, entity_id: &str) -> Result<Option<ProvenanceEntry>> {
        Ok(self.storage.retrieve(entity_id)?)
    }

    /// Reconstruct the derivation chain of an entity
    ///
    /// Unknown ids give an empty report, never an error.
    pub fn get_lineage(&self, entity_id: &str) -> Result<LineageReport> {
        let chain = self.storage.trace_lineage(entity_id)?;
        debug!("Lineage of {} has {} entries", entity_id, chain.len());
        Ok(LineageReport::from_chain(entity_id, chain))
    }

    /// List stored entries, optionally of one type
    pub fn list_entries(&self, entity_type: Option<&str>) -> Result<Vec<ProvenanceEntry>> {
        Ok(self.storage.retrieve_all(entity_type)?)
    }

    /// Aggregate counts over all stored entries
    pub fn get_statistics(&self) -> Result<ProvenanceStatistics> {
        let entries = self.storage.retrieve_all(None)?;

        let mut entity_types = BTreeMap::new();
        let mut activities = BTreeMap::new();
        let mut documents = HashSet::new();
        let mut confidence_sum = 0.0;

        for entry in &entries {
            *entity_types.entry(entry.entity_type.clone()).or_insert(0) += 1;
            if !entry.activity_id.is_empty() {
                *activities.entry(entry.activity_id.clone()).or_insert(0) += 1;
            }
            if let Some(doc) = &entry.source_document {
                documents.insert(doc.as_str());
            }
            confidence_sum += entry.confidence;
        }

        Ok(ProvenanceStatistics {
            total_entries: entries.len(),
            entity_types,
            activities,
            source_documents: documents.len(),
            average_confidence: if entries.is_empty() {
                0.0
            } else {
                confidence_sum / entries.len() as f64
            },
        })
    }

    /// Re-verify one stored entry; `None` when the id is unknown
    pub fn verify_entry(&self, entity_id: &str) -> Result<Option<bool>> {
        Ok(self
            .storage
            .retrieve(entity_id)?
            .map(|entry| verify_checksum(&entry, None)))
    }

    /// Re-verify every stored entry
    pub fn verify_all(&self) -> Result<IntegrityReport> {
        let mut report = IntegrityReport::default();

        for entry in self.storage.retrieve_all(None)? {
            report.checked += 1;
            match &entry.checksum {
                None => report.missing_checksum.push(entry.entity_id),
                Some(_) if verify_checksum(&entry, None) => report.valid += 1,
                Some(_) => {
                    warn!("Checksum mismatch for provenance entry {}", entry.entity_id);
                    report.invalid.push(entry.entity_id);
                }
            }
        }

        Ok(report)
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&mut self) -> Result<usize> {
        Ok(self.storage.clear()?)
    }

    fn build_entry(
        &self,
        entity_id: &str,
        default_type: &str,
        default_activity: &str,
        source: &str,
        options: TrackOptions,
    ) -> Result<ProvenanceEntry> {
        require_non_empty("entity_id", entity_id)?;
        require_non_empty("source", source)?;

        let confidence = options.confidence.unwrap_or(1.0);
        if !confidence.is_finite() {
            return Err(ProvenanceError::Validation(format!(
                "confidence for '{}' must be finite",
                entity_id
            )));
        }
        if let Some(credibility) = options.credibility {
            if !credibility.is_finite() {
                return Err(ProvenanceError::Validation(format!(
                    "credibility for '{}' must be finite",
                    entity_id
                )));
            }
        }

        if let (Some(start), Some(end)) = (options.start_index, options.end_index) {
            if start > end {
                return Err(ProvenanceError::Validation(format!(
                    "'{}' has start_index {} after end_index {}",
                    entity_id, start, end
                )));
            }
        }

        let mut parent_entity_id = options.parent_entity_id;
        if parent_entity_id.is_none()
            && self.config.link_tracked_sources
            && source != entity_id
            && self.storage.retrieve(source)?.is_some()
        {
            parent_entity_id = Some(source.to_string());
        }

        Ok(ProvenanceEntry {
            entity_id: entity_id.to_string(),
            entity_type: options
                .entity_type
                .unwrap_or_else(|| default_type.to_string()),
            activity_id: options
                .activity_id
                .unwrap_or_else(|| default_activity.to_string()),
            agent_id: options
                .agent_id
                .unwrap_or_else(|| self.config.agent_id.clone()),
            source_document: Some(source.to_string()),
            source_location: options.source_location,
            source_quote: options.source_quote,
            timestamp: now_timestamp(),
            first_seen: None,
            last_updated: None,
            confidence,
            checksum: None,
            parent_entity_id,
            used_entities: options.used_entities,
            start_index: options.start_index,
            end_index: options.end_index,
            credibility: options.credibility,
            metadata: options.metadata,
            version: options
                .version
                .unwrap_or_else(|| self.config.version.clone()),
        })
    }

    /// Stamp bookkeeping fields and the checksum, then upsert
    fn persist(&mut self, mut entry: ProvenanceEntry) -> Result<ProvenanceEntry> {
        let first_seen = match self.storage.retrieve(&entry.entity_id)? {
            Some(previous) => previous.first_seen.unwrap_or(previous.timestamp),
            None => entry.first_seen.clone().unwrap_or_else(|| entry.timestamp.clone()),
        };
        entry.first_seen = Some(first_seen);
        entry.last_updated = Some(entry.timestamp.clone());
        entry.checksum = Some(compute_checksum(&entry));

        self.storage.store(&entry)?;
        debug!(
            "Tracked {} '{}' (activity: {})",
            entry.entity_type, entry.entity_id, entry.activity_id
        );
        Ok(entry)
    }
}

fn property_entry_id(entity_id: &str, property_name: &str, document: &str) -> String {
    fn escape(part: &str) -> String {
        part.replace('\\', "\\\\").replace(':', "\\:")
    }
    format!(
        "{}:{}:{}",
        escape(entity_id),
        escape(property_name),
        escape(document)
    )
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProvenanceError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_entity_defaults() {
        let mut manager = ProvenanceManager::in_memory();
        let entry = manager
            .track_entity("e1", "paper.pdf", TrackOptions::new())
            .unwrap();

        assert_eq!(entry.entity_type, "entity");
        assert_eq!(entry.activity_id, "entity_tracking");
        assert_eq!(entry.agent_id, "semantica");
        assert_eq!(entry.source_document.as_deref(), Some("paper.pdf"));
        assert_eq!(entry.first_seen.as_deref(), Some(entry.timestamp.as_str()));
        assert!(verify_checksum(&entry, None));
    }

    #[test]
    fn test_empty_ids_are_rejected() {
        let mut manager = ProvenanceManager::in_memory();
        assert!(matches!(
            manager.track_entity("", "paper.pdf", TrackOptions::new()),
            Err(ProvenanceError::Validation(_))
        ));
        assert!(matches!(
            manager.track_relationship("r1", "  ", TrackOptions::new()),
            Err(ProvenanceError::Validation(_))
        ));
        assert_eq!(manager.get_statistics().unwrap().total_entries, 0);
    }

    #[test]
    fn test_non_finite_confidence_is_rejected() {
        let mut manager = ProvenanceManager::in_memory();
        let result = manager.track_entity("e1", "x", TrackOptions::new().confidence(f64::NAN));
        assert!(matches!(result, Err(ProvenanceError::Validation(_))));
    }

    #[test]
    fn test_inverted_chunk_span_is_rejected() {
        let mut manager = ProvenanceManager::in_memory();
        let result = manager.track_chunk("c1", "doc", ChunkSpan::new(10, 2), TrackOptions::new());
        assert!(matches!(result, Err(ProvenanceError::Validation(_))));
    }

    #[test]
    fn test_entity_span_is_recorded() {
        let mut manager = ProvenanceManager::in_memory();
        let entry = manager
            .track_entity("e1", "doc", TrackOptions::new().span(4, 9))
            .unwrap();
        assert_eq!((entry.start_index, entry.end_index), (Some(4), Some(9)));

        let result = manager.track_entity("e2", "doc", TrackOptions::new().span(9, 4));
        assert!(matches!(result, Err(ProvenanceError::Validation(_))));
    }

    #[test]
    fn test_upsert_preserves_first_seen() {
        let mut manager = ProvenanceManager::in_memory();
        let first = manager.track_entity("e1", "a.pdf", TrackOptions::new()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = manager
            .track_entity("e1", "b.pdf", TrackOptions::new().confidence(0.4))
            .unwrap();

        assert_eq!(second.first_seen, Some(first.timestamp.clone()));
        assert_eq!(second.last_updated, Some(second.timestamp.clone()));
        assert_ne!(first.timestamp, second.timestamp);

        let stored = manager.get_provenance("e1").unwrap().unwrap();
        assert_eq!(stored.source_document.as_deref(), Some("b.pdf"));
        assert_eq!(manager.get_statistics().unwrap().total_entries, 1);
    }

    #[test]
    fn test_relationship_type_is_forced() {
        let mut manager = ProvenanceManager::in_memory();
        let entry = manager
            .track_relationship("r1", "doc", TrackOptions::new().entity_type("person"))
            .unwrap();
        assert_eq!(entry.entity_type, "relationship");
    }

    #[test]
    fn test_chunk_fields() {
        let mut manager = ProvenanceManager::in_memory();
        let span = ChunkSpan::new(0, 100)
            .with_parent("doc_1")
            .with_source_path("/data/doc_1.pdf");
        let entry = manager
            .track_chunk("chunk_1", "doc_1", span, TrackOptions::new())
            .unwrap();

        assert_eq!(entry.entity_type, "chunk");
        assert_eq!(entry.parent_entity_id.as_deref(), Some("doc_1"));
        assert_eq!(entry.start_index, Some(0));
        assert_eq!(entry.end_index, Some(100));
        assert_eq!(entry.source_location.as_deref(), Some("/data/doc_1.pdf"));
        assert_eq!(entry.metadata["source_path"], json!("/data/doc_1.pdf"));
    }

    #[test]
    fn test_tracked_source_becomes_parent() {
        let mut manager = ProvenanceManager::in_memory();
        manager.track_entity("chunk_1", "doc.pdf", TrackOptions::new()).unwrap();
        let entity = manager.track_entity("e1", "chunk_1", TrackOptions::new()).unwrap();
        assert_eq!(entity.parent_entity_id.as_deref(), Some("chunk_1"));

        let untracked = manager.track_entity("e2", "other.pdf", TrackOptions::new()).unwrap();
        assert!(untracked.parent_entity_id.is_none());

        let explicit = manager
            .track_entity("e3", "chunk_1", TrackOptions::new().parent("e2"))
            .unwrap();
        assert_eq!(explicit.parent_entity_id.as_deref(), Some("e2"));
    }

    #[test]
    fn test_source_linking_can_be_disabled() {
        let config = ProvenanceConfig {
            link_tracked_sources: false,
            ..ProvenanceConfig::default()
        };
        let mut manager = ProvenanceManager::new(config).unwrap();
        manager.track_entity("chunk_1", "doc.pdf", TrackOptions::new()).unwrap();
        let entity = manager.track_entity("e1", "chunk_1", TrackOptions::new()).unwrap();
        assert!(entity.parent_entity_id.is_none());
    }

    #[test]
    fn test_property_sources_group_conflicts() {
        let mut manager = ProvenanceManager::in_memory();
        manager.track_entity("acme", "registry.csv", TrackOptions::new()).unwrap();

        let wiki = SourceReference::new("wiki.html").with_confidence(0.6);
        let filing = SourceReference::new("10-K.pdf").with_page(3).with_confidence(0.95);
        let blog = SourceReference::new("blog.html").with_confidence(0.3);

        manager
            .track_property_source("acme", "founded", json!(1999), &wiki, Metadata::new())
            .unwrap();
        let entry = manager
            .track_property_source("acme", "founded", json!(1999), &filing, Metadata::new())
            .unwrap();
        manager
            .track_property_source("acme", "founded", json!(2001), &blog, Metadata::new())
            .unwrap();

        assert_eq!(entry.entity_id, "acme:founded:10-K.pdf");
        assert_eq!(entry.entity_type, "property");
        assert_eq!(entry.parent_entity_id.as_deref(), Some("acme"));
        assert_eq!(entry.source_location.as_deref(), Some("page 3"));
        assert_eq!(entry.confidence, 0.95);

        let sources = manager.get_property_sources("acme").unwrap();
        assert_eq!(sources.len(), 2, "Two competing values for one property");
        let agreed = sources.iter().find(|p| p.value == json!(1999)).unwrap();
        assert_eq!(agreed.sources.len(), 2);
        assert_eq!(agreed.best_source().unwrap().document, "10-K.pdf");

        assert!(manager.get_property_sources("unknown").unwrap().is_empty());
    }

    #[test]
    fn test_property_ids_keep_colon_parts_apart() {
        let mut manager = ProvenanceManager::in_memory();
        let doc = SourceReference::new("urn:doc:1");

        let first = manager
            .track_property_source("a:b", "c", json!(1), &doc, Metadata::new())
            .unwrap();
        let second = manager
            .track_property_source("a", "b:c", json!(2), &doc, Metadata::new())
            .unwrap();
        assert_ne!(first.entity_id, second.entity_id);
        assert_eq!(first.entity_id, "a\\:b:c:urn\\:doc\\:1");

        let sources = manager.get_property_sources("a:b").unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].value, json!(1));
        assert_eq!(manager.get_property_sources("a").unwrap().len(), 1);
    }

    #[test]
    fn test_property_id_escapes_backslashes() {
        assert_ne!(
            property_entry_id("a\\", "b", "d"),
            property_entry_id("a", "\\b", "d")
        );
        assert_ne!(
            property_entry_id("a\\:", "b", "d"),
            property_entry_id("a", ":b", "d")
        );
    }

    #[test]
    fn test_batch_skips_failures_by_default() {
        let mut manager = ProvenanceManager::in_memory();
        let records = vec![
            EntityRecord::new("e1"),
            EntityRecord::new(""),
            EntityRecord::new("e3"),
        ];
        assert_eq!(manager.track_entities_batch(&records, "doc").unwrap(), 2);
        assert!(manager.get_provenance("e3").unwrap().is_some());
    }

    #[test]
    fn test_batch_fail_fast() {
        let config = ProvenanceConfig {
            batch_failure_policy: BatchFailurePolicy::FailFast,
            ..ProvenanceConfig::default()
        };
        let mut manager = ProvenanceManager::new(config).unwrap();
        let records = vec![
            EntityRecord::new("e1"),
            EntityRecord::new(""),
            EntityRecord::new("e3"),
        ];
        assert!(manager.track_entities_batch(&records, "doc").is_err());
        assert!(manager.get_provenance("e1").unwrap().is_some());
        assert!(manager.get_provenance("e3").unwrap().is_none());
    }

    #[test]
    fn test_chunk_batch() {
        let mut manager = ProvenanceManager::in_memory();
        let mut first = ChunkRecord::new("c1", ChunkSpan::new(0, 10));
        first.text = Some("hello".to_string());
        let chunks = vec![
            first,
            ChunkRecord::new("c2", ChunkSpan::new(10, 20).with_parent("c1")),
            ChunkRecord::new("bad", ChunkSpan::new(30, 5)),
        ];

        assert_eq!(manager.track_chunks_batch(&chunks, "doc_1").unwrap(), 2);
        let c1 = manager.get_provenance("c1").unwrap().unwrap();
        assert_eq!(c1.metadata["text"], json!("hello"));
        assert_eq!(manager.get_lineage("c2").unwrap().depth, 2);
    }

    #[test]
    fn test_statistics() {
        let mut manager = ProvenanceManager::in_memory();
        manager
            .track_entity("e1", "a.pdf", TrackOptions::new().confidence(0.5))
            .unwrap();
        manager.track_entity("e2", "a.pdf", TrackOptions::new()).unwrap();
        manager
            .track_chunk("c1", "b.pdf", ChunkSpan::default(), TrackOptions::new())
            .unwrap();

        let stats = manager.get_statistics().unwrap();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.entity_types.get("entity"), Some(&2));
        assert_eq!(stats.entity_types.get("chunk"), Some(&1));
        assert_eq!(stats.activities.get("chunking"), Some(&1));
        assert_eq!(stats.source_documents, 2);
        assert!((stats.average_confidence - (2.5 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let mut storage = InMemoryStorage::new();
        let mut tampered = ProvenanceEntry::new("forged", "entity", "x");
        tampered.checksum = Some("0".repeat(64));
        storage.store(&tampered).unwrap();
        storage
            .store(&ProvenanceEntry::new("unsigned", "entity", "x"))
            .unwrap();

        let mut manager = ProvenanceManager::with_storage(storage, ProvenanceConfig::default());
        manager.track_entity("good", "doc", TrackOptions::new()).unwrap();

        assert_eq!(manager.verify_entry("good").unwrap(), Some(true));
        assert_eq!(manager.verify_entry("forged").unwrap(), Some(false));
        assert_eq!(manager.verify_entry("missing").unwrap(), None);

        let report = manager.verify_all().unwrap();
        assert_eq!(report.checked, 3);
        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid, vec!["forged"]);
        assert_eq!(report.missing_checksum, vec!["unsigned"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clear() {
        let mut manager = ProvenanceManager::in_memory();
        manager.track_entity("e1", "a", TrackOptions::new()).unwrap();
        manager.track_entity("e2", "a", TrackOptions::new()).unwrap();
        assert_eq!(manager.clear().unwrap(), 2);
        assert!(manager.get_lineage("e1").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ProvenanceConfig {
            agent_id: String::new(),
            ..ProvenanceConfig::default()
        };
        assert!(matches!(
            ProvenanceManager::new(config),
            Err(ProvenanceError::Config(_))
        ));
    }
}

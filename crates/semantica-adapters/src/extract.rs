//! Semantic extraction and deduplication producers

use crate::tracked::{result_id, Tracked};
use semantica_domain::generate_entity_id;
use semantica_provenance::TrackOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An entity mention found in text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity identifier, if the extractor assigns one
    pub id: Option<String>,
    /// Surface text
    pub text: String,
    /// Entity label ("person", "organization", ...)
    pub label: String,
    /// Start character offset within the source text
    pub start: Option<i64>,
    /// End character offset within the source text
    pub end: Option<i64>,
    /// Extraction confidence
    pub confidence: f64,
}

impl Entity {
    /// Entity with full confidence and no span
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            label: label.into(),
            start: None,
            end: None,
            confidence: 1.0,
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A relation between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation identifier, if the extractor assigns one
    pub id: Option<String>,
    /// Subject entity id
    pub subject: String,
    /// Predicate
    pub predicate: String,
    /// Object entity id
    pub object: String,
    /// Extraction confidence
    pub confidence: f64,
}

/// Output of a deduplication pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deduplicated {
    /// Surviving entities
    pub entities: Vec<Entity>,
    /// Surviving entity id to the ids merged into it
    pub merged: BTreeMap<String, Vec<String>>,
}

impl Deduplicated {
    /// Number of entities merged away
    pub fn duplicates_removed(&self) -> usize {
        self.merged.values().map(Vec::len).sum()
    }
}

/// Finds entity mentions (semantic_extract)
pub trait EntityExtractor {
    /// Error type for extraction
    type Error;

    /// Extract entities from `text`, which came from `source`
    fn extract_entities(&self, text: &str, source: &str) -> Result<Vec<Entity>, Self::Error>;
}

/// Finds relations between entities (semantic_extract)
pub trait RelationExtractor {
    /// Error type for extraction
    type Error;

    /// Extract relations among `entities` from `text`, which came from `source`
    fn extract_relations(
        &self,
        text: &str,
        entities: &[Entity],
        source: &str,
    ) -> Result<Vec<Relation>, Self::Error>;
}

/// Merges duplicate entities (deduplication)
pub trait Deduplicator {
    /// Error type for deduplication
    type Error;

    /// Merge duplicates among `entities`
    fn deduplicate(&self, entities: &[Entity]) -> Result<Deduplicated, Self::Error>;
}

impl<T: EntityExtractor> EntityExtractor for Tracked<T> {
    type Error = T::Error;

    fn extract_entities(&self, text: &str, source: &str) -> Result<Vec<Entity>, Self::Error> {
        let entities = (**self).extract_entities(text, source)?;

        self.record("entity extraction", |manager| {
            let mut tracked = 0;
            for entity in &entities {
                let options = TrackOptions::new()
                    .entity_type(entity.label.as_str())
                    .activity("entity_extraction")
                    .confidence(entity.confidence)
                    .metadata_value("text", entity.text.as_str());
                let span = match (entity.start, entity.end) {
                    (Some(start), Some(end)) => options.span(start, end),
                    _ => options,
                };
                manager.track_entity(&result_id(entity.id.as_deref(), "entity"), source, span)?;
                tracked += 1;
            }
            Ok(tracked)
        });

        Ok(entities)
    }
}

impl<T: RelationExtractor> RelationExtractor for Tracked<T> {
    type Error = T::Error;

    fn extract_relations(
        &self,
        text: &str,
        entities: &[Entity],
        source: &str,
    ) -> Result<Vec<Relation>, Self::Error> {
        let relations = (**self).extract_relations(text, entities, source)?;

        self.record("relation extraction", |manager| {
            for relation in &relations {
                let options = TrackOptions::new()
                    .activity("relation_extraction")
                    .used_entity(relation.subject.as_str())
                    .used_entity(relation.object.as_str())
                    .confidence(relation.confidence)
                    .metadata_value("subject", relation.subject.as_str())
                    .metadata_value("predicate", relation.predicate.as_str())
                    .metadata_value("object", relation.object.as_str());
                manager.track_relationship(
                    &result_id(relation.id.as_deref(), "relation"),
                    source,
                    options,
                )?;
            }
            Ok(relations.len())
        });

        Ok(relations)
    }
}

impl<T: Deduplicator> Deduplicator for Tracked<T> {
    type Error = T::Error;

    fn deduplicate(&self, entities: &[Entity]) -> Result<Deduplicated, Self::Error> {
        let outcome = (**self).deduplicate(entities)?;

        self.record("deduplication", |manager| {
            let mut merge_ids = Vec::new();
            for (survivor, merged) in &outcome.merged {
                let merge_id = format!("{}:dedup", survivor);
                let options = merged.iter().fold(
                    TrackOptions::new()
                        .entity_type("entity_merge")
                        .activity("deduplication")
                        .parent(survivor.as_str())
                        .metadata_value("survivor", survivor.as_str())
                        .metadata_value("duplicate_count", merged.len()),
                    |options, id| options.used_entity(id.as_str()),
                );
                manager.track_entity(&merge_id, survivor, options)?;
                merge_ids.push(merge_id);
            }

            let options = merge_ids.iter().fold(
                TrackOptions::new()
                    .entity_type("deduplication_run")
                    .activity("deduplication")
                    .metadata_value("input_count", entities.len())
                    .metadata_value("output_count", outcome.entities.len())
                    .metadata_value("duplicates_removed", outcome.duplicates_removed()),
                |options, id| options.used_entity(id.as_str()),
            );
            manager.track_entity(&generate_entity_id("dedup"), "deduplication", options)
        });

        Ok(outcome)
    }
}

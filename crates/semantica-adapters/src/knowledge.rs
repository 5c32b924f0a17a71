//! Reasoning, context assembly and ontology generation producers

use crate::extract::Entity;
use crate::stores::Triple;
use crate::tracked::{result_id, Tracked};
use semantica_provenance::TrackOptions;
use serde::{Deserialize, Serialize};

/// A statement derived from other statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    /// Inference id, if the reasoner assigns one
    pub id: Option<String>,
    /// The derived statement
    pub triple: Triple,
    /// Rule that fired
    pub rule: String,
    /// Premises the rule matched
    pub premises: Vec<Triple>,
    /// Confidence in the conclusion
    pub confidence: f64,
}

/// Context assembled for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context id, if the builder assigns one
    pub id: Option<String>,
    /// The query the context answers
    pub query: String,
    /// Assembled text
    pub text: String,
    /// Entities that contributed to the text
    pub entity_ids: Vec<String>,
}

/// A generated ontology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    /// Ontology id, if the generator assigns one
    pub id: Option<String>,
    /// Ontology name
    pub name: String,
    /// Class names
    pub classes: Vec<String>,
    /// Property names
    pub properties: Vec<String>,
}

/// Derives new statements (reasoning)
pub trait Reasoner {
    /// Error type for inference
    type Error;

    /// Derive statements from `facts`
    fn infer(&self, facts: &[Triple]) -> Result<Vec<Inference>, Self::Error>;
}

/// Assembles retrieval context (context)
pub trait ContextBuilder {
    /// Error type for context assembly
    type Error;

    /// Build context for `query` from `entity_ids`
    fn build_context(&self, query: &str, entity_ids: &[String]) -> Result<Context, Self::Error>;
}

/// Induces an ontology from entities (ontology)
pub trait OntologyGenerator {
    /// Error type for generation
    type Error;

    /// Generate an ontology covering `entities`
    fn generate_ontology(&self, entities: &[Entity]) -> Result<Ontology, Self::Error>;
}

impl<T: Reasoner> Reasoner for Tracked<T> {
    type Error = T::Error;

    fn infer(&self, facts: &[Triple]) -> Result<Vec<Inference>, Self::Error> {
        let inferences = (**self).infer(facts)?;

        self.record("inference", |manager| {
            for inference in &inferences {
                let options = inference.premises.iter().fold(
                    TrackOptions::new()
                        .entity_type("inference")
                        .activity("reasoning")
                        .confidence(inference.confidence)
                        .metadata_value("rule", inference.rule.as_str())
                        .metadata_value("statement", inference.triple.key()),
                    |options, premise| options.used_entity(premise.key()),
                );
                manager.track_entity(
                    &result_id(inference.id.as_deref(), "inference"),
                    &format!("rule:{}", inference.rule),
                    options,
                )?;
            }
            Ok(inferences.len())
        });

        Ok(inferences)
    }
}

impl<T: ContextBuilder> ContextBuilder for Tracked<T> {
    type Error = T::Error;

    fn build_context(&self, query: &str, entity_ids: &[String]) -> Result<Context, Self::Error> {
        let context = (**self).build_context(query, entity_ids)?;

        self.record("context assembly", |manager| {
            let options = context.entity_ids.iter().fold(
                TrackOptions::new()
                    .entity_type("context")
                    .activity("context_building")
                    .metadata_value("query", query)
                    .metadata_value("text_length", context.text.len()),
                |options, id| options.used_entity(id.as_str()),
            );
            manager.track_entity(
                &result_id(context.id.as_deref(), "context"),
                &format!("query:{}", query),
                options,
            )
        });

        Ok(context)
    }
}

impl<T: OntologyGenerator> OntologyGenerator for Tracked<T> {
    type Error = T::Error;

    fn generate_ontology(&self, entities: &[Entity]) -> Result<Ontology, Self::Error> {
        let ontology = (**self).generate_ontology(entities)?;

        self.record("ontology generation", |manager| {
            let options = entities
                .iter()
                .filter_map(|entity| entity.id.as_deref())
                .fold(
                    TrackOptions::new()
                        .entity_type("ontology")
                        .activity("ontology_generation")
                        .metadata_value("name", ontology.name.as_str())
                        .metadata_value("class_count", ontology.classes.len())
                        .metadata_value("property_count", ontology.properties.len()),
                    |options, id| options.used_entity(id),
                );
            manager.track_entity(
                &result_id(ontology.id.as_deref(), "ontology"),
                &format!("ontology:{}", ontology.name),
                options,
            )
        });

        Ok(ontology)
    }
}

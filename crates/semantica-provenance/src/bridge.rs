//! Bridge axioms and translation chains
//!
//! A bridge axiom is a cited, declarative conversion rule: multiply a value
//! from one domain by a published coefficient to obtain a value in another.
//! Applying axioms in sequence builds a translation chain whose confidence is
//! that of its weakest axiom.
//!
//! Tracking performed here is best effort. A failure to record provenance is
//! logged and never fails the computation.

use crate::error::Result;
use crate::manager::ProvenanceManager;
use crate::types::{LineageReport, TrackOptions};
use semantica_domain::{generate_entity_id, now_timestamp, Metadata, ProvenanceEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Entity type of an applied axiom's output
pub const BRIDGE_AXIOM_RESULT: &str = "bridge_axiom_result";

/// Entity type of a registered axiom
pub const BRIDGE_AXIOM: &str = "bridge_axiom";

/// A cited conversion rule between two domains
///
/// # Examples
///
/// ```
/// use semantica_domain::Metadata;
/// use semantica_provenance::BridgeAxiom;
///
/// let axiom = BridgeAxiom::new("BA-001", "Biomass to carbon", 0.346)
///     .with_source("10.1000/carbon.2021", Some("12"));
///
/// let result = axiom.apply("plot_7", 463.0, None, Metadata::new());
/// assert!((result.output_value - 160.198).abs() < 1e-9);
/// assert_eq!(result.output_entity, "plot_7_transformed_BA-001");
/// assert!(!result.tracked);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeAxiom {
    /// Axiom identifier
    pub axiom_id: String,
    /// Short human name
    pub name: String,
    /// Natural-language statement of the rule
    #[serde(default)]
    pub rule: String,
    /// Multiplier applied to input values
    pub coefficient: f64,
    /// DOI (or other identifier) of the publication the coefficient comes from
    #[serde(default)]
    pub source_doi: String,
    /// Page within the publication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_page: Option<String>,
    /// Verbatim excerpt supporting the coefficient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_quote: Option<String>,
    /// Confidence in the rule
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Domain of input values
    #[serde(default)]
    pub input_domain: String,
    /// Domain of output values
    #[serde(default)]
    pub output_domain: String,
}

fn default_confidence() -> f64 {
    1.0
}

/// Outcome of one [`BridgeAxiom::apply`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxiomApplication {
    /// Axiom that was applied
    pub axiom_id: String,
    /// Entity the value came from
    pub input_entity: String,
    /// Value before conversion
    pub input_value: f64,
    /// Synthesized id of the converted value
    pub output_entity: String,
    /// Value after conversion
    pub output_value: f64,
    /// Coefficient used
    pub coefficient: f64,
    /// Confidence of the axiom
    pub confidence: f64,
    /// Whether a provenance entry was recorded
    pub tracked: bool,
}

impl BridgeAxiom {
    /// Create an axiom with full confidence and no citation
    pub fn new(axiom_id: impl Into<String>, name: impl Into<String>, coefficient: f64) -> Self {
        Self {
            axiom_id: axiom_id.into(),
            name: name.into(),
            rule: String::new(),
            coefficient,
            source_doi: String::new(),
            source_page: None,
            source_quote: None,
            confidence: 1.0,
            input_domain: String::new(),
            output_domain: String::new(),
        }
    }

    /// Set the rule statement
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    /// Set the citation
    pub fn with_source(mut self, doi: impl Into<String>, page: Option<&str>) -> Self {
        self.source_doi = doi.into();
        self.source_page = page.map(str::to_string);
        self
    }

    /// Set the supporting excerpt
    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.source_quote = Some(quote.into());
        self
    }

    /// Set the confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the input and output domains
    pub fn with_domains(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_domain = input.into();
        self.output_domain = output.into();
        self
    }

    /// Document recorded as the source of tracked entries
    fn citation(&self) -> String {
        if self.source_doi.is_empty() {
            format!("axiom:{}", self.axiom_id)
        } else {
            self.source_doi.clone()
        }
    }

    fn citation_options(&self, entity_type: &str, activity: &str) -> TrackOptions {
        let mut options = TrackOptions::new()
            .entity_type(entity_type)
            .activity(activity)
            .confidence(self.confidence)
            .metadata(self.to_metadata());
        options.source_location = self.source_page.as_ref().map(|page| format!("page {}", page));
        options.source_quote = self.source_quote.clone();
        options
    }

    /// The axiom's fields as a metadata payload
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("axiom_id".to_string(), self.axiom_id.clone().into());
        metadata.insert("axiom_name".to_string(), self.name.clone().into());
        metadata.insert("rule".to_string(), self.rule.clone().into());
        metadata.insert("coefficient".to_string(), self.coefficient.into());
        metadata.insert("source_doi".to_string(), self.source_doi.clone().into());
        metadata.insert(
            "source_page".to_string(),
            self.source_page.clone().map_or(Value::Null, Value::from),
        );
        metadata.insert("input_domain".to_string(), self.input_domain.clone().into());
        metadata.insert("output_domain".to_string(), self.output_domain.clone().into());
        metadata
    }

    /// Convert `input_value` and, given a manager, record the conversion
    ///
    /// The recorded `bridge_axiom_result` entry is parented to the input
    /// entity and lists both the input and the axiom as used entities.
    /// `extra` is merged into its metadata.
    pub fn apply(
        &self,
        input_entity: &str,
        input_value: f64,
        manager: Option<&mut ProvenanceManager>,
        extra: Metadata,
    ) -> AxiomApplication {
        let output_value = input_value * self.coefficient;
        let output_entity = format!("{}_transformed_{}", input_entity, self.axiom_id);

        let tracked = match manager {
            Some(manager) => {
                let mut options = self
                    .citation_options(BRIDGE_AXIOM_RESULT, "bridge_axiom_application")
                    .parent(input_entity)
                    .used_entity(input_entity)
                    .used_entity(self.axiom_id.as_str())
                    .metadata_value("input_entity", input_entity)
                    .metadata_value("input_value", input_value)
                    .metadata_value("output_value", output_value);
                options.metadata.extend(extra);

                match manager.track_entity(&output_entity, &self.citation(), options) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(
                            "Failed to track application of axiom {} to {}: {}",
                            self.axiom_id, input_entity, e
                        );
                        false
                    }
                }
            }
            None => false,
        };

        AxiomApplication {
            axiom_id: self.axiom_id.clone(),
            input_entity: input_entity.to_string(),
            input_value,
            output_entity,
            output_value,
            coefficient: self.coefficient,
            confidence: self.confidence,
            tracked,
        }
    }

    /// Record the axiom itself so lineage of its results reaches the citation
    pub fn register(&self, manager: &mut ProvenanceManager) -> Result<ProvenanceEntry> {
        let options = self.citation_options(BRIDGE_AXIOM, "axiom_registration");
        manager.track_entity(&self.axiom_id, &self.citation(), options)
    }
}

/// Starting point of a translation chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInput {
    /// Entity holding the initial value
    pub entity_id: String,
    /// Initial value
    pub value: f64,
    /// Where the initial value came from
    #[serde(default)]
    pub source: String,
    /// Extra payload copied into the first layer
    #[serde(default)]
    pub metadata: Metadata,
}

impl ChainInput {
    /// Input with no source or metadata
    pub fn new(entity_id: impl Into<String>, value: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            value,
            source: String::new(),
            metadata: Metadata::new(),
        }
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Role of a layer in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    /// Seed value
    Input,
    /// Result of one axiom
    BridgeAxiom,
    /// Final value
    Output,
}

/// One step of a translation chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLayer {
    /// Layer name: "L1", "L2", ...
    pub layer: String,
    /// Role of the layer
    pub layer_type: LayerType,
    /// Value at this layer
    pub value: f64,
    /// Where the value came from
    pub source: String,
    /// When the layer was appended
    pub timestamp: String,
    /// Entity carrying the value, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Free-form payload
    #[serde(default)]
    pub extra: Metadata,
}

/// Append-only builder for a [`TranslationChain`]
#[derive(Debug)]
pub struct ChainBuilder {
    chain_id: String,
    layers: Vec<ChainLayer>,
    confidence: f64,
    axioms_applied: Vec<String>,
    created_at: String,
}

impl ChainBuilder {
    /// Start an empty chain with a generated id
    pub fn new() -> Self {
        Self::with_id(generate_entity_id("chain"))
    }

    /// Start an empty chain with a given id
    pub fn with_id(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            layers: Vec::new(),
            confidence: 1.0,
            axioms_applied: Vec::new(),
            created_at: now_timestamp(),
        }
    }

    /// Id the built chain will carry
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Name the next appended layer will get
    pub fn next_layer_name(&self) -> String {
        format!("L{}", self.layers.len() + 1)
    }

    /// Append a layer, naming it after its position
    pub fn add_layer(
        &mut self,
        layer_type: LayerType,
        value: f64,
        source: impl Into<String>,
        entity_id: Option<String>,
        extra: Metadata,
    ) -> &mut Self {
        let layer = ChainLayer {
            layer: self.next_layer_name(),
            layer_type,
            value,
            source: source.into(),
            timestamp: now_timestamp(),
            entity_id,
            extra,
        };
        self.layers.push(layer);
        self
    }

    /// Note that an axiom was applied; chain confidence keeps the minimum
    pub fn record_axiom(&mut self, axiom_id: &str, confidence: f64) -> &mut Self {
        self.axioms_applied.push(axiom_id.to_string());
        self.confidence = self.confidence.min(confidence);
        self
    }

    /// Finish the chain
    pub fn build(self) -> TranslationChain {
        TranslationChain {
            chain_id: self.chain_id,
            layers: self.layers,
            confidence: self.confidence,
            axioms_applied: self.axioms_applied,
            created_at: self.created_at,
        }
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished, read-only sequence of conversion layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationChain {
    chain_id: String,
    layers: Vec<ChainLayer>,
    confidence: f64,
    axioms_applied: Vec<String>,
    created_at: String,
}

impl TranslationChain {
    /// Chain identifier
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Layers in order of construction
    pub fn layers(&self) -> &[ChainLayer] {
        &self.layers
    }

    /// Weakest applied axiom confidence; 1.0 when no axiom was applied
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Ids of applied axioms in order
    pub fn axioms_applied(&self) -> &[String] {
        &self.axioms_applied
    }

    /// Construction time
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Value of the last layer
    pub fn final_value(&self) -> Option<f64> {
        self.layers.last().map(|layer| layer.value)
    }

    /// Entity of the last layer
    pub fn final_entity(&self) -> Option<&str> {
        self.layers.last().and_then(|layer| layer.entity_id.as_deref())
    }
}

/// Apply `axioms` in order to `input`, threading each output into the next
///
/// Produces an `input` layer, one `bridge_axiom` layer per axiom and a final
/// `output` layer. Given a manager, every application is tracked.
pub fn create_translation_chain(
    input: &ChainInput,
    axioms: &[BridgeAxiom],
    mut manager: Option<&mut ProvenanceManager>,
) -> TranslationChain {
    let mut builder = ChainBuilder::new();
    builder.add_layer(
        LayerType::Input,
        input.value,
        input.source.clone(),
        Some(input.entity_id.clone()),
        input.metadata.clone(),
    );

    let mut current_entity = input.entity_id.clone();
    let mut current_value = input.value;

    for axiom in axioms {
        let mut extra = Metadata::new();
        extra.insert("chain_id".to_string(), builder.chain_id().into());
        extra.insert("layer".to_string(), builder.next_layer_name().into());

        let application = axiom.apply(
            &current_entity,
            current_value,
            manager.as_deref_mut(),
            extra,
        );

        let mut layer_extra = Metadata::new();
        layer_extra.insert("axiom_id".to_string(), axiom.axiom_id.clone().into());
        layer_extra.insert("axiom_name".to_string(), axiom.name.clone().into());
        layer_extra.insert("coefficient".to_string(), axiom.coefficient.into());
        layer_extra.insert("confidence".to_string(), axiom.confidence.into());
        layer_extra.insert("input_value".to_string(), current_value.into());

        builder
            .add_layer(
                LayerType::BridgeAxiom,
                application.output_value,
                axiom.citation(),
                Some(application.output_entity.clone()),
                layer_extra,
            )
            .record_axiom(&axiom.axiom_id, axiom.confidence);

        current_entity = application.output_entity;
        current_value = application.output_value;
    }

    let mut output_extra = Metadata::new();
    output_extra.insert("axioms_applied".to_string(), axioms.len().into());
    builder.add_layer(
        LayerType::Output,
        current_value,
        "translation_chain",
        Some(current_entity),
        output_extra,
    );

    let chain = builder.build();
    debug!(
        "Built translation chain {} over {} axioms (confidence {})",
        chain.chain_id(),
        axioms.len(),
        chain.confidence()
    );
    chain
}

/// Lineage of one chain layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerLineage {
    /// Layer name
    pub layer: String,
    /// Entity whose lineage was traced
    pub entity_id: String,
    /// The traced lineage; empty when the entity was never tracked
    pub lineage: LineageReport,
}

/// Combined lineage report of a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTrace {
    /// Chain identifier
    pub chain_id: String,
    /// Chain confidence
    pub confidence: f64,
    /// Per-layer lineage, one per layer carrying an entity
    pub layers: Vec<LayerLineage>,
    /// Distinct source documents across all layers, first-seen order
    pub source_documents: Vec<String>,
}

/// Look up the lineage of every entity-carrying layer of `chain`
pub fn trace_translation_chain(
    chain: &TranslationChain,
    manager: &ProvenanceManager,
) -> Result<ChainTrace> {
    let mut layers = Vec::new();
    let mut source_documents: Vec<String> = Vec::new();

    for layer in chain.layers() {
        let Some(entity_id) = &layer.entity_id else {
            continue;
        };
        let lineage = manager.get_lineage(entity_id)?;
        for doc in &lineage.source_documents {
            if !source_documents.contains(doc) {
                source_documents.push(doc.clone());
            }
        }
        layers.push(LayerLineage {
            layer: layer.layer.clone(),
            entity_id: entity_id.clone(),
            lineage,
        });
    }

    Ok(ChainTrace {
        chain_id: chain.chain_id().to_string(),
        confidence: chain.confidence(),
        layers,
        source_documents,
    })
}

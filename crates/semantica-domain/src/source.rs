//! Source citations and per-property source bindings

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// Citation of an external source, independent of any tracked entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Document identifier (path, URL, DOI)
    pub document: String,

    /// Page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Section title or number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Line number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// When the source was observed (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Confidence in this source
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Free-form payload
    #[serde(default)]
    pub metadata: Metadata,
}

fn default_confidence() -> f64 {
    1.0
}

impl SourceReference {
    /// Create a citation of a whole document
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            page: None,
            section: None,
            line: None,
            timestamp: None,
            confidence: 1.0,
            metadata: Metadata::new(),
        }
    }

    /// Cite a specific page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Cite a specific section
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Cite a specific line
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the observation timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the confidence in this source
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Human-readable location within the document, if any part is known
    ///
    /// # Examples
    ///
    /// ```
    /// use semantica_domain::SourceReference;
    ///
    /// let source = SourceReference::new("report.pdf").with_page(3).with_line(12);
    /// assert_eq!(source.location().as_deref(), Some("page 3, line 12"));
    /// assert_eq!(SourceReference::new("report.pdf").location(), None);
    /// ```
    pub fn location(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("page {}", page));
        }
        if let Some(section) = &self.section {
            parts.push(format!("section {}", section));
        }
        if let Some(line) = self.line {
            parts.push(format!("line {}", line));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// One value of one entity property, bound to every source asserting it
///
/// Conflicting values for the same property are represented as separate
/// `PropertySource`s sharing `entity_id` and `property_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    /// Entity owning the property
    pub entity_id: String,

    /// Property name
    pub property_name: String,

    /// Asserted value
    pub value: serde_json::Value,

    /// Sources asserting this value
    #[serde(default)]
    pub sources: Vec<SourceReference>,
}

impl PropertySource {
    /// Create a binding with no sources yet
    pub fn new(
        entity_id: impl Into<String>,
        property_name: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            property_name: property_name.into(),
            value,
            sources: Vec::new(),
        }
    }

    /// Add a supporting source
    pub fn add_source(&mut self, source: SourceReference) {
        self.sources.push(source);
    }

    /// The most confident source, if any
    pub fn best_source(&self) -> Option<&SourceReference> {
        self.sources
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    /// Confidence of the value: the strongest supporting source
    pub fn aggregate_confidence(&self) -> f64 {
        self.best_source().map(|s| s.confidence).unwrap_or(0.0)
    }
}

//! Document producers: ingestion, parsing, normalization and splitting

use crate::tracked::{result_id, Tracked};
use semantica_domain::Metadata;
use semantica_provenance::{ChunkRecord, ChunkSpan, TrackOptions};
use serde::{Deserialize, Serialize};

/// A raw document as fetched from its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub id: String,
    /// Path or URL the document was read from
    pub source: String,
    /// Raw content
    pub content: String,
    /// Producer-specific payload
    #[serde(default)]
    pub metadata: Metadata,
}

/// Text extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Identifier of the parse result, if the parser assigns one
    pub id: Option<String>,
    /// Document the text came from
    pub document_id: String,
    /// Extracted text
    pub text: String,
    /// Section titles in reading order
    #[serde(default)]
    pub sections: Vec<String>,
}

/// Cleaned-up text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedText {
    /// Identifier of the normalized text, if the normalizer assigns one
    pub id: Option<String>,
    /// Entity the raw text belonged to
    pub source_id: String,
    /// Normalized text
    pub text: String,
}

/// One piece of a split document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Chunk identifier, if the splitter assigns one
    pub id: Option<String>,
    /// Chunk text
    pub text: String,
    /// Start character offset
    pub start: i64,
    /// End character offset
    pub end: i64,
}

/// Fetches documents (ingest)
pub trait Ingestor {
    /// Error type for ingestion
    type Error;

    /// Read the document at `location`
    fn ingest(&self, location: &str) -> Result<Document, Self::Error>;
}

/// Turns raw documents into text (parse)
pub trait DocumentParser {
    /// Error type for parsing
    type Error;

    /// Extract the text of `document`
    fn parse(&self, document: &Document) -> Result<ParsedDocument, Self::Error>;
}

/// Cleans text (normalize)
pub trait Normalizer {
    /// Error type for normalization
    type Error;

    /// Normalize `text`, which belongs to `source_id`
    fn normalize(&self, source_id: &str, text: &str) -> Result<NormalizedText, Self::Error>;
}

/// Splits documents into chunks (split)
pub trait Chunker {
    /// Error type for splitting
    type Error;

    /// Split the text of `document_id`
    fn split(&self, document_id: &str, text: &str) -> Result<Vec<TextChunk>, Self::Error>;
}

impl<T: Ingestor> Ingestor for Tracked<T> {
    type Error = T::Error;

    fn ingest(&self, location: &str) -> Result<Document, Self::Error> {
        let document = (**self).ingest(location)?;

        self.record("document ingestion", |manager| {
            let options = TrackOptions::new()
                .entity_type("document")
                .activity("ingestion")
                .metadata_value("content_length", document.content.len());
            manager.track_entity(
                &result_id(Some(&document.id), "document"),
                &document.source,
                options,
            )
        });

        Ok(document)
    }
}

impl<T: DocumentParser> DocumentParser for Tracked<T> {
    type Error = T::Error;

    fn parse(&self, document: &Document) -> Result<ParsedDocument, Self::Error> {
        let parsed = (**self).parse(document)?;

        self.record("document parsing", |manager| {
            let options = TrackOptions::new()
                .entity_type("parsed_document")
                .activity("parsing")
                .parent(parsed.document_id.as_str())
                .metadata_value("text_length", parsed.text.len())
                .metadata_value("section_count", parsed.sections.len());
            manager.track_entity(
                &result_id(parsed.id.as_deref(), "parsed"),
                &parsed.document_id,
                options,
            )
        });

        Ok(parsed)
    }
}

impl<T: Normalizer> Normalizer for Tracked<T> {
    type Error = T::Error;

    fn normalize(&self, source_id: &str, text: &str) -> Result<NormalizedText, Self::Error> {
        let normalized = (**self).normalize(source_id, text)?;

        self.record("text normalization", |manager| {
            let options = TrackOptions::new()
                .entity_type("normalized_text")
                .activity("normalization")
                .parent(source_id)
                .metadata_value("original_length", text.len())
                .metadata_value("normalized_length", normalized.text.len());
            manager.track_entity(
                &result_id(normalized.id.as_deref(), "normalized"),
                source_id,
                options,
            )
        });

        Ok(normalized)
    }
}

impl<T: Chunker> Chunker for Tracked<T> {
    type Error = T::Error;

    fn split(&self, document_id: &str, text: &str) -> Result<Vec<TextChunk>, Self::Error> {
        let chunks = (**self).split(document_id, text)?;

        self.record("document splitting", |manager| {
            let records: Vec<ChunkRecord> = chunks
                .iter()
                .map(|chunk| {
                    let mut record = ChunkRecord::new(
                        result_id(chunk.id.as_deref(), "chunk"),
                        ChunkSpan::new(chunk.start, chunk.end).with_parent(document_id),
                    );
                    record.text = Some(chunk.text.clone());
                    record
                })
                .collect();
            manager.track_chunks_batch(&records, document_id)
        });

        Ok(chunks)
    }
}

//! Embedding producers

use crate::tracked::Tracked;
use semantica_domain::generate_entity_id;
use semantica_provenance::TrackOptions;
use serde::{Deserialize, Serialize};

/// A vector computed for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Item the vector represents
    pub item_id: String,
    /// The vector
    pub vector: Vec<f32>,
    /// Model that produced it
    pub model: String,
}

impl Embedding {
    /// Vector length
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// Computes embeddings (embeddings)
pub trait Embedder {
    /// Error type for embedding
    type Error;

    /// Embed `text`, which belongs to `item_id`
    fn embed(&self, item_id: &str, text: &str) -> Result<Embedding, Self::Error>;
}

impl<T: Embedder> Embedder for Tracked<T> {
    type Error = T::Error;

    fn embed(&self, item_id: &str, text: &str) -> Result<Embedding, Self::Error> {
        let embedding = (**self).embed(item_id, text)?;

        self.record("embedding", |manager| {
            let options = TrackOptions::new()
                .entity_type("embedding")
                .activity("embedding_generation")
                .agent(embedding.model.as_str())
                .parent(item_id)
                .metadata_value("model", embedding.model.as_str())
                .metadata_value("dimensions", embedding.dimensions())
                .metadata_value("text_length", text.len());
            manager.track_entity(&generate_entity_id("embedding"), item_id, options)
        });

        Ok(embedding)
    }
}

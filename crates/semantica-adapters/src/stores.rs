//! Graph, vector and triplet store writers
//!
//! Store records get namespaced ids (`graph_node:<id>`, `vector:<id>`,
//! `triple:<s>|<p>|<o>`) parented to the item they hold, so writing an item
//! never overwrites the item's own provenance.

use crate::tracked::Tracked;
use semantica_domain::Metadata;
use semantica_provenance::TrackOptions;
use serde::{Deserialize, Serialize};

/// A node to write into a graph store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id, usually the id of the entity it represents
    pub id: String,
    /// Node label
    pub label: String,
    /// Node properties
    #[serde(default)]
    pub properties: Metadata,
}

/// An edge to write into a graph store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Edge id, if the caller assigns one
    pub id: Option<String>,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Relation type
    pub relation: String,
}

/// A subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject
    pub subject: String,
    /// Predicate
    pub predicate: String,
    /// Object
    pub object: String,
}

impl Triple {
    /// Create a triple
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Stable identifier of the statement
    pub fn key(&self) -> String {
        format!("triple:{}|{}|{}", self.subject, self.predicate, self.object)
    }
}

/// Property graph backend (graph_store)
pub trait GraphStore {
    /// Error type for graph writes
    type Error;

    /// Insert or update a node, returning its store id
    fn add_node(&mut self, node: &GraphNode) -> Result<String, Self::Error>;

    /// Insert an edge, returning its store id
    fn add_edge(&mut self, edge: &GraphEdge) -> Result<String, Self::Error>;
}

/// Vector index backend (vector_store)
pub trait VectorStore {
    /// Error type for vector writes
    type Error;

    /// Insert or replace the vector stored under `id`
    fn upsert(&mut self, id: &str, vector: &[f32], metadata: &Metadata)
        -> Result<(), Self::Error>;

    /// Ids and scores of the `k` nearest vectors to `query`
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f32)>, Self::Error>;
}

/// RDF-style triple backend (triplet_store)
pub trait TripletStore {
    /// Error type for triple writes
    type Error;

    /// Add statements, returning how many were new
    fn add_triples(&mut self, triples: &[Triple]) -> Result<usize, Self::Error>;
}

impl<T: GraphStore> GraphStore for Tracked<T> {
    type Error = T::Error;

    fn add_node(&mut self, node: &GraphNode) -> Result<String, Self::Error> {
        let store_id = (**self).add_node(node)?;

        self.record("graph node write", |manager| {
            let options = TrackOptions::new()
                .entity_type("graph_node")
                .activity("graph_store_write")
                .parent(node.id.as_str())
                .metadata_value("label", node.label.as_str())
                .metadata_value("store_id", store_id.as_str())
                .metadata_value("property_count", node.properties.len());
            manager.track_entity(&format!("graph_node:{}", store_id), &node.id, options)
        });

        Ok(store_id)
    }

    fn add_edge(&mut self, edge: &GraphEdge) -> Result<String, Self::Error> {
        let store_id = (**self).add_edge(edge)?;

        self.record("graph edge write", |manager| {
            let mut options = TrackOptions::new()
                .activity("graph_store_write")
                .used_entity(edge.source.as_str())
                .used_entity(edge.target.as_str())
                .metadata_value("relation", edge.relation.as_str())
                .metadata_value("store_id", store_id.as_str());
            if let Some(id) = &edge.id {
                options = options.parent(id.as_str());
            }
            manager.track_relationship(&format!("graph_edge:{}", store_id), &edge.source, options)
        });

        Ok(store_id)
    }
}

impl<T: VectorStore> VectorStore for Tracked<T> {
    type Error = T::Error;

    fn upsert(
        &mut self,
        id: &str,
        vector: &[f32],
        metadata: &Metadata,
    ) -> Result<(), Self::Error> {
        (**self).upsert(id, vector, metadata)?;

        self.record("vector write", |manager| {
            let options = TrackOptions::new()
                .entity_type("vector")
                .activity("vector_store_write")
                .parent(id)
                .metadata_value("dimensions", vector.len());
            manager.track_entity(&format!("vector:{}", id), id, options)
        });

        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f32)>, Self::Error> {
        (**self).search(query, k)
    }
}

impl<T: TripletStore> TripletStore for Tracked<T> {
    type Error = T::Error;

    fn add_triples(&mut self, triples: &[Triple]) -> Result<usize, Self::Error> {
        let added = (**self).add_triples(triples)?;

        self.record("triple write", |manager| {
            for triple in triples {
                let options = TrackOptions::new()
                    .entity_type("triple")
                    .activity("triplet_store_write")
                    .used_entity(triple.subject.as_str())
                    .used_entity(triple.object.as_str())
                    .metadata_value("subject", triple.subject.as_str())
                    .metadata_value("predicate", triple.predicate.as_str())
                    .metadata_value("object", triple.object.as_str());
                manager.track_entity(&triple.key(), &triple.subject, options)?;
            }
            Ok(triples.len())
        });

        Ok(added)
    }
}

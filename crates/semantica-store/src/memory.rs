//! Hash-map backed storage

use crate::StoreError;
use semantica_domain::{ProvenanceEntry, ProvenanceStorage};
use std::collections::HashMap;

/// In-memory implementation of `ProvenanceStorage`
///
/// O(1) store and retrieve; `retrieve_all` is a full scan in no particular
/// order. Nothing survives the process. Writes take `&mut self`, so sharing
/// one instance between threads requires an external lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    entries: HashMap<String, ProvenanceEntry>,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProvenanceStorage for InMemoryStorage {
    type Error = StoreError;

    fn store(&mut self, entry: &ProvenanceEntry) -> Result<(), Self::Error> {
        self.entries.insert(entry.entity_id.clone(), entry.clone());
        Ok(())
    }

    fn retrieve(&self, entity_id: &str) -> Result<Option<ProvenanceEntry>, Self::Error> {
        Ok(self.entries.get(entity_id).cloned())
    }

    fn retrieve_all(
        &self,
        entity_type: Option<&str>,
    ) -> Result<Vec<ProvenanceEntry>, Self::Error> {
        Ok(self
            .entries
            .values()
            .filter(|e| entity_type.map_or(true, |t| e.entity_type == t))
            .cloned()
            .collect())
    }

    fn clear(&mut self) -> Result<usize, Self::Error> {
        let removed = self.entries.len();
        self.entries.clear();
        Ok(removed)
    }

    fn count(&self, entity_type: Option<&str>) -> Result<usize, Self::Error> {
        Ok(match entity_type {
            None => self.entries.len(),
            Some(t) => self.entries.values().filter(|e| e.entity_type == t).count(),
        })
    }
}

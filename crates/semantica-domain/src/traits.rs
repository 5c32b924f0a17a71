//! Trait definitions for provenance persistence
//!
//! These traits define the boundary between the provenance model and the
//! storage engines. Implementations live in `semantica-store`.

use crate::ProvenanceEntry;
use std::collections::{HashSet, VecDeque};

/// Trait for persisting and querying provenance entries
///
/// Lookups of absent ids are not errors: they yield `None` or an empty list.
/// Errors are reserved for backend failures.
pub trait ProvenanceStorage {
    /// Error type for storage operations
    type Error;

    /// Insert or replace the entry keyed by `entry.entity_id`
    fn store(&mut self, entry: &ProvenanceEntry) -> Result<(), Self::Error>;

    /// Get an entry by id
    fn retrieve(&self, entity_id: &str) -> Result<Option<ProvenanceEntry>, Self::Error>;

    /// Get every entry, optionally restricted to one entity type
    fn retrieve_all(&self, entity_type: Option<&str>)
        -> Result<Vec<ProvenanceEntry>, Self::Error>;

    /// Collect every entry reachable upstream from `entity_id`
    ///
    /// Breadth-first over `parent_entity_id` and `used_entities`, each id
    /// visited at most once. Results are in discovery order, starting with
    /// the entry itself.
    fn trace_lineage(&self, entity_id: &str) -> Result<Vec<ProvenanceEntry>, Self::Error> {
        breadth_first_lineage(entity_id, |id| self.retrieve(id))
    }

    /// Remove every entry, returning how many were removed
    fn clear(&mut self) -> Result<usize, Self::Error>;

    /// Count entries, optionally restricted to one entity type
    fn count(&self, entity_type: Option<&str>) -> Result<usize, Self::Error> {
        Ok(self.retrieve_all(entity_type)?.len())
    }
}

/// Breadth-first lineage walk shared by all backends
///
/// `fetch` resolves one id; ids it cannot resolve are skipped. A visited set
/// makes the walk terminate on cyclic links, so cost is O(V + E) over the
/// reachable subgraph.
pub fn breadth_first_lineage<E, F>(
    entity_id: &str,
    mut fetch: F,
) -> Result<Vec<ProvenanceEntry>, E>
where
    F: FnMut(&str) -> Result<Option<ProvenanceEntry>, E>,
{
    let mut lineage = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::from([entity_id.to_string()]);

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }

        let Some(entry) = fetch(&current)? else {
            continue;
        };

        for upstream in entry.upstream_ids() {
            if !visited.contains(upstream) {
                queue.push_back(upstream.to_string());
            }
        }
        lineage.push(entry);
    }

    Ok(lineage)
}

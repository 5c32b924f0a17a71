//! Pass-through wrapper that records provenance after each producer call

use crate::toggle::{ProvenanceToggle, SharedManager};
use semantica_domain::generate_entity_id;
use semantica_provenance::ProvenanceManager;
use std::ops::{Deref, DerefMut};
use tracing::warn;

/// A producer plus an optional provenance manager
///
/// Every producer trait in this crate is implemented for `Tracked<T>` by
/// running `T`'s operation unchanged and then, when tracking is enabled,
/// recording what it produced. Everything else reaches `T` through `Deref`.
///
/// # Examples
///
/// ```
/// use semantica_adapters::{LlmProvider, MockProvider, Tracked};
///
/// let llm = Tracked::new(MockProvider::new("Paris"), true);
/// assert_eq!(llm.generate("Capital of France?").unwrap(), "Paris");
/// assert_eq!(llm.call_count(), 1);
///
/// let manager = llm.prov_manager().unwrap();
/// let stats = manager.lock().unwrap().get_statistics().unwrap();
/// assert_eq!(stats.entity_types.get("llm_response"), Some(&1));
/// ```
#[derive(Debug)]
pub struct Tracked<T> {
    inner: T,
    manager: Option<SharedManager>,
}

impl<T> Tracked<T> {
    /// Wrap `inner`, resolving the toggle immediately
    pub fn new(inner: T, provenance: impl Into<ProvenanceToggle>) -> Self {
        Self {
            inner,
            manager: provenance.into().resolve(),
        }
    }

    /// Wrap `inner` with tracking off
    pub fn disabled(inner: T) -> Self {
        Self {
            inner,
            manager: None,
        }
    }

    /// Manager receiving this wrapper's entries; `None` when disabled
    pub fn prov_manager(&self) -> Option<&SharedManager> {
        self.manager.as_ref()
    }

    /// Whether tracking is enabled
    pub fn is_tracking(&self) -> bool {
        self.manager.is_some()
    }

    /// Unwrap the producer
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Run `track` against the manager, if any
    ///
    /// Failures are logged and dropped.
    pub(crate) fn record<R, F>(&self, operation: &str, track: F) -> Option<R>
    where
        F: FnOnce(&mut ProvenanceManager) -> semantica_provenance::Result<R>,
    {
        let manager = self.manager.as_ref()?;
        let mut guard = match manager.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Provenance manager lock poisoned, skipping {}", operation);
                return None;
            }
        };

        match track(&mut *guard) {
            Ok(recorded) => Some(recorded),
            Err(e) => {
                warn!("Failed to track {}: {}", operation, e);
                None
            }
        }
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

/// The output's own id when it has a non-empty one, else a fresh id
pub(crate) fn result_id(existing: Option<&str>, prefix: &str) -> String {
    match existing {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => generate_entity_id(prefix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semantica_provenance::TrackOptions;

    #[test]
    fn test_disabled_wrapper_records_nothing() {
        let wrapper = Tracked::disabled(42);
        assert!(wrapper.prov_manager().is_none());
        assert!(wrapper
            .record("test", |m| m.track_entity("e", "s", TrackOptions::new()))
            .is_none());
        assert_eq!(*wrapper, 42);
    }

    #[test]
    fn test_record_swallows_errors() {
        let wrapper = Tracked::new((), true);
        let outcome = wrapper.record("test", |m| m.track_entity("", "s", TrackOptions::new()));
        assert!(outcome.is_none());

        let outcome = wrapper.record("test", |m| m.track_entity("e", "s", TrackOptions::new()));
        assert!(outcome.is_some());
    }

    #[test]
    fn test_deref_mut_reaches_inner() {
        let mut wrapper = Tracked::disabled(vec![1, 2]);
        wrapper.push(3);
        assert_eq!(wrapper.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_result_id() {
        assert_eq!(result_id(Some("doc_1"), "document"), "doc_1");
        assert!(result_id(Some(" "), "document").starts_with("document_"));
        assert!(result_id(None, "llm_response").starts_with("llm_response_"));
    }
}

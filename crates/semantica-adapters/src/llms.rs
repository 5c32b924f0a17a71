//! LLM producers
//!
//! `MockProvider` gives deterministic responses for tests and examples.
//!
//! ```
//! use semantica_adapters::{LlmProvider, MockProvider};
//!
//! let mut provider = MockProvider::default();
//! provider.add_response("prompt1", "response1");
//! assert_eq!(provider.generate("prompt1").unwrap(), "response1");
//! assert_eq!(provider.generate("other").unwrap(), "Default mock response");
//! ```

use crate::tracked::Tracked;
use semantica_domain::generate_entity_id;
use semantica_provenance::TrackOptions;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Generation failed
    #[error("LLM error: {0}")]
    Other(String),
}

/// Text generation backend (llms)
pub trait LlmProvider {
    /// Error type for generation
    type Error;

    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a completion constrained by a JSON schema
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Model identifier recorded as the agent of tracked responses
    fn model_name(&self) -> &str {
        "unknown"
    }
}

/// Rough token count: whitespace-separated words
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

const ERROR_MARKER: &str = "ERROR";

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without any network calls. Clones share
/// the call counter.
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: HashMap<String, String>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: HashMap::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses.insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses.insert(prompt.into(), ERROR_MARKER.to_string());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(prompt) {
            Some(response) if response == ERROR_MARKER => {
                Err(LlmError::Other("Mock error".to_string()))
            }
            Some(response) => Ok(response.clone()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

impl<T: LlmProvider> Tracked<T> {
    fn track_completion(&self, operation: &str, prompt: &str, completion: &str, started: Instant) {
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        let model = (**self).model_name().to_string();

        self.record(operation, |manager| {
            let prompt_tokens = estimate_tokens(prompt);
            let completion_tokens = estimate_tokens(completion);
            let options = TrackOptions::new()
                .entity_type("llm_response")
                .activity(operation)
                .agent(model.as_str())
                .metadata_value("model", model.as_str())
                .metadata_value("prompt_tokens", prompt_tokens)
                .metadata_value("completion_tokens", completion_tokens)
                .metadata_value("total_tokens", prompt_tokens + completion_tokens)
                .metadata_value("latency_ms", latency_ms);
            manager.track_entity(
                &generate_entity_id("llm_response"),
                &format!("llm:{}", model),
                options,
            )
        });
    }
}

impl<T: LlmProvider> LlmProvider for Tracked<T> {
    type Error = T::Error;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let started = Instant::now();
        let completion = (**self).generate(prompt)?;
        self.track_completion("llm_generation", prompt, &completion, started);
        Ok(completion)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let started = Instant::now();
        let completion = (**self).generate_structured(prompt, schema)?;
        self.track_completion("llm_structured_generation", prompt, &completion, started);
        Ok(completion)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("foo").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        let clone = provider.clone();

        provider.generate("prompt1").unwrap();
        clone.generate("prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(clone.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");
        assert!(matches!(provider.generate("bad prompt"), Err(LlmError::Other(_))));
    }

    #[test]
    fn test_tracked_generation_records_tokens() {
        let llm = Tracked::new(MockProvider::new("three word answer"), true);
        llm.generate("a two").unwrap();

        let manager = llm.prov_manager().unwrap().lock().unwrap();
        let entries = manager.list_entries(Some("llm_response")).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.agent_id, "mock");
        assert_eq!(entry.source_document.as_deref(), Some("llm:mock"));
        assert_eq!(entry.metadata["prompt_tokens"], 2);
        assert_eq!(entry.metadata["completion_tokens"], 3);
        assert_eq!(entry.metadata["total_tokens"], 5);
        assert!(entry.metadata["latency_ms"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn test_failed_generation_is_not_tracked() {
        let mut provider = MockProvider::default();
        provider.add_error("boom");
        let llm = Tracked::new(provider, true);

        assert!(llm.generate("boom").is_err());
        let manager = llm.prov_manager().unwrap().lock().unwrap();
        assert_eq!(manager.get_statistics().unwrap().total_entries, 0);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("  one\ttwo\nthree "), 3);
    }
}

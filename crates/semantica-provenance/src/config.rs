//! Configuration for the ProvenanceManager

use semantica_domain::{DEFAULT_AGENT_ID, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a batch call does when one item fails to track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Log the failure, continue with the next item, count successes only
    #[default]
    SkipFailed,
    /// Stop at the first failure and return its error
    ///
    /// Items tracked before the failure stay stored.
    FailFast,
}

/// Configuration for the ProvenanceManager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceConfig {
    /// SQLite database file; `None` selects in-memory storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// Agent recorded on entries that do not name one
    #[serde(default = "default_agent_id")]
    pub agent_id: String,

    /// Version stamped on new entries
    #[serde(default = "default_version")]
    pub version: String,

    /// Per-item failure handling for batch tracking
    #[serde(default)]
    pub batch_failure_policy: BatchFailurePolicy,

    /// Treat a source that is itself a tracked entity as the parent link
    /// when the caller gives no explicit parent
    #[serde(default = "default_true")]
    pub link_tracked_sources: bool,
}

fn default_agent_id() -> String {
    DEFAULT_AGENT_ID.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProvenanceConfig {
    /// In-memory storage with default agent and skip-on-failure batches
    fn default() -> Self {
        Self {
            storage_path: None,
            agent_id: default_agent_id(),
            version: default_version(),
            batch_failure_policy: BatchFailurePolicy::SkipFailed,
            link_tracked_sources: true,
        }
    }
}

impl ProvenanceConfig {
    /// In-memory preset (tests, short-lived pipelines)
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Persistent preset backed by the SQLite file at `path`
    pub fn persistent(path: impl AsRef<Path>) -> Self {
        Self {
            storage_path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.agent_id.trim().is_empty() {
            return Err("agent_id must not be empty".to_string());
        }
        if self.version.trim().is_empty() {
            return Err("version must not be empty".to_string());
        }
        if let Some(path) = &self.storage_path {
            if path.as_os_str().is_empty() {
                return Err("storage_path must not be empty when set".to_string());
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

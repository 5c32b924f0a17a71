//! Opt-in switch for provenance tracking

use semantica_provenance::{ProvenanceConfig, ProvenanceManager};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// A manager shared between wrappers
pub type SharedManager = Arc<Mutex<ProvenanceManager>>;

/// Wrap a manager for sharing between wrappers
pub fn share(manager: ProvenanceManager) -> SharedManager {
    Arc::new(Mutex::new(manager))
}

/// How a wrapper obtains its manager
///
/// Resolved once, when the wrapper is built. Any failure to build a manager
/// is logged and leaves tracking disabled.
#[derive(Debug, Clone, Default)]
pub enum ProvenanceToggle {
    /// No tracking
    #[default]
    Disabled,
    /// Track into a fresh in-memory manager owned by this wrapper
    Enabled,
    /// Track into an existing manager
    Shared(SharedManager),
    /// Track into a new manager built from this configuration
    Configured(ProvenanceConfig),
}

impl From<bool> for ProvenanceToggle {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl From<SharedManager> for ProvenanceToggle {
    fn from(manager: SharedManager) -> Self {
        Self::Shared(manager)
    }
}

impl From<ProvenanceConfig> for ProvenanceToggle {
    fn from(config: ProvenanceConfig) -> Self {
        Self::Configured(config)
    }
}

impl ProvenanceToggle {
    /// Turn the toggle into a manager, or `None` when tracking is off
    pub fn resolve(self) -> Option<SharedManager> {
        let manager = match self {
            Self::Disabled => None,
            Self::Enabled => Some(share(ProvenanceManager::in_memory())),
            Self::Shared(manager) => Some(manager),
            Self::Configured(config) => match ProvenanceManager::new(config) {
                Ok(manager) => Some(share(manager)),
                Err(e) => {
                    warn!("Provenance disabled, manager could not be created: {}", e);
                    None
                }
            },
        };
        if manager.is_some() {
            debug!("Provenance tracking enabled");
        }
        manager
    }
}

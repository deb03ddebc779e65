//! Core configuration supplied by the host.
//!
//! # Invariants
//! - Every field has a documented default, so a partial JSON document is
//!   always a valid configuration.

use serde::{Deserialize, Serialize};

/// Storage keys the three persisted collections live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub projects: String,
    pub notifications: String,
    pub session: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            projects: "projects".to_string(),
            notifications: "notifications".to_string(),
            session: "user".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub storage_keys: StorageKeys,
    /// Seed an empty store with the sample program data on first load.
    pub seed_sample_data: bool,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::default(),
            seed_sample_data: true,
            log_level: crate::logging::default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Parses a JSON configuration document, filling omitted fields with defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

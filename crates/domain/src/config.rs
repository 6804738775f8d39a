//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_EXPORT_PATH, DEFAULT_TABLE_IDS};
use crate::errors::{Result, SyncError};
use crate::types::ApiCredentials;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub credentials: ApiCredentials,
    /// Only remote rows of this cluster are read, upserted or deleted
    pub target_cluster: String,
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    /// Persistent response cache; `None` means a fresh directory per run
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_table_ids")]
    pub table_ids: Vec<String>,
    /// Tables fetched in parallel; only 1 is accepted until request budgets
    /// are shared across workers
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but the required
    /// credentials and target cluster.
    pub fn new(credentials: ApiCredentials, target_cluster: impl Into<String>) -> Self {
        Self {
            credentials,
            target_cluster: target_cluster.into(),
            export_path: default_export_path(),
            cache_dir: None,
            table_ids: default_table_ids(),
            concurrency: default_concurrency(),
            dry_run: false,
        }
    }

    /// Check that every required value is present.
    ///
    /// # Errors
    /// Returns `SyncError::Config` naming the first missing or invalid value.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("access id", self.credentials.id.as_str()),
            ("access key", self.credentials.key.as_str()),
            ("api endpoint", self.credentials.endpoint.as_str()),
            ("target cluster", self.target_cluster.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(SyncError::Config(format!("{name} is required")));
        }
        if self.table_ids.is_empty() || self.table_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(SyncError::Config("at least one non-empty table id is required".into()));
        }
        if self.concurrency != DEFAULT_CONCURRENCY {
            return Err(SyncError::Config(format!(
                "concurrency must be {DEFAULT_CONCURRENCY}, got {}",
                self.concurrency
            )));
        }
        Ok(())
    }
}

fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_PATH)
}

fn default_table_ids() -> Vec<String> {
    DEFAULT_TABLE_IDS.iter().map(ToString::to_string).collect()
}

const fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

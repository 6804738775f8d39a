//! # lookupsync-cli
//!
//! Command-line entry point: reconciles one cluster's rows in the remote
//! lookup tables with the local cluster/service export.
//!
//! ## Configuration
//!
//! Values come from a config file (`--config`) or from the environment (see
//! `lookupsync_infra::config::loader`). Flags override both.

pub mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use lookupsync_common::cache::ResponseCache;
use lookupsync_core::{ApiTransport, LookupTableSync, SyncReport, SyncSettings};
use lookupsync_domain::{Config, Result, SyncError};
use lookupsync_infra::{config, load_cluster_services, RateLimitedHttpClient};
use tempfile::TempDir;
use tracing::info;

/// Reconcile remote lookup tables with a cluster/service export.
#[derive(Debug, Default, Parser)]
#[command(name = "lookupsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cluster whose rows are reconciled.
    #[arg(long)]
    pub cluster: Option<String>,

    /// Line-delimited JSON export of cluster services.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Keep API responses in this directory across runs.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Lookup table to reconcile (repeatable).
    #[arg(long = "table-id", value_name = "ID")]
    pub table_ids: Vec<String>,

    /// TOML or JSON config file; the environment is used otherwise.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log planned row changes without applying them.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOOKUPSYNC_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Effective configuration: file or environment, then flags.
    ///
    /// Without `--config`, an incomplete environment falls back to a
    /// `lookupsync.{toml,json}` in the working directory or next to the
    /// executable.
    ///
    /// # Errors
    /// `SyncError::Config` when a required value is missing or invalid.
    pub fn load_config(&self) -> Result<Config> {
        self.load_config_from(&config::standard_config_dirs())
    }

    fn load_config_from(&self, dirs: &[PathBuf]) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => config::load_with_fallback(
                |key| self.flag_value(key).or_else(|| std::env::var(key).ok()),
                dirs,
            )?,
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Flag value under the environment variable name it overrides.
    fn flag_value(&self, key: &str) -> Option<String> {
        match key {
            "INPUT_CLUSTER" => self.cluster.clone(),
            "LOOKUPSYNC_EXPORT_PATH" => self.export.as_ref().map(|p| p.display().to_string()),
            "LOOKUPSYNC_CACHE_DIR" => self.cache_dir.as_ref().map(|p| p.display().to_string()),
            "LOOKUPSYNC_TABLE_IDS" if !self.table_ids.is_empty() => Some(self.table_ids.join(",")),
            "LOOKUPSYNC_DRY_RUN" if self.dry_run => Some("true".to_string()),
            _ => None,
        }
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(cluster) = &self.cluster {
            config.target_cluster.clone_from(cluster);
        }
        if let Some(export) = &self.export {
            config.export_path.clone_from(export);
        }
        if self.cache_dir.is_some() {
            config.cache_dir.clone_from(&self.cache_dir);
        }
        if !self.table_ids.is_empty() {
            config.table_ids.clone_from(&self.table_ids);
        }
        config.dry_run |= self.dry_run;
    }
}

/// Response cache for a run.
///
/// Without a configured directory the cache lives in a fresh temporary
/// directory that is removed when the returned guard drops.
///
/// # Errors
/// `SyncError::Io` when the directory cannot be created.
pub fn prepare_cache(dir: Option<&Path>) -> Result<(ResponseCache, Option<TempDir>)> {
    match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                SyncError::Io(format!("failed to create cache dir {}: {e}", dir.display()))
            })?;
            Ok((ResponseCache::new(dir), None))
        }
        None => {
            let temp = tempfile::Builder::new()
                .prefix("lookupsync-")
                .tempdir()
                .map_err(|e| SyncError::Io(format!("failed to create cache dir: {e}")))?;
            Ok((ResponseCache::new(temp.path()), Some(temp)))
        }
    }
}

/// Load everything the run needs and reconcile.
///
/// # Errors
/// Configuration, export and read-phase errors. Individual row failures are
/// part of the returned report instead.
pub async fn run(cli: &Cli) -> Result<SyncReport> {
    let config = cli.load_config()?;
    info!(
        cluster = %config.target_cluster,
        tables = config.table_ids.len(),
        dry_run = config.dry_run,
        "starting lookup sync"
    );

    let (cache, _ephemeral) = prepare_cache(config.cache_dir.as_deref())?;
    let records = load_cluster_services(&config.export_path).await?;

    let client = RateLimitedHttpClient::new(config.credentials.clone())?;
    let sync = LookupTableSync::new(
        Arc::new(client) as Arc<dyn ApiTransport>,
        cache,
        SyncSettings::from_config(&config),
    );
    sync.run(&records).await
}

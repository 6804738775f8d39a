//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `INPUT_SUMOLOGIC_CONFIG`: JSON object with `SUMOLOGIC_ACCESS_ID`,
//!   `SUMOLOGIC_ACCESS_KEY` and `SUMOLOGIC_API_ENDPOINT`
//! - `SUMOLOGIC_ACCESS_ID`, `SUMOLOGIC_ACCESS_KEY`, `SUMOLOGIC_API_ENDPOINT`:
//!   override the matching field of `INPUT_SUMOLOGIC_CONFIG`
//! - `INPUT_CLUSTER`: target cluster (required)
//! - `LOOKUPSYNC_EXPORT_PATH`: export file (default `/tmp/payload`)
//! - `LOOKUPSYNC_CACHE_DIR`: persistent response cache directory
//! - `LOOKUPSYNC_TABLE_IDS`: comma-separated lookup table ids
//! - `LOOKUPSYNC_CONCURRENCY`: tables fetched in parallel (only 1 is accepted)
//! - `LOOKUPSYNC_DRY_RUN`: log mutations instead of issuing them
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./lookupsync.toml` or `./lookupsync.json` (current working directory)
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};

use lookupsync_domain::{ApiCredentials, Config, Result, SyncError};
use serde::Deserialize;

/// Credentials as passed by the workflow input.
#[derive(Debug, Default, Deserialize)]
struct CredentialsInput {
    #[serde(rename = "SUMOLOGIC_ACCESS_ID")]
    id: Option<String>,
    #[serde(rename = "SUMOLOGIC_ACCESS_KEY")]
    key: Option<String>,
    #[serde(rename = "SUMOLOGIC_API_ENDPOINT")]
    endpoint: Option<String>,
}

/// Load configuration with automatic fallback strategy
///
/// First builds the configuration from `lookup`. If any required value is
/// missing, falls back to the first config file found in `dirs`.
///
/// # Errors
/// Returns `SyncError::Config` if configuration cannot be loaded from either
/// source.
pub fn load_with_fallback<F>(lookup: F, dirs: &[PathBuf]) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    match load_from_lookup(lookup) {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            let path = probe_config_paths(dirs).ok_or_else(|| {
                SyncError::Config(format!("{e}; no config file found in the standard locations"))
            })?;
            load_from_file(&path)
        }
    }
}

/// Build a configuration from an arbitrary variable lookup
///
/// `lookup` resolves the environment variable names listed above; callers
/// layer command-line values over the process environment this way.
///
/// # Errors
/// Returns `SyncError::Config` if required values are missing or a value is
/// invalid.
pub fn load_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let input: CredentialsInput = match non_empty(&lookup, "INPUT_SUMOLOGIC_CONFIG") {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("Invalid INPUT_SUMOLOGIC_CONFIG: {e}")))?,
        None => CredentialsInput::default(),
    };

    let credentials = ApiCredentials::new(
        non_empty(&lookup, "SUMOLOGIC_ACCESS_ID").or(input.id).unwrap_or_default(),
        non_empty(&lookup, "SUMOLOGIC_ACCESS_KEY").or(input.key).unwrap_or_default(),
        non_empty(&lookup, "SUMOLOGIC_API_ENDPOINT").or(input.endpoint).unwrap_or_default(),
    );
    let target_cluster = non_empty(&lookup, "INPUT_CLUSTER").ok_or_else(|| {
        SyncError::Config("Missing required environment variable: INPUT_CLUSTER".to_string())
    })?;

    let mut config = Config::new(credentials, target_cluster);
    if let Some(path) = non_empty(&lookup, "LOOKUPSYNC_EXPORT_PATH") {
        config.export_path = PathBuf::from(path);
    }
    config.cache_dir = non_empty(&lookup, "LOOKUPSYNC_CACHE_DIR").map(PathBuf::from);
    if let Some(ids) = non_empty(&lookup, "LOOKUPSYNC_TABLE_IDS") {
        config.table_ids = split_list(&ids);
    }
    if let Some(raw) = non_empty(&lookup, "LOOKUPSYNC_CONCURRENCY") {
        config.concurrency = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| SyncError::Config(format!("Invalid concurrency: {e}")))?;
    }
    config.dry_run = parse_bool(lookup("LOOKUPSYNC_DRY_RUN").as_deref(), false);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SyncError::Config` if the file is missing, its format is
/// invalid, or required fields are missing.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(SyncError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Directories searched for a config file: the working directory, then the
/// directory of the executable.
pub fn standard_config_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }
    dirs
}

/// Probe `dirs` for a configuration file
///
/// # Returns
/// The first config file found (TOML before JSON within a directory), or
/// `None` if no file exists.
pub fn probe_config_paths(dirs: &[PathBuf]) -> Option<PathBuf> {
    const NAMES: [&str; 2] = ["lookupsync.toml", "lookupsync.json"];
    dirs.iter()
        .flat_map(|dir| NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|id| !id.is_empty()).map(str::to_string).collect()
}

/// Parse a boolean flag
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    raw.map_or(default, |s| {
        matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    const WORKFLOW_INPUT: &str = r#"{
        "SUMOLOGIC_ACCESS_ID": "suABC",
        "SUMOLOGIC_ACCESS_KEY": "s3cr3t",
        "SUMOLOGIC_API_ENDPOINT": "https://api.us2.sumologic.com/api"
    }"#;

    #[test]
    fn workflow_input_provides_credentials_and_defaults_fill_the_rest() {
        let config = load_from_lookup(lookup(&[
            ("INPUT_SUMOLOGIC_CONFIG", WORKFLOW_INPUT),
            ("INPUT_CLUSTER", "i05"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.id, "suABC");
        assert_eq!(config.credentials.endpoint, "https://api.us2.sumologic.com/api");
        assert_eq!(config.target_cluster, "i05");
        assert_eq!(config.export_path, PathBuf::from("/tmp/payload"));
        assert_eq!(config.table_ids, vec!["0000000001007719", "0000000000FF668A"]);
        assert_eq!(config.concurrency, 1);
        assert!(config.cache_dir.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn individual_variables_override_workflow_input() {
        let config = load_from_lookup(lookup(&[
            ("INPUT_SUMOLOGIC_CONFIG", WORKFLOW_INPUT),
            ("SUMOLOGIC_ACCESS_KEY", "rotated"),
            ("SUMOLOGIC_API_ENDPOINT", "https://api.eu.sumologic.com/api"),
            ("INPUT_CLUSTER", "i05"),
            ("LOOKUPSYNC_TABLE_IDS", " T1, ,T2 "),
            ("LOOKUPSYNC_CACHE_DIR", "/tmp/lookupsync-cache"),
            ("LOOKUPSYNC_DRY_RUN", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.id, "suABC");
        assert_eq!(config.credentials.key, "rotated");
        assert_eq!(config.credentials.endpoint, "https://api.eu.sumologic.com/api");
        assert_eq!(config.table_ids, vec!["T1", "T2"]);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/lookupsync-cache")));
        assert!(config.dry_run);
    }

    #[test]
    fn credentials_without_workflow_input() {
        let config = load_from_lookup(lookup(&[
            ("SUMOLOGIC_ACCESS_ID", "id"),
            ("SUMOLOGIC_ACCESS_KEY", "key"),
            ("SUMOLOGIC_API_ENDPOINT", "https://api.example.com/api"),
            ("INPUT_CLUSTER", "a"),
        ]))
        .unwrap();
        assert_eq!(config.credentials.key, "key");
    }

    #[test]
    fn missing_cluster_is_a_config_error() {
        let err = load_from_lookup(lookup(&[("INPUT_SUMOLOGIC_CONFIG", WORKFLOW_INPUT)])).unwrap_err();
        assert!(matches!(err, SyncError::Config(ref msg) if msg.contains("INPUT_CLUSTER")));
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = load_from_lookup(lookup(&[
            ("SUMOLOGIC_ACCESS_ID", "id"),
            ("SUMOLOGIC_API_ENDPOINT", "https://api.example.com/api"),
            ("INPUT_CLUSTER", "a"),
        ]))
        .unwrap_err();
        assert_eq!(err, SyncError::Config("access key is required".into()));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let bad_json = load_from_lookup(lookup(&[("INPUT_SUMOLOGIC_CONFIG", "{"), ("INPUT_CLUSTER", "a")]));
        assert!(matches!(bad_json, Err(SyncError::Config(_))));

        let bad_number = load_from_lookup(lookup(&[
            ("INPUT_SUMOLOGIC_CONFIG", WORKFLOW_INPUT),
            ("INPUT_CLUSTER", "a"),
            ("LOOKUPSYNC_CONCURRENCY", "many"),
        ]));
        assert!(matches!(bad_number, Err(SyncError::Config(_))));
    }

    #[test]
    fn parallel_fetch_concurrency_is_rejected() {
        let err = load_from_lookup(lookup(&[
            ("INPUT_SUMOLOGIC_CONFIG", WORKFLOW_INPUT),
            ("INPUT_CLUSTER", "i05"),
            ("LOOKUPSYNC_CONCURRENCY", "8"),
        ]))
        .unwrap_err();
        assert_eq!(err, SyncError::Config("concurrency must be 1, got 8".into()));
    }

    #[test]
    fn test_parse_bool() {
        for raw in ["1", "true", "YES", "on"] {
            assert!(parse_bool(Some(raw), false), "{raw}");
        }
        for raw in ["0", "false", "no", "off", "junk"] {
            assert!(!parse_bool(Some(raw), true), "{raw}");
        }
        assert!(parse_bool(None, true));
        assert!(!parse_bool(None, false));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = parse_config("", Path::new("lookupsync.yaml")).unwrap_err();
        assert!(matches!(err, SyncError::Config(ref msg) if msg.contains("yaml")));
    }
}

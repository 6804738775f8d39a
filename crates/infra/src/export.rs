//! Cluster/service export loading
//!
//! The export is newline-delimited JSON, one record per line. Blank lines
//! are skipped; any other line must be a complete record.

use std::path::Path;

use lookupsync_domain::{ClusterServiceRecord, Result, SyncError};
use tracing::info;

/// Parse export contents into records.
///
/// # Errors
/// `SyncError::ExportParse` with the 1-based line number of the first line
/// that is not a valid record.
pub fn parse_cluster_services(contents: &str) -> Result<Vec<ClusterServiceRecord>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| SyncError::ExportParse { line: index + 1, detail: e.to_string() })
        })
        .collect()
}

/// Read and parse the export at `path`.
///
/// # Errors
/// `SyncError::Io` when the file cannot be read, `SyncError::ExportParse`
/// when a line is invalid.
pub async fn load_cluster_services(path: impl AsRef<Path>) -> Result<Vec<ClusterServiceRecord>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SyncError::Io(format!("failed to read export {}: {e}", path.display())))?;
    let records = parse_cluster_services(&contents)?;
    info!(path = %path.display(), records = records.len(), "loaded cluster services");
    Ok(records)
}

use std::time::Duration;

use lookupsync_core::SyncReport;
use lookupsync_domain::SyncError;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` selects the levels, `info` when unset.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_current_span(false)).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

/// Stable label for an error, suitable for log fields.
#[inline]
pub const fn error_label(error: &SyncError) -> &'static str {
    match error {
        SyncError::Submission { .. } => "submission",
        SyncError::JobFailed { .. } => "job_failed",
        SyncError::JobTimeout { .. } => "job_timeout",
        SyncError::ResultFetch { .. } => "result_fetch",
        SyncError::ResultTruncated { .. } => "result_truncated",
        SyncError::TableLookup { .. } => "table_lookup",
        SyncError::MalformedResponse { .. } => "malformed_response",
        SyncError::UploadRow { .. } => "upload_row",
        SyncError::DeleteRow { .. } => "delete_row",
        SyncError::ExportParse { .. } => "export_parse",
        SyncError::Cache(_) => "cache",
        SyncError::Config(_) => "config",
        SyncError::Network(_) => "network",
        SyncError::Io(_) => "io",
    }
}

/// Log the outcome of a run with structured fields.
pub fn log_outcome(outcome: &Result<SyncReport, SyncError>, elapsed: Duration) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(report) if report.failure_count() == 0 => info!(
            duration_ms,
            tables = report.tables,
            upserted = report.upload.upserted,
            deleted = report.prune.deleted,
            planned = report.upload.planned + report.prune.planned,
            "sync_completed"
        ),
        Ok(report) => warn!(
            duration_ms,
            upserted = report.upload.upserted,
            deleted = report.prune.deleted,
            upsert_failures = report.upload.failures.len(),
            delete_failures = report.prune.failures.len(),
            "sync_completed_with_failures"
        ),
        Err(err) => error!(
            duration_ms,
            error_type = error_label(err),
            phase = ?err.phase(),
            error = %err,
            "sync_failed"
        ),
    }
}

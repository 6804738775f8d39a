//! Error types used throughout the reconciliation pipeline

use thiserror::Error;

/// Phase of a run an error belongs to.
///
/// Read-phase failures abort the run: continuing with an incomplete view of
/// the remote table could delete rows that are still current. Write-phase
/// failures only affect the record they occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Configuration, export loading, cache and transport setup
    Setup,
    /// Table metadata lookup and search jobs
    Read,
    /// Row upserts and deletions
    Write,
}

/// Main error type for lookupsync
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Job submission to {path} failed with HTTP {status}: {detail}")]
    Submission { path: String, status: u16, detail: String },

    #[error("Job {job_id} failed: {reason}")]
    JobFailed { job_id: String, reason: String },

    #[error("Job {job_id} did not complete after {attempts} status checks")]
    JobTimeout { job_id: String, attempts: usize },

    #[error("Could not fetch job result from {path}: HTTP {status}")]
    ResultFetch { path: String, status: u16 },

    #[error("Job {job_id} matched {message_count} messages, above the fetch limit of {limit}")]
    ResultTruncated { job_id: String, message_count: u64, limit: u64 },

    #[error("Lookup table {table_id} could not be read: HTTP {status}")]
    TableLookup { table_id: String, status: u16 },

    #[error("Malformed response from {endpoint}: {detail}")]
    MalformedResponse { endpoint: String, detail: String },

    #[error("Upsert of {identity_key} into table {table_id} failed: {reason}")]
    UploadRow { table_id: String, identity_key: String, reason: String },

    #[error("Delete of {identity_key} from table {table_id} failed: {reason}")]
    DeleteRow { table_id: String, identity_key: String, reason: String },

    #[error("Export line {line} is not a valid record: {detail}")]
    ExportParse { line: usize, detail: String },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl SyncError {
    /// Shorthand for a [`SyncError::MalformedResponse`].
    pub fn malformed(endpoint: impl Into<String>, detail: impl ToString) -> Self {
        Self::MalformedResponse { endpoint: endpoint.into(), detail: detail.to_string() }
    }

    /// Phase of the run this error belongs to.
    pub fn phase(&self) -> SyncPhase {
        match self {
            Self::Submission { .. }
            | Self::JobFailed { .. }
            | Self::JobTimeout { .. }
            | Self::ResultFetch { .. }
            | Self::ResultTruncated { .. }
            | Self::TableLookup { .. }
            | Self::MalformedResponse { .. }
            | Self::Network(_) => SyncPhase::Read,
            Self::UploadRow { .. } | Self::DeleteRow { .. } => SyncPhase::Write,
            Self::ExportParse { .. } | Self::Cache(_) | Self::Config(_) | Self::Io(_) => {
                SyncPhase::Setup
            }
        }
    }

    /// Whether the error must abort the run.
    pub fn is_fatal(&self) -> bool {
        self.phase() != SyncPhase::Write
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Convert from CommonError to SyncError
impl From<lookupsync_common::error::CommonError> for SyncError {
    fn from(err: lookupsync_common::error::CommonError) -> Self {
        Self::Cache(err.to_string())
    }
}

/// Result type alias for lookupsync operations
pub type Result<T> = std::result::Result<T, SyncError>;

use lookupsync_domain::constants::SEARCH_MESSAGE_LIMIT;
use lookupsync_domain::{
    ApiResponse, GenericJobStatus, RemoteJob, Result, SearchJobState, SyncError,
};
use serde::Deserialize;
use tracing::info;

/// Result of evaluating one successful status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobProgress {
    /// Job still running; carries the reported state for logging
    Running(String),
    Done,
}

/// Endpoint-specific parsing for one kind of asynchronous job.
pub trait JobProtocol: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    /// Build the job handle from a 2xx submission response.
    ///
    /// # Errors
    /// `MalformedResponse` when the job id or status link is missing.
    fn accept_submission(&self, submit_path: &str, response: &ApiResponse) -> Result<RemoteJob>;

    /// Classify a 2xx status response.
    ///
    /// # Errors
    /// `JobFailed` for terminal states other than completion and for states
    /// the protocol does not recognize; `MalformedResponse` when the status
    /// field is missing.
    fn evaluate(&self, job: &RemoteJob, response: &ApiResponse) -> Result<JobProgress>;
}

#[derive(Debug, Deserialize)]
struct SearchSubmitted {
    id: String,
    link: SearchLink,
}

#[derive(Debug, Deserialize)]
struct SearchLink {
    href: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchStatus {
    state: String,
    #[serde(default)]
    message_count: Option<u64>,
    #[serde(default)]
    record_count: Option<u64>,
}

/// Search job API: status lives at the returned link, messages below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchJobProtocol {
    message_limit: u64,
}

impl SearchJobProtocol {
    pub const fn new(message_limit: u64) -> Self {
        Self { message_limit }
    }

    pub const fn message_limit(&self) -> u64 {
        self.message_limit
    }
}

impl Default for SearchJobProtocol {
    fn default() -> Self {
        Self::new(SEARCH_MESSAGE_LIMIT)
    }
}

impl JobProtocol for SearchJobProtocol {
    fn name(&self) -> &'static str {
        "search"
    }

    fn accept_submission(&self, submit_path: &str, response: &ApiResponse) -> Result<RemoteJob> {
        let submitted: SearchSubmitted = response.parse(submit_path)?;
        let status_path = submitted.link.href;
        Ok(RemoteJob {
            job_id: submitted.id,
            result_path: format!("{status_path}/messages?offset=0&limit={}", self.message_limit),
            status_path,
        })
    }

    fn evaluate(&self, job: &RemoteJob, response: &ApiResponse) -> Result<JobProgress> {
        let status: SearchStatus = response.parse(&job.status_path)?;
        let state = status.state.parse::<SearchJobState>().map_err(|_| SyncError::JobFailed {
            job_id: job.job_id.clone(),
            reason: format!("unrecognized state '{}'", status.state),
        })?;

        if state.is_running() {
            return Ok(JobProgress::Running(state.to_string()));
        }
        if !state.is_done() {
            return Err(SyncError::JobFailed {
                job_id: job.job_id.clone(),
                reason: format!("job ended in state {state}"),
            });
        }

        let message_count = status.message_count.unwrap_or_default();
        if message_count > self.message_limit {
            return Err(SyncError::ResultTruncated {
                job_id: job.job_id.clone(),
                message_count,
                limit: self.message_limit,
            });
        }
        info!(
            job_id = %job.job_id,
            message_count,
            record_count = status.record_count.unwrap_or_default(),
            "search job finished"
        );
        Ok(JobProgress::Done)
    }
}

#[derive(Debug, Deserialize)]
struct GenericSubmitted {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GenericStatus {
    status: String,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Non-search asynchronous jobs (exports, imports): status and result live
/// at `<submit path>/<id>/status` and `<submit path>/<id>/result`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericJobProtocol;

impl JobProtocol for GenericJobProtocol {
    fn name(&self) -> &'static str {
        "job"
    }

    fn accept_submission(&self, submit_path: &str, response: &ApiResponse) -> Result<RemoteJob> {
        let submitted: GenericSubmitted = response.parse(submit_path)?;
        let base = submit_path.trim_end_matches('/');
        Ok(RemoteJob {
            status_path: format!("{base}/{}/status", submitted.id),
            result_path: format!("{base}/{}/result", submitted.id),
            job_id: submitted.id,
        })
    }

    fn evaluate(&self, job: &RemoteJob, response: &ApiResponse) -> Result<JobProgress> {
        let status: GenericStatus = response.parse(&job.status_path)?;
        match status.status.parse::<GenericJobStatus>() {
            Ok(GenericJobStatus::Success) => Ok(JobProgress::Done),
            Ok(GenericJobStatus::InProgress) => Ok(JobProgress::Running(status.status)),
            Ok(GenericJobStatus::Failed) => Err(SyncError::JobFailed {
                job_id: job.job_id.clone(),
                reason: status
                    .error
                    .map_or_else(|| "job reported Failed".to_string(), |e| e.to_string()),
            }),
            Err(_) => Err(SyncError::JobFailed {
                job_id: job.job_id.clone(),
                reason: format!("unrecognized status '{}'", status.status),
            }),
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use lookupsync_domain::{ApiRequest, ApiResponse, RemoteJob, Result, SyncError};
use tracing::{debug, info, instrument, warn};

use super::protocol::{JobProgress, JobProtocol};
use super::schedule::PollSchedule;
use crate::ports::ApiTransport;

/// States of one job's polling lifecycle.
///
/// `Done`, `Failed` and `TimedOut` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Submitted,
    /// Waiting on status check number `attempt` (zero-based)
    Polling { attempt: usize },
    Done,
    Failed(SyncError),
    TimedOut,
}

impl PollState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_) | Self::TimedOut)
    }
}

/// Drives submit, poll and fetch for asynchronous remote jobs.
#[derive(Clone)]
pub struct JobPoller {
    transport: Arc<dyn ApiTransport>,
    schedule: PollSchedule,
}

impl JobPoller {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport, schedule: PollSchedule::default() }
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: PollSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub const fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    /// Submit a job and return its handle.
    ///
    /// # Errors
    /// `Submission` when the call does not return 2xx, the protocol's parse
    /// error when the body lacks the job handle, or the transport error.
    #[instrument(skip(self, protocol, request), fields(protocol = protocol.name(), path = %request.path))]
    pub async fn submit<P: JobProtocol + ?Sized>(
        &self,
        protocol: &P,
        request: ApiRequest,
    ) -> Result<RemoteJob> {
        let path = request.path.clone();
        let response = self.transport.request(request).await?;
        if !response.is_success() {
            return Err(SyncError::Submission {
                detail: submission_detail(&response),
                status: response.status,
                path,
            });
        }

        let job = protocol.accept_submission(&path, &response)?;
        info!(job_id = %job.job_id, status_path = %job.status_path, "job submitted");
        Ok(job)
    }

    /// Poll `job` until it completes, fails or the schedule runs out.
    ///
    /// # Errors
    /// `JobFailed` (or the protocol's error) on the first failing status,
    /// `JobTimeout` when every scheduled check is used without completion.
    #[instrument(skip(self, protocol, job), fields(protocol = protocol.name(), job_id = %job.job_id))]
    pub async fn await_completion<P: JobProtocol + ?Sized>(
        &self,
        protocol: &P,
        job: &RemoteJob,
    ) -> Result<()> {
        let mut state = PollState::Submitted;
        loop {
            state = match state {
                PollState::Submitted => PollState::Polling { attempt: 0 },
                PollState::Polling { attempt } => match self.schedule.delay(attempt) {
                    Some(delay) => self.check(protocol, job, attempt, delay).await,
                    None => PollState::TimedOut,
                },
                PollState::Done => return Ok(()),
                PollState::Failed(err) => return Err(err),
                PollState::TimedOut => {
                    warn!(attempts = self.schedule.attempts(), "job did not finish in time");
                    return Err(SyncError::JobTimeout {
                        job_id: job.job_id.clone(),
                        attempts: self.schedule.attempts(),
                    });
                }
            };
        }
    }

    /// One scheduled status check and the transition it implies.
    async fn check<P: JobProtocol + ?Sized>(
        &self,
        protocol: &P,
        job: &RemoteJob,
        attempt: usize,
        delay: Duration,
    ) -> PollState {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        info!(attempt, delay_ms, "check job status in {delay_ms}ms");

        let request = ApiRequest::get(&job.status_path).with_pre_delay(delay);
        let response = match self.transport.request(request).await {
            Ok(response) => response,
            Err(err) => return PollState::Failed(err),
        };

        if response.is_rate_limited() {
            warn!(attempt, "status check rate limited");
            return PollState::Polling { attempt: attempt + 1 };
        }
        if !response.is_success() {
            return PollState::Failed(SyncError::JobFailed {
                job_id: job.job_id.clone(),
                reason: format!("status check returned {}: {}", response.status, response.body_summary()),
            });
        }

        match protocol.evaluate(job, &response) {
            Ok(JobProgress::Done) => PollState::Done,
            Ok(JobProgress::Running(state)) => {
                debug!(attempt, %state, "job still running");
                PollState::Polling { attempt: attempt + 1 }
            }
            Err(err) => PollState::Failed(err),
        }
    }

    /// Fetch the result of a completed job.
    ///
    /// # Errors
    /// `ResultFetch` when the call does not return 200.
    #[instrument(skip(self, job), fields(job_id = %job.job_id))]
    pub async fn fetch_result(&self, job: &RemoteJob) -> Result<ApiResponse> {
        let response = self.transport.request(ApiRequest::get(&job.result_path)).await?;
        if response.status != 200 {
            return Err(SyncError::ResultFetch { path: job.result_path.clone(), status: response.status });
        }
        Ok(response)
    }

    /// Submit, wait for completion and fetch the result.
    ///
    /// # Errors
    /// Any error from [`submit`](Self::submit),
    /// [`await_completion`](Self::await_completion) or
    /// [`fetch_result`](Self::fetch_result).
    pub async fn run<P: JobProtocol + ?Sized>(
        &self,
        protocol: &P,
        request: ApiRequest,
    ) -> Result<ApiResponse> {
        let job = self.submit(protocol, request).await?;
        self.await_completion(protocol, &job).await?;
        self.fetch_result(&job).await
    }
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller").field("schedule", &self.schedule).finish_non_exhaustive()
    }
}

/// Error code reported by the platform, or the raw body when there is none.
fn submission_detail(response: &ApiResponse) -> String {
    response
        .body
        .get("code")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| response.body_summary(), str::to_string)
}

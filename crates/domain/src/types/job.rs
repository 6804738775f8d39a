use crate::impl_remote_status_conversions;

/// A submitted asynchronous job and where to find its status and result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteJob {
    pub job_id: String,
    pub status_path: String,
    pub result_path: String,
}

/// Lifecycle states reported by the search job API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchJobState {
    NotStarted,
    GatheringResults,
    /// Paused by the platform at its message ceiling; results are partial
    ForcePaused,
    DoneGatheringResults,
    Cancelled,
}

impl_remote_status_conversions!(SearchJobState {
    NotStarted => "NOT STARTED",
    GatheringResults => "GATHERING RESULTS",
    ForcePaused => "FORCE PAUSED",
    DoneGatheringResults => "DONE GATHERING RESULTS",
    Cancelled => "CANCELLED",
});

impl SearchJobState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::NotStarted | Self::GatheringResults)
    }

    pub const fn is_done(self) -> bool {
        matches!(self, Self::DoneGatheringResults)
    }
}

/// Status values reported by non-search asynchronous jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericJobStatus {
    InProgress,
    Success,
    Failed,
}

impl_remote_status_conversions!(GenericJobStatus {
    InProgress => "InProgress",
    Success => "Success",
    Failed => "Failed",
});

use lookupsync_domain::{RemoteRowIndex, SyncError};

/// Result of reading the remote tables.
///
/// Tables whose fetch failed are absent from `index` and listed in
/// `failures`; callers decide whether a partial view is acceptable.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub index: RemoteRowIndex,
    pub failures: Vec<(String, SyncError)>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Counters of the upload phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub upserted: usize,
    /// Upserts skipped because of dry-run mode
    pub planned: usize,
    /// Local records belonging to another cluster
    pub skipped: usize,
    pub failures: Vec<SyncError>,
}

/// Counters of the prune phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: usize,
    pub planned: usize,
    pub failures: Vec<SyncError>,
}

/// Summary of a full run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub tables: usize,
    /// Target-cluster rows found remotely before the upload phase
    pub remote_rows: usize,
    pub upload: UploadReport,
    pub prune: PruneReport,
}

impl SyncReport {
    pub fn failure_count(&self) -> usize {
        self.upload.failures.len() + self.prune.failures.len()
    }
}

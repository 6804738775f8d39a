//! Application constants
//!
//! Centralized location for the remote platform's limits and the defaults
//! derived from them.

use std::time::Duration;

// Remote request budget is 240 calls/minute per credential. With a 1.5s
// head start before the first status check a single worker submits at most
// 40 jobs per minute, roughly 120 calls at three calls per job.
pub const POLL_SCHEDULE_MS: [u64; 5] = [1_500, 7_500, 15_000, 30_000, 60_000];
pub const PACING_DELAY: Duration = Duration::from_millis(1_500);

// Search jobs
pub const SEARCH_JOBS_PATH: &str = "/v1/search/jobs";
pub const SEARCH_MESSAGE_LIMIT: u64 = 10_000;
pub const SEARCH_WINDOW_MS: i64 = 1_000;

// Lookup tables
pub const LOOKUP_TABLES_PATH: &str = "/v1/lookupTables";
pub const ADMIN_MODE_HEADER: &str = "isAdminMode";
pub const DEFAULT_TABLE_IDS: [&str; 2] = ["0000000001007719", "0000000000FF668A"];

// Workers
pub const DEFAULT_CONCURRENCY: usize = 1;

// Local files
pub const DEFAULT_EXPORT_PATH: &str = "/tmp/payload";

// Column names shared by the export and the remote tables
pub const COLUMN_CLUSTER: &str = "cluster";
pub const COLUMN_SERVICE: &str = "service";
pub const COLUMN_GIT_REPO: &str = "git_repo";
pub const COLUMN_GIT_BRANCH: &str = "git_branch";
pub const COLUMN_ECR_REPO: &str = "ecr_repo";
pub const COLUMN_ECR_TAG: &str = "ecr_tag";

//! Asynchronous job polling
//!
//! Long-running remote queries follow one shape: submit a job, poll its
//! status on a fixed schedule, then fetch the result once the job reports
//! completion. [`JobPoller`] drives that workflow as an explicit state
//! machine; a [`JobProtocol`] supplies the endpoint-specific parsing.
//!
//! Status responses fall into three classes:
//! - rate limited (HTTP 429): not an error, the next scheduled poll runs
//! - still running: the next scheduled poll runs
//! - anything else that is not completion: the job fails immediately
//!
//! When the schedule runs out the job fails with `JobTimeout`.

mod machine;
mod protocol;
mod schedule;

pub use machine::{JobPoller, PollState};
pub use protocol::{GenericJobProtocol, JobProgress, JobProtocol, SearchJobProtocol};
pub use schedule::PollSchedule;

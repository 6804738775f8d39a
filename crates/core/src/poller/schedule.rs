use std::time::Duration;

use lookupsync_domain::constants::POLL_SCHEDULE_MS;

/// Delays slept before each status check, in order.
///
/// The length of the table is the maximum number of status checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSchedule {
    delays: Vec<Duration>,
}

impl PollSchedule {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self { delays: delays.into_iter().collect() }
    }

    /// Delay before status check number `attempt` (zero-based).
    pub fn delay(&self, attempt: usize) -> Option<Duration> {
        self.delays.get(attempt).copied()
    }

    pub fn attempts(&self) -> usize {
        self.delays.len()
    }

    /// Time spent sleeping if every check is used.
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }
}

impl Default for PollSchedule {
    /// 1.5s, 7.5s, 15s, 30s, 60s.
    fn default() -> Self {
        Self::new(POLL_SCHEDULE_MS.iter().map(|ms| Duration::from_millis(*ms)))
    }
}

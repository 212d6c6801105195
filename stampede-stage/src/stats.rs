//! Query and timeout counters for one run

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters updated by every worker of a run
///
/// A failed query bumps the query counter before the timeout counter and a
/// snapshot reads the timeouts first, so no reader ever observes more
/// timeouts than queries.
#[derive(Debug, Default)]
pub struct RunStats {
    queries: AtomicU64,
    timeouts: AtomicU64,
}

/// Consistent pair of counter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub queries: u64,
    pub timeouts: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    /// Count a failed query; every failure is reported as a timeout
    pub fn record_failure(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.timeouts.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let timeouts = self.timeouts.load(Ordering::SeqCst);
        let queries = self.queries.load(Ordering::SeqCst);
        StatsSnapshot { queries, timeouts }
    }
}

impl StatsSnapshot {
    pub fn timeout_percentage(&self) -> String {
        timeout_percentage(self.timeouts, self.queries)
    }
}

/// `100 * timeouts / queries` with two decimals and a trailing `%`
///
/// A run without queries reports `0.00%`.
pub fn timeout_percentage(timeouts: u64, queries: u64) -> String {
    if queries == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", 100.0 * timeouts as f64 / queries as f64)
}

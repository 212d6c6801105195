//! Stage (traffic profile) configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::validation::{require_positive, Validatable};

/// Immutable traffic profile for one stage run
///
/// Every field defaults to zero so that a missing field in a submission is
/// reported as required instead of silently picking a value. Older clients
/// used the `workers_count`/`msg_by_sec`/`time_to_*` spellings, which are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Workers started before the first ramp step
    #[serde(alias = "workers_count")]
    pub worker_count: u32,

    /// Workers added at every ramp step
    pub workers_to_add: u32,

    /// Number of ramp steps
    pub increment_load: u32,

    /// Concurrent event producers
    #[serde(alias = "producers_count")]
    pub producer_count: u32,

    /// Events per second emitted by each producer
    #[serde(alias = "msg_by_sec")]
    pub msg_per_sec: u32,

    /// Seconds between ramp steps
    #[serde(alias = "time_to_sleep_secs")]
    pub sleep_secs: u64,

    /// Seconds of steady load after the last ramp step
    #[serde(alias = "time_to_finish_secs")]
    pub finish_secs: u64,

    /// Deadline for every sampling query
    pub query_timeout_ms: u64,

    /// Rows per fetch round trip; 0 lets the backend decide
    pub batch_size: u32,

    /// Documents seeded before traffic starts
    pub collection_size: u32,

    /// Payload size of every seeded document, in KiB
    #[serde(alias = "document_size")]
    pub document_size_kb: u32,
}

impl StageConfig {
    /// A small profile suitable for a first run against a local store
    pub fn sample() -> Self {
        Self {
            worker_count: 4,
            workers_to_add: 2,
            increment_load: 3,
            producer_count: 2,
            msg_per_sec: 50,
            sleep_secs: 10,
            finish_secs: 30,
            query_timeout_ms: 500,
            batch_size: 100,
            collection_size: 1_000,
            document_size_kb: 1,
        }
    }

    /// Interval between two events of the same producer
    ///
    /// Integer division of 1000 ms by the rate: rates that do not divide 1000
    /// evenly lose precision, and rates above 1000/s collapse to zero (callers
    /// clamp to their timer resolution).
    pub fn tick_interval(&self) -> Duration {
        match self.msg_per_sec {
            0 => Duration::ZERO,
            rate => Duration::from_millis(u64::from(1000 / rate)),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn ramp_interval(&self) -> Duration {
        Duration::from_secs(self.sleep_secs)
    }

    pub fn finish_window(&self) -> Duration {
        Duration::from_secs(self.finish_secs)
    }

    /// Worker population once every ramp step has run
    pub fn final_worker_count(&self) -> u64 {
        u64::from(self.worker_count) + u64::from(self.increment_load) * u64::from(self.workers_to_add)
    }

    /// Rules the stage engine itself depends on
    ///
    /// Unlike [`Validatable::violations`], a zero ramp is accepted here: a
    /// stage without ramp steps is a valid flat-load run for the engine, only
    /// the submission surface insists on a ramp.
    pub fn runtime_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require_positive(self.worker_count, "worker_count", &mut violations);
        require_positive(self.producer_count, "producer_count", &mut violations);
        require_positive(self.msg_per_sec, "msg_per_sec", &mut violations);
        require_positive(self.query_timeout_ms, "query_timeout_ms", &mut violations);
        violations
    }
}

impl Validatable for StageConfig {
    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require_positive(self.worker_count, "worker_count", &mut violations);
        require_positive(self.query_timeout_ms, "query_timeout_ms", &mut violations);
        require_positive(self.workers_to_add, "workers_to_add", &mut violations);
        require_positive(self.increment_load, "increment_load", &mut violations);
        require_positive(self.msg_per_sec, "msg_per_sec", &mut violations);
        require_positive(self.producer_count, "producer_count", &mut violations);
        require_positive(self.sleep_secs, "sleep_secs", &mut violations);
        require_positive(self.finish_secs, "finish_secs", &mut violations);
        violations
    }

    fn domain_name(&self) -> &'static str {
        "stage"
    }
}

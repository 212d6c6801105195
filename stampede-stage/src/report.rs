//! Final report of a stage run

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use stampede_interfaces::PoolStatsSnapshot;

const RULE: &str =
    "--------------------------------------------------------------------------------------------------------------";
const STARS: &str = "************************************";

/// Population change made by one ramp step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RampStep {
    /// 1-based step number
    pub step: u32,
    pub workers_added: usize,
    pub population: usize,
    /// Seconds since traffic started
    pub elapsed_secs: u64,
}

/// Aggregate outcome of a completed stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub stage_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_queries: u64,
    pub total_timeouts: u64,
    pub timeout_percentage: String,
    pub events_produced: u64,
    pub events_handled: u64,
    pub workers_spawned: usize,
    pub ramp_history: Vec<RampStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStatsSnapshot>,
}

impl RunReport {
    /// Emit the closing banner
    pub fn log_banner(&self) {
        let pool = self
            .pool
            .map(|snapshot| snapshot.to_string())
            .unwrap_or_else(|| "no connection pool".to_string());

        info!(stage_id = %self.stage_id, "");
        info!(stage_id = %self.stage_id, "{}", RULE);
        info!(stage_id = %self.stage_id, "Final stats: {}", pool);
        info!(stage_id = %self.stage_id, "{}", RULE);
        info!(stage_id = %self.stage_id, "");
        info!(stage_id = %self.stage_id, "{}", STARS);
        info!(stage_id = %self.stage_id, "Total query count: {}", self.total_queries);
        info!(stage_id = %self.stage_id, "Total query timeouts: {}", self.total_timeouts);
        info!(stage_id = %self.stage_id, "Timeout percentage: {}", self.timeout_percentage);
        info!(stage_id = %self.stage_id, "{}", STARS);
    }
}

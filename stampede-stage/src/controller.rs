//! Stage orchestration: seed, load, ramp, finish, drain, report

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use stampede_config::StageConfig;
use stampede_interfaces::Repository;

use crate::arena::WorkerArena;
use crate::channel::{EventChannel, EVENT_CHANNEL_CAPACITY};
use crate::clock::{Clock, TokioClock};
use crate::error::StageError;
use crate::generator::generate_identifier;
use crate::producer::{ProducerGroup, PRODUCER_STOP_GRACE};
use crate::report::{RampStep, RunReport};
use crate::seeder::seed;
use crate::stats::{RunStats, StatsSnapshot};
use crate::worker::WorkerContext;

const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Counters gathered while traffic flows
struct Totals {
    stats: StatsSnapshot,
    events_produced: u64,
    events_handled: u64,
    workers_spawned: usize,
    ramp_history: Vec<RampStep>,
}

/// Drives one stage from seeding to the final report
pub struct StageController {
    stage_id: String,
    clock: Arc<dyn Clock>,
    channel_capacity: usize,
    producer_grace: Duration,
}

impl StageController {
    pub fn new(stage_id: impl Into<String>) -> Self {
        Self {
            stage_id: stage_id.into(),
            clock: Arc::new(TokioClock),
            channel_capacity: EVENT_CHANNEL_CAPACITY,
            producer_grace: PRODUCER_STOP_GRACE,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bound of the event channel; a zero capacity is raised to 1
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        if capacity == 0 {
            warn!(stage_id = %self.stage_id, "Event channel capacity must be positive, using 1");
        }
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    /// Run the stage against `repository`, which is closed before returning
    ///
    /// The repository is released exactly once whether the run completes or
    /// fails; a failing close is logged and does not fail the run.
    pub async fn run(
        &self,
        config: &StageConfig,
        repository: Arc<dyn Repository>,
    ) -> Result<RunReport, StageError> {
        let started_at = Utc::now();
        info!(
            stage_id = %self.stage_id,
            backend = repository.backend_name(),
            "Stage starting"
        );

        let outcome = self.drive(config, Arc::clone(&repository)).await;

        if let Err(e) = repository.close().await {
            warn!(stage_id = %self.stage_id, "Failed to close repository: {}", e);
        }

        let totals = outcome?;
        let report = RunReport {
            stage_id: self.stage_id.clone(),
            started_at,
            finished_at: Utc::now(),
            total_queries: totals.stats.queries,
            total_timeouts: totals.stats.timeouts,
            timeout_percentage: totals.stats.timeout_percentage(),
            events_produced: totals.events_produced,
            events_handled: totals.events_handled,
            workers_spawned: totals.workers_spawned,
            ramp_history: totals.ramp_history,
            pool: repository.pool_stats(),
        };
        report.log_banner();
        Ok(report)
    }

    async fn drive(
        &self,
        config: &StageConfig,
        repository: Arc<dyn Repository>,
    ) -> Result<Totals, StageError> {
        let violations = config.runtime_violations();
        if !violations.is_empty() {
            return Err(StageError::invalid_config(violations));
        }
        let stats = Arc::new(RunStats::new());

        let identifiers = seed(
            repository.as_ref(),
            config.collection_size,
            config.document_size_kb,
        )
        .await?;
        repository.set_valid_identifiers(identifiers.clone());

        let channel = EventChannel::new(self.channel_capacity);
        let producers = ProducerGroup::spawn(
            config.producer_count as usize,
            config.tick_interval(),
            channel.sender(),
        );

        let context = Arc::new(WorkerContext {
            repository: Arc::clone(&repository),
            identifiers,
            query_timeout: config.query_timeout(),
            batch_size: config.batch_size,
            stats: Arc::clone(&stats),
        });
        let mut workers = WorkerArena::new(context, channel.receiver());
        workers.grow(config.worker_count as usize);

        let traffic_started = self.clock.now();
        let mut ramp_history = Vec::with_capacity(config.increment_load as usize);
        for step in 1..=config.increment_load {
            info!(
                stage_id = %self.stage_id,
                "Waiting {} seconds to add {} workers. Current count: {}",
                config.sleep_secs,
                config.workers_to_add,
                workers.population()
            );
            self.wait_with_status(config.ramp_interval(), &stats, &channel, &workers, repository.as_ref())
                .await;

            let population = workers.grow(config.workers_to_add as usize);
            info!(
                stage_id = %self.stage_id,
                "{} workers added. Using {} in total",
                config.workers_to_add,
                population
            );
            ramp_history.push(RampStep {
                step,
                workers_added: config.workers_to_add as usize,
                population,
                elapsed_secs: (self.clock.now() - traffic_started).as_secs(),
            });
        }

        info!(stage_id = %self.stage_id, "Waiting {} seconds to finish", config.finish_secs);
        self.wait_with_status(config.finish_window(), &stats, &channel, &workers, repository.as_ref())
            .await;

        let events_produced = producers
            .stop(self.clock.as_ref(), self.producer_grace)
            .await;

        while !channel.is_empty() {
            self.log_status(&stats, &channel, &workers, repository.as_ref());
            self.clock.sleep(STATUS_INTERVAL).await;
        }
        info!(stage_id = %self.stage_id, "Event channel drained");

        // An idle worker holds the receiver lock, so workers go before the channel closes.
        let workers_spawned = workers.population();
        let events_handled = workers.shutdown().await;
        channel.close().await;

        Ok(Totals {
            stats: stats.snapshot(),
            events_produced,
            events_handled,
            workers_spawned,
            ramp_history,
        })
    }

    async fn wait_with_status(
        &self,
        window: Duration,
        stats: &RunStats,
        channel: &EventChannel,
        workers: &WorkerArena,
        repository: &dyn Repository,
    ) {
        for _ in 0..window.as_secs() {
            self.log_status(stats, channel, workers, repository);
            self.clock.sleep(STATUS_INTERVAL).await;
        }
    }

    fn log_status(
        &self,
        stats: &RunStats,
        channel: &EventChannel,
        workers: &WorkerArena,
        repository: &dyn Repository,
    ) {
        let snapshot = stats.snapshot();
        let pool = repository
            .pool_stats()
            .map(|pool| pool.to_string())
            .unwrap_or_default();

        info!(
            stage_id = %self.stage_id,
            executed = snapshot.queries,
            timeouts = snapshot.timeouts,
            workers = workers.population(),
            queued = channel.occupancy(),
            "{}",
            pool
        );
    }
}

/// Run a stage under a freshly generated id
pub async fn run(
    config: &StageConfig,
    repository: Arc<dyn Repository>,
) -> Result<RunReport, StageError> {
    StageController::new(generate_identifier())
        .run(config, repository)
        .await
}

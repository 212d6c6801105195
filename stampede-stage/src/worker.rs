//! Workers turning events into sampling queries

use rand::Rng;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use stampede_interfaces::{QueryRequest, Repository, ValidIdentifiers};

use crate::channel::EventReceiver;
use crate::stats::RunStats;

/// Number of identifiers per query, drawn uniformly for every event
pub const SAMPLE_SIZE_RANGE: Range<usize> = 100..400;

/// Everything a worker needs besides its own token, shared by the population
pub struct WorkerContext {
    pub repository: Arc<dyn Repository>,
    pub identifiers: ValidIdentifiers,
    pub query_timeout: Duration,
    pub batch_size: u32,
    pub stats: Arc<RunStats>,
}

/// A running worker
pub struct WorkerHandle {
    pub id: usize,
    token: CancellationToken,
    join: JoinHandle<u64>,
}

impl WorkerHandle {
    pub fn spawn(
        id: usize,
        context: Arc<WorkerContext>,
        receiver: EventReceiver,
        token: CancellationToken,
    ) -> Self {
        let join = tokio::spawn(consume(id, context, receiver, token.clone()));
        Self { id, token, join }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the worker to exit; returns the number of events it handled
    pub async fn join(self) -> Result<u64, tokio::task::JoinError> {
        self.join.await
    }
}

/// Identifiers for one query, drawn with replacement
///
/// An empty population yields an empty sample.
pub fn sample_identifiers(identifiers: &[String]) -> Vec<String> {
    if identifiers.is_empty() {
        return Vec::new();
    }

    let mut rng = rand::rng();
    let size = rng.random_range(SAMPLE_SIZE_RANGE);
    (0..size)
        .map(|_| identifiers[rng.random_range(0..identifiers.len())].clone())
        .collect()
}

async fn consume(
    id: usize,
    context: Arc<WorkerContext>,
    receiver: EventReceiver,
    token: CancellationToken,
) -> u64 {
    let mut handled = 0u64;

    loop {
        let event = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            event = receiver.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        let request = QueryRequest::new(
            sample_identifiers(&context.identifiers),
            context.query_timeout,
            context.batch_size,
        );

        match context.repository.query(request).await {
            Ok(outcome) => {
                context.stats.record_success();
                debug!(
                    worker = id,
                    producer = event.producer,
                    records = outcome.records.len(),
                    elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0,
                    "Query completed"
                );
            }
            Err(failure) => {
                context.stats.record_failure();
                error!(
                    worker = id,
                    elapsed_ms = failure.elapsed_ms(),
                    "Query failed: {}",
                    failure.error
                );
            }
        }
        handled += 1;
    }

    debug!(worker = id, handled, "Worker stopped");
    handled
}

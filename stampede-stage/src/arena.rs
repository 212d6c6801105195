//! Growth-only worker population

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::channel::EventReceiver;
use crate::worker::{WorkerContext, WorkerHandle};

/// Append-only arena of workers, indexed by spawn order
///
/// Workers are never removed while a run is active; the population only
/// shrinks when the whole arena is shut down. Every worker token is a child
/// of the arena token, so a shutdown reaches all of them at once.
pub struct WorkerArena {
    context: Arc<WorkerContext>,
    receiver: EventReceiver,
    root: CancellationToken,
    workers: Vec<WorkerHandle>,
}

impl WorkerArena {
    pub fn new(context: Arc<WorkerContext>, receiver: EventReceiver) -> Self {
        Self {
            context,
            receiver,
            root: CancellationToken::new(),
            workers: Vec::new(),
        }
    }

    /// Spawn `count` more workers; returns the new population
    pub fn grow(&mut self, count: usize) -> usize {
        self.workers.reserve(count);
        for _ in 0..count {
            let id = self.workers.len();
            self.workers.push(WorkerHandle::spawn(
                id,
                Arc::clone(&self.context),
                self.receiver.clone(),
                self.root.child_token(),
            ));
        }
        self.workers.len()
    }

    pub fn population(&self) -> usize {
        self.workers.len()
    }

    pub fn get(&self, id: usize) -> Option<&WorkerHandle> {
        self.workers.get(id)
    }

    /// Cancel every worker and wait for all of them
    ///
    /// Returns the number of events handled across the population. A worker
    /// that panicked is logged and counted as having handled nothing.
    pub async fn shutdown(self) -> u64 {
        self.root.cancel();

        let mut handled = 0;
        for worker in self.workers {
            let id = worker.id;
            match worker.join().await {
                Ok(count) => handled += count,
                Err(e) => warn!(worker = id, "Worker task failed: {}", e),
            }
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::EventChannel;
    use crate::stats::RunStats;
    use crate::testing::MockRepo;
    use stampede_interfaces::ValidIdentifiers;
    use std::time::Duration;

    fn arena(channel: &EventChannel) -> WorkerArena {
        let mut repo = MockRepo::new();
        repo.expect_query().never();
        let context = Arc::new(WorkerContext {
            repository: Arc::new(repo),
            identifiers: ValidIdentifiers::default(),
            query_timeout: Duration::from_millis(10),
            batch_size: 0,
            stats: Arc::new(RunStats::new()),
        });
        WorkerArena::new(context, channel.receiver())
    }

    #[tokio::test]
    async fn population_follows_ramp_steps() {
        let channel = EventChannel::new(10);
        let mut arena = arena(&channel);

        let initial = 3;
        let step = 2;
        let mut previous = arena.grow(initial);
        assert_eq!(previous, initial);

        for k in 1..=4 {
            let population = arena.grow(step);
            assert_eq!(population, initial + k * step);
            assert!(population >= previous);
            previous = population;
        }

        for id in 0..arena.population() {
            assert_eq!(arena.get(id).unwrap().id, id);
        }
        assert_eq!(arena.shutdown().await, 0);
    }

    #[tokio::test]
    async fn shutdown_cancels_every_worker_token() {
        let channel = EventChannel::new(10);
        let mut arena = arena(&channel);
        arena.grow(4);

        arena.root.cancel();
        assert!((0..4).all(|id| arena.get(id).unwrap().is_cancelled()));
        assert_eq!(arena.shutdown().await, 0);
    }
}

//! Fixed-rate event producers

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channel::LoadEvent;
use crate::clock::Clock;

/// Delay between stopping the tickers and abandoning in-flight sends
pub const PRODUCER_STOP_GRACE: Duration = Duration::from_millis(100);

/// Smallest interval a producer ticks at
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

struct ProducerHandle {
    id: usize,
    join: JoinHandle<u64>,
}

/// Every producer of a run, stopped together
///
/// Stopping happens in two steps: the ticker token ends the tick loop, then
/// after the grace period the halt token abandons sends still blocked on a
/// full channel.
pub struct ProducerGroup {
    handles: Vec<ProducerHandle>,
    ticker: CancellationToken,
    halt: CancellationToken,
}

impl ProducerGroup {
    /// Start `count` producers, each sending one event per `interval`
    ///
    /// Intervals below one millisecond are raised to it.
    pub fn spawn(count: usize, interval: Duration, sender: mpsc::Sender<LoadEvent>) -> Self {
        let interval = if interval < MIN_TICK_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                "Producer rate exceeds timer resolution, ticking every millisecond"
            );
            MIN_TICK_INTERVAL
        } else {
            interval
        };

        let ticker = CancellationToken::new();
        let halt = CancellationToken::new();
        let handles = (0..count)
            .map(|id| ProducerHandle {
                id,
                join: tokio::spawn(produce(
                    id,
                    interval,
                    sender.clone(),
                    ticker.clone(),
                    halt.clone(),
                )),
            })
            .collect();

        info!(
            producers = count,
            interval_ms = interval.as_millis() as u64,
            "Producers started"
        );
        Self { handles, ticker, halt }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Stop every producer and wait for them; returns the events they sent
    pub async fn stop(self, clock: &dyn Clock, grace: Duration) -> u64 {
        self.ticker.cancel();
        clock.sleep(grace).await;
        self.halt.cancel();

        let mut emitted = 0;
        for handle in self.handles {
            match handle.join.await {
                Ok(sent) => emitted += sent,
                Err(e) => warn!(producer = handle.id, "Producer task failed: {}", e),
            }
        }

        info!(events = emitted, "Producers stopped.");
        emitted
    }
}

async fn produce(
    id: usize,
    interval: Duration,
    sender: mpsc::Sender<LoadEvent>,
    ticker: CancellationToken,
    halt: CancellationToken,
) -> u64 {
    let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut sent = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = ticker.cancelled() => break,
            _ = ticks.tick() => {}
        }

        let event = LoadEvent { producer: id, sequence: sent };
        tokio::select! {
            biased;
            _ = halt.cancelled() => break,
            delivered = sender.send(event) => match delivered {
                Ok(()) => sent += 1,
                Err(_) => break,
            },
        }
    }

    debug!(producer = id, sent, "Producer finished");
    sent
}

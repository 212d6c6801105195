//! Time source for the controller's waits

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Timed waits used by the controller and the producer stop protocol
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
///
/// Under a paused runtime (`start_paused`) this is a virtual clock that
/// advances only when every task is idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

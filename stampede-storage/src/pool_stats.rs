//! Connection-pool event monitor

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use stampede_interfaces::{PoolEvent, PoolStatsSnapshot};

/// Counters fed by pool hooks and checkout wrappers
///
/// Shared behind an `Arc` between the pool callbacks and the repository that
/// reports them. Counters only grow.
#[derive(Debug, Default)]
pub struct PoolStats {
    connections_created: AtomicU64,
    connections_closed: AtomicU64,
    checked_out: AtomicU64,
    checked_in: AtomicU64,
    checkout_timeouts: AtomicU64,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: PoolEvent) {
        let counter = match event {
            PoolEvent::ConnectionCreated => &self.connections_created,
            PoolEvent::ConnectionClosed => &self.connections_closed,
            PoolEvent::CheckedOut => &self.checked_out,
            PoolEvent::CheckedIn => &self.checked_in,
            PoolEvent::CheckoutTimedOut => &self.checkout_timeouts,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Account for connections the pool closed without telling us
    ///
    /// The pool reaps idle connections silently; given the number still open,
    /// everything created beyond it must have been closed.
    pub fn reconcile_open(&self, open: u64) {
        let created = self.connections_created.load(Ordering::Relaxed);
        self.connections_closed
            .fetch_max(created.saturating_sub(open), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            connections_created: self.connections_created.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            checked_out: self.checked_out.load(Ordering::Relaxed),
            checked_in: self.checked_in.load(Ordering::Relaxed),
            checkout_timeouts: self.checkout_timeouts.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot().fmt(f)
    }
}

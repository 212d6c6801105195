//! Connection-pool event types
//!
//! Pool events are consumed for reporting only; nothing in the stage engine
//! makes control decisions from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle event emitted by a backend connection pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolEvent {
    ConnectionCreated,
    ConnectionClosed,
    CheckedOut,
    CheckedIn,
    CheckoutTimedOut,
}

/// Point-in-time view of pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatsSnapshot {
    pub connections_created: u64,
    pub connections_closed: u64,
    pub checked_out: u64,
    pub checked_in: u64,
    pub checkout_timeouts: u64,
}

impl PoolStatsSnapshot {
    /// Connections currently lent out to callers
    pub fn in_use(&self) -> u64 {
        self.checked_out.saturating_sub(self.checked_in)
    }

    /// Connections currently open
    pub fn open(&self) -> u64 {
        self.connections_created.saturating_sub(self.connections_closed)
    }
}

impl fmt::Display for PoolStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "open={} in_use={} created={} closed={} checked_out={} checked_in={} checkout_timeouts={}",
            self.open(),
            self.in_use(),
            self.connections_created,
            self.connections_closed,
            self.checked_out,
            self.checked_in,
            self.checkout_timeouts
        )
    }
}

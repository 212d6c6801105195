//! Repository interface
//!
//! The single seam between the stage engine and a backing store. Seeding uses
//! `count`, `clear` and `insert`; workers only ever call `query`.

use async_trait::async_trait;
use std::time::Duration;

use crate::pool::PoolStatsSnapshot;
use crate::records::{SyntheticRecord, ValidIdentifiers};

/// Common repository error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Query timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Write failed: {message}")]
    Write { message: String },

    #[error("Repository is closed")]
    Closed,

    #[error("Internal repository error: {message}")]
    Internal { message: String },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query { message: message.into() }
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::Write { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Whether this error was caused by the per-query deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A single sampling lookup issued by a worker
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Identifiers to match; duplicates are allowed (sampling is with replacement)
    pub identifiers: Vec<String>,
    /// Deadline for the whole lookup, including fetching every batch
    pub timeout: Duration,
    /// Rows fetched per round trip; 0 lets the backend decide
    pub batch_size: u32,
}

impl QueryRequest {
    pub fn new(identifiers: Vec<String>, timeout: Duration, batch_size: u32) -> Self {
        Self {
            identifiers,
            timeout,
            batch_size,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Records returned by a successful lookup
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub records: Vec<SyntheticRecord>,
    pub elapsed: Duration,
}

/// A failed lookup; the elapsed time is kept for logging
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error} (after {:.3} ms)", .elapsed.as_secs_f64() * 1000.0)]
pub struct QueryFailure {
    #[source]
    pub error: RepositoryError,
    pub elapsed: Duration,
}

impl QueryFailure {
    pub fn new(error: RepositoryError, elapsed: Duration) -> Self {
        Self { error, elapsed }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Backing-store contract consumed by the stage engine
///
/// Implementations must be safe to share between many concurrently running
/// workers; every method takes `&self`.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Look up every record whose identifier is in `request.identifiers`
    async fn query(&self, request: QueryRequest) -> Result<QueryOutcome, QueryFailure>;

    /// Insert all records in a single bulk operation
    async fn insert(&self, records: Vec<SyntheticRecord>) -> Result<(), RepositoryError>;

    /// Number of records currently stored
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Drop every record and rebuild the unique identifier index
    async fn clear(&self) -> Result<(), RepositoryError>;

    /// Publish the identifier population produced by seeding
    ///
    /// Backends that have no use for it may ignore the call.
    fn set_valid_identifiers(&self, _identifiers: ValidIdentifiers) {}

    /// Release connections; called exactly once at the end of a run
    async fn close(&self) -> Result<(), RepositoryError>;

    /// Connection-pool counters, when the backend has a pool
    fn pool_stats(&self) -> Option<PoolStatsSnapshot> {
        None
    }

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

//! # Stampede Interfaces
//!
//! Contracts shared across the Stampede workspace.
//!
//! The stage engine only ever talks to a backing store through the
//! [`Repository`] trait defined here, so storage backends can be swapped
//! without touching the orchestration code.
//!
//! ## Main Interfaces
//!
//! - [`Repository`] - query, insert, count and lifecycle operations
//! - [`SyntheticRecord`] - the document shape written during seeding
//! - [`ValidIdentifiers`] - read-only identifier population sampled by workers
//! - [`PoolStatsSnapshot`] - connection-pool counters surfaced for reporting

pub mod pool;
pub mod records;
pub mod repository;

// Re-export commonly used types
pub use pool::{PoolEvent, PoolStatsSnapshot};
pub use records::{SyntheticRecord, ValidIdentifiers};
pub use repository::{QueryFailure, QueryOutcome, QueryRequest, Repository, RepositoryError};

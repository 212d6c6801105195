//! Storage backends for Stampede
//!
//! Two implementations of [`stampede_interfaces::Repository`]:
//! - [`SqliteRepository`]: a pooled SQLite database, the backend used for real runs
//! - [`InMemoryRepository`]: a process-local store with optional fault injection,
//!   used for dry runs and tests
//!
//! [`connect`] picks one from a [`stampede_config::DataSourceConfig`].

pub mod connector;
pub mod error;
pub mod memory;
pub mod pool_stats;
pub mod sqlite;

pub use connector::{connect, DefaultConnector, RepositoryConnector};
pub use memory::InMemoryRepository;
pub use pool_stats::PoolStats;
pub use sqlite::SqliteRepository;

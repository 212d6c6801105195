//! Backend selection

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use stampede_config::{DataSourceConfig, DataSourceKind};
use stampede_interfaces::{Repository, RepositoryError};

use crate::memory::InMemoryRepository;
use crate::pool_stats::PoolStats;
use crate::sqlite::SqliteRepository;

/// Open the repository described by `config`
///
/// `monitor` receives pool events for backends that have a pool.
pub async fn connect(
    config: &DataSourceConfig,
    monitor: Arc<PoolStats>,
) -> Result<Arc<dyn Repository>, RepositoryError> {
    let repository: Arc<dyn Repository> = match config.kind {
        DataSourceKind::Sqlite => Arc::new(SqliteRepository::connect(config, monitor).await?),
        DataSourceKind::Memory => Arc::new(InMemoryRepository::with_fault_injection(
            config.fault_injection.clone(),
        )),
    };

    info!(
        backend = repository.backend_name(),
        collection = %config.collection_name,
        "Repository connected"
    );
    Ok(repository)
}

/// Opens a repository for every submitted stage
///
/// The job submission surface holds one of these so tests can swap the real
/// backends for a prepared store.
#[async_trait]
pub trait RepositoryConnector: Send + Sync {
    async fn connect(&self, config: &DataSourceConfig) -> Result<Arc<dyn Repository>, RepositoryError>;
}

/// Connects through [`connect`] with a fresh pool monitor per stage
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConnector;

#[async_trait]
impl RepositoryConnector for DefaultConnector {
    async fn connect(&self, config: &DataSourceConfig) -> Result<Arc<dyn Repository>, RepositoryError> {
        connect(config, Arc::new(PoolStats::new())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_kind_needs_no_connection_string() {
        let repo = DefaultConnector
            .connect(&DataSourceConfig::in_memory("stores"))
            .await
            .unwrap();
        assert_eq!(repo.backend_name(), "memory");
        assert!(repo.pool_stats().is_none());
    }

    #[tokio::test]
    async fn unreachable_sqlite_is_a_connection_error() {
        let config = DataSourceConfig {
            conn_string: "sqlite:///definitely/not/a/dir/stampede.db".to_string(),
            collection_name: "stores".to_string(),
            max_pool_size: 1,
            socket_timeout_secs: 1,
            ..DataSourceConfig::default()
        };

        let err = match connect(&config, Arc::new(PoolStats::new())).await {
            Ok(_) => panic!("connecting to a missing directory must fail"),
            Err(err) => err,
        };
        assert!(matches!(err, RepositoryError::Connection { .. }));
    }
}

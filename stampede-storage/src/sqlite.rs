//! SQLite repository built on a `sqlx` connection pool

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use stampede_config::DataSourceConfig;
use stampede_interfaces::{
    PoolEvent, PoolStatsSnapshot, QueryFailure, QueryOutcome, QueryRequest, Repository,
    RepositoryError, SyntheticRecord,
};

use crate::error::{connection_error, query_error, write_error};
use crate::pool_stats::PoolStats;

/// Rows per INSERT statement; three bound parameters each stays under
/// SQLite's historical limit of 999 host parameters.
const INSERT_CHUNK_ROWS: usize = 300;

/// Documents stored in one table of a pooled SQLite database
///
/// The table is named after the collection and carries a unique index on
/// `record_id`. A pool-backed `sqlite::memory:` database is not supported:
/// every pooled connection would see its own empty database.
pub struct SqliteRepository {
    pool: SqlitePool,
    table: String,
    monitor: Arc<PoolStats>,
}

impl SqliteRepository {
    /// Open the pool, check it answers and make sure the table exists
    pub async fn connect(
        config: &DataSourceConfig,
        monitor: Arc<PoolStats>,
    ) -> Result<Self, RepositoryError> {
        info!(
            collection = %config.collection_name,
            max_pool_size = config.max_pool_size,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.conn_string)
            .map_err(connection_error)?
            .create_if_missing(true);

        let created = Arc::clone(&monitor);
        let released = Arc::clone(&monitor);
        let pool = SqlitePoolOptions::new()
            .min_connections(config.min_pool_size)
            .max_connections(config.max_pool_size)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .after_connect(move |_conn, _meta| {
                let monitor = Arc::clone(&created);
                Box::pin(async move {
                    monitor.record(PoolEvent::ConnectionCreated);
                    Ok(())
                })
            })
            .after_release(move |_conn, _meta| {
                let monitor = Arc::clone(&released);
                Box::pin(async move {
                    monitor.record(PoolEvent::CheckedIn);
                    Ok(true)
                })
            })
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(connection_error)?;

        let repository = Self {
            pool,
            table: config.collection_name.clone(),
            monitor,
        };

        let mut conn = repository.acquire().await?;
        create_schema(&mut conn, &repository.table).await?;
        debug!(table = %repository.table, "SQLite schema ready");

        Ok(repository)
    }

    /// Check a connection out of the pool, recording the outcome
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, RepositoryError> {
        match self.pool.acquire().await {
            Ok(conn) => {
                self.monitor.record(PoolEvent::CheckedOut);
                Ok(conn)
            }
            Err(sqlx::Error::PoolTimedOut) => {
                self.monitor.record(PoolEvent::CheckoutTimedOut);
                Err(connection_error(sqlx::Error::PoolTimedOut))
            }
            Err(e) => Err(connection_error(e)),
        }
    }

    async fn fetch(
        &self,
        identifiers: &[String],
        batch_size: u32,
    ) -> Result<Vec<SyntheticRecord>, RepositoryError> {
        // Sampling is with replacement; the lookup only needs each id once.
        let distinct: BTreeSet<&str> = identifiers.iter().map(String::as_str).collect();

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT record_id, name, payload FROM {} WHERE record_id IN (",
            self.table
        ));
        let mut separated = builder.separated(", ");
        for id in distinct {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let mut conn = self.acquire().await?;
        let rows = builder
            .build()
            .fetch(&mut *conn)
            .map(|row| row.and_then(|row| record_from_row(&row)));

        if batch_size == 0 {
            return rows.try_collect().await.map_err(query_error);
        }

        let mut batches = rows.try_chunks(batch_size as usize);
        let mut records = Vec::new();
        while let Some(batch) = batches.try_next().await.map_err(|e| query_error(e.1))? {
            trace!(rows = batch.len(), "Fetched batch");
            records.extend(batch);
        }
        Ok(records)
    }
}

async fn create_schema(conn: &mut SqliteConnection, table: &str) -> Result<(), RepositoryError> {
    let create_table = format!(
        "CREATE TABLE IF NOT EXISTS {} (record_id TEXT NOT NULL, name TEXT NOT NULL, payload TEXT NOT NULL)",
        table
    );
    let create_index = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {table}_record_id_ux ON {table} (record_id)"
    );

    sqlx::query(&create_table)
        .execute(&mut *conn)
        .await
        .map_err(write_error)?;
    sqlx::query(&create_index)
        .execute(&mut *conn)
        .await
        .map_err(write_error)?;
    Ok(())
}

fn record_from_row(row: &SqliteRow) -> Result<SyntheticRecord, sqlx::Error> {
    Ok(SyntheticRecord {
        id: row.try_get("record_id")?,
        name: row.try_get("name")?,
        payload: row.try_get("payload")?,
    })
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn query(&self, request: QueryRequest) -> Result<QueryOutcome, QueryFailure> {
        let started = Instant::now();
        if request.identifiers.is_empty() {
            return Ok(QueryOutcome {
                records: Vec::new(),
                elapsed: started.elapsed(),
            });
        }

        let fetched = tokio::time::timeout(
            request.timeout,
            self.fetch(&request.identifiers, request.batch_size),
        )
        .await;

        let elapsed = started.elapsed();
        match fetched {
            Ok(Ok(records)) => Ok(QueryOutcome { records, elapsed }),
            Ok(Err(error)) => Err(QueryFailure::new(error, elapsed)),
            Err(_) => Err(QueryFailure::new(
                RepositoryError::Timeout {
                    timeout_ms: request.timeout_ms(),
                },
                elapsed,
            )),
        }
    }

    async fn insert(&self, records: Vec<SyntheticRecord>) -> Result<(), RepositoryError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut conn = self.acquire().await?;
        let mut tx = sqlx::Connection::begin(&mut *conn)
            .await
            .map_err(write_error)?;

        for chunk in records.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::<Sqlite>::new(format!(
                "INSERT INTO {} (record_id, name, payload) ",
                self.table
            ));
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.id.clone())
                    .push_bind(record.name.clone())
                    .push_bind(record.payload.clone());
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(write_error)?;
        }

        tx.commit().await.map_err(write_error)?;
        debug!(table = %self.table, inserted = records.len(), "Bulk insert committed");
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let mut conn = self.acquire().await?;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&mut *conn)
            .await
            .map_err(query_error)?;
        Ok(count.max(0) as u64)
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        let mut conn = self.acquire().await?;
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.table))
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        create_schema(&mut conn, &self.table).await?;
        debug!(table = %self.table, "Collection dropped and recreated");
        Ok(())
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        self.pool.close().await;
        self.monitor.reconcile_open(0);
        info!(table = %self.table, pool = %self.monitor, "SQLite pool closed");
        Ok(())
    }

    fn pool_stats(&self) -> Option<PoolStatsSnapshot> {
        self.monitor.reconcile_open(u64::from(self.pool.size()));
        Some(self.monitor.snapshot())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

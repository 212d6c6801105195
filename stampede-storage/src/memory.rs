//! In-memory repository with fault injection

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use stampede_config::FaultInjectionConfig;
use stampede_interfaces::{
    QueryFailure, QueryOutcome, QueryRequest, Repository, RepositoryError, SyntheticRecord,
    ValidIdentifiers,
};

#[derive(Default)]
struct Collection {
    records: Vec<SyntheticRecord>,
    by_id: HashMap<String, usize>,
}

/// Process-local document store
///
/// Enforces the same unique-identifier rule as the SQL backend. Every query
/// can be delayed by a fixed latency and failed with a configured
/// probability; the delay counts against the query deadline, so a latency
/// above the timeout turns every query into a timeout.
#[derive(Default)]
pub struct InMemoryRepository {
    collection: RwLock<Collection>,
    valid: RwLock<HashSet<String>>,
    faults: FaultInjectionConfig,
    unknown_lookups: AtomicU64,
    closed: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault_injection(faults: FaultInjectionConfig) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Identifiers looked up that were not part of the published valid set
    pub fn unknown_lookups(&self) -> u64 {
        self.unknown_lookups.load(Ordering::Relaxed)
    }

    /// Copy of every stored record, in insertion order
    pub fn records(&self) -> Vec<SyntheticRecord> {
        self.collection.read().records.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), RepositoryError> {
        if self.is_closed() {
            Err(RepositoryError::Closed)
        } else {
            Ok(())
        }
    }

    fn roll_failure(&self) -> bool {
        self.faults.failure_rate > 0.0 && rand::rng().random::<f64>() < self.faults.failure_rate
    }

    async fn lookup(&self, identifiers: &[String]) -> Result<Vec<SyntheticRecord>, RepositoryError> {
        if self.faults.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.faults.latency_ms)).await;
        }

        if self.roll_failure() {
            return Err(RepositoryError::query("injected failure"));
        }

        {
            let valid = self.valid.read();
            if !valid.is_empty() {
                let unknown = identifiers.iter().filter(|id| !valid.contains(*id)).count();
                self.unknown_lookups
                    .fetch_add(unknown as u64, Ordering::Relaxed);
            }
        }

        let collection = self.collection.read();
        let distinct: HashSet<&String> = identifiers.iter().collect();
        Ok(distinct
            .into_iter()
            .filter_map(|id| collection.by_id.get(id))
            .map(|&index| collection.records[index].clone())
            .collect())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn query(&self, request: QueryRequest) -> Result<QueryOutcome, QueryFailure> {
        let started = Instant::now();
        if let Err(error) = self.ensure_open() {
            return Err(QueryFailure::new(error, started.elapsed()));
        }

        let looked_up = tokio::time::timeout(request.timeout, self.lookup(&request.identifiers)).await;
        let elapsed = started.elapsed();
        match looked_up {
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
        self.ensure_open()?;
        let mut collection = self.collection.write();

        let mut incoming = HashSet::with_capacity(records.len());
        for record in &records {
            if collection.by_id.contains_key(&record.id) || !incoming.insert(record.id.as_str()) {
                return Err(RepositoryError::write(format!(
                    "duplicate record_id '{}'",
                    record.id
                )));
            }
        }

        let inserted = records.len();
        for record in records {
            let index = collection.records.len();
            collection.by_id.insert(record.id.clone(), index);
            collection.records.push(record);
        }
        debug!(inserted, total = collection.records.len(), "In-memory insert");
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.ensure_open()?;
        Ok(self.collection.read().records.len() as u64)
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        self.ensure_open()?;
        *self.collection.write() = Collection::default();
        Ok(())
    }

    fn set_valid_identifiers(&self, identifiers: ValidIdentifiers) {
        *self.valid.write() = identifiers.iter().cloned().collect();
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(RepositoryError::Closed);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

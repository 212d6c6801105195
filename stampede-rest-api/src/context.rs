//! Context types for dependency injection in REST API handlers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stampede_storage::RepositoryConnector;

/// Context for stage submission and health endpoints
///
/// Cloned into every request; all clones share one in-flight counter.
#[derive(Clone)]
pub struct StagesContext {
    /// Opens the data source of every accepted stage
    pub connector: Arc<dyn RepositoryConnector>,
    active: Arc<AtomicUsize>,
}

impl StagesContext {
    pub fn new(connector: Arc<dyn RepositoryConnector>) -> Self {
        Self {
            connector,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stages accepted but not yet finished
    pub fn active_stages(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Count a stage as running until the returned guard drops
    pub(crate) fn track_stage(&self) -> ActiveStageGuard {
        self.active.fetch_add(1, Ordering::AcqRel);
        ActiveStageGuard {
            active: Arc::clone(&self.active),
        }
    }
}

pub(crate) struct ActiveStageGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ActiveStageGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

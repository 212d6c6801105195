//! Error types for stage runs

use stampede_config::ConfigError;
use stampede_interfaces::RepositoryError;
use thiserror::Error;

/// Reasons a stage run ends without a report
///
/// Query failures during the run are not errors at this level: they are
/// counted as timeouts and the run carries on.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Invalid stage configuration: {}", .violations.join("; "))]
    InvalidConfig { violations: Vec<String> },

    #[error("Could not connect to the data source: {0}")]
    Connection(#[source] RepositoryError),

    #[error("Seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

impl StageError {
    pub fn invalid_config(violations: Vec<String>) -> Self {
        Self::InvalidConfig { violations }
    }
}

impl From<ConfigError> for StageError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { violations, .. } => Self::InvalidConfig { violations },
            other => Self::InvalidConfig {
                violations: vec![other.to_string()],
            },
        }
    }
}

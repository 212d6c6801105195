//! Data source (backing store) configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::validation::{
    require_identifier, require_non_blank, require_positive, require_ratio, Validatable,
};

/// Storage backend a stage runs against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// SQLite database reached through a connection pool
    #[default]
    Sqlite,
    /// Process-local store, for dry runs and tests
    Memory,
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceKind::Sqlite => write!(f, "sqlite"),
            DataSourceKind::Memory => write!(f, "memory"),
        }
    }
}

/// Connection parameters for the store under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// Backend selection
    pub kind: DataSourceKind,

    /// Connection string, e.g. `sqlite://stampede.db`
    pub conn_string: String,

    /// Collection (table) holding the seeded documents
    pub collection_name: String,

    /// Connections kept open while idle
    pub min_pool_size: u32,

    /// Upper bound on pooled connections
    pub max_pool_size: u32,

    /// Seconds before an idle connection is closed; 0 keeps connections forever
    #[serde(alias = "idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Seconds to wait for a pooled connection before giving up
    #[serde(alias = "socket_timeout")]
    pub socket_timeout_secs: u64,

    /// Artificial latency and failures, honoured by the memory backend
    pub fault_injection: FaultInjectionConfig,
}

/// Fault injection for the in-memory backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultInjectionConfig {
    /// Fixed delay added to every query
    pub latency_ms: u64,

    /// Probability that a query fails after its delay
    pub failure_rate: f64,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            kind: DataSourceKind::Sqlite,
            conn_string: String::new(),
            collection_name: String::new(),
            min_pool_size: 0,
            max_pool_size: 0,
            idle_timeout_secs: 0,
            socket_timeout_secs: 0,
            fault_injection: FaultInjectionConfig::default(),
        }
    }
}

impl DataSourceConfig {
    /// A local SQLite file with a modest pool
    pub fn sample() -> Self {
        Self {
            kind: DataSourceKind::Sqlite,
            conn_string: "sqlite://stampede.db".to_string(),
            collection_name: "stores".to_string(),
            min_pool_size: 1,
            max_pool_size: 10,
            idle_timeout_secs: 300,
            socket_timeout_secs: 30,
            fault_injection: FaultInjectionConfig::default(),
        }
    }

    /// An in-memory store, handy for dry runs
    pub fn in_memory(collection_name: impl Into<String>) -> Self {
        Self {
            kind: DataSourceKind::Memory,
            conn_string: String::new(),
            collection_name: collection_name.into(),
            min_pool_size: 0,
            max_pool_size: 1,
            idle_timeout_secs: 0,
            socket_timeout_secs: 1,
            fault_injection: FaultInjectionConfig::default(),
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.socket_timeout_secs)
    }
}

impl Validatable for DataSourceConfig {
    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.kind == DataSourceKind::Sqlite {
            require_non_blank(&self.conn_string, "conn_string", &mut violations);
        }
        require_non_blank(&self.collection_name, "collection_name", &mut violations);
        require_identifier(&self.collection_name, "collection_name", &mut violations);
        require_positive(self.max_pool_size, "max_pool_size", &mut violations);
        require_positive(self.socket_timeout_secs, "socket_timeout_secs", &mut violations);

        if self.min_pool_size > self.max_pool_size && self.max_pool_size > 0 {
            violations.push("min_pool_size cannot be greater than max_pool_size".to_string());
        }

        require_ratio(
            self.fault_injection.failure_rate,
            "fault_injection.failure_rate",
            &mut violations,
        );

        violations
    }

    fn domain_name(&self) -> &'static str {
        "data_source"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sqlite_source_lists_required_fields() {
        assert_eq!(
            DataSourceConfig::default().violations(),
            [
                "conn_string is required",
                "collection_name is required",
                "max_pool_size is required",
                "socket_timeout_secs is required",
            ]
        );
    }

    #[test]
    fn memory_source_needs_no_connection_string() {
        assert!(DataSourceConfig::in_memory("stores").validate().is_ok());
    }

    #[test]
    fn pool_bounds_must_be_ordered() {
        let config = DataSourceConfig {
            min_pool_size: 20,
            ..DataSourceConfig::sample()
        };
        assert_eq!(
            config.violations(),
            ["min_pool_size cannot be greater than max_pool_size"]
        );
    }

    #[test]
    fn collection_name_must_be_an_identifier() {
        let config = DataSourceConfig {
            collection_name: "stores; --".to_string(),
            ..DataSourceConfig::sample()
        };
        assert_eq!(config.violations().len(), 1);
    }

    #[test]
    fn zero_idle_timeout_disables_reaping() {
        let mut config = DataSourceConfig::sample();
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(300)));

        config.idle_timeout_secs = 0;
        assert_eq!(config.idle_timeout(), None);
    }

    #[test]
    fn kind_parses_lowercase() {
        let config: DataSourceConfig =
            serde_json::from_str(r#"{"kind": "memory", "collection_name": "x"}"#).unwrap();
        assert_eq!(config.kind, DataSourceKind::Memory);
        assert_eq!(config.kind.to_string(), "memory");
    }
}

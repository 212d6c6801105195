//! Domain-driven configuration management for Stampede
//!
//! Configuration is split by functional domain (stage profile, data source,
//! logging, server), each with its own defaults and validation. The job
//! submission payload is modelled here too so the REST API and the CLI
//! validate runs identically.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    datasource::{DataSourceConfig, DataSourceKind, FaultInjectionConfig},
    logging::{LogFormat, LogLevel, LoggingConfig},
    server::ServerConfig,
    stage::StageConfig,
    submission::StageSubmission,
    StampedeConfig,
};

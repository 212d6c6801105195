//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading configuration file
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// One or more required fields are missing or out of range
    #[error("Invalid {domain} configuration: {}", .violations.join("; "))]
    Invalid {
        domain: String,
        violations: Vec<String>,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

impl ConfigError {
    /// Every violation carried by this error, if it is a validation failure
    pub fn violations(&self) -> &[String] {
        match self {
            ConfigError::Invalid { violations, .. } => violations,
            _ => &[],
        }
    }
}

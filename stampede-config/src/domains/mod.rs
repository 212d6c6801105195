//! Domain-specific configuration modules

pub mod datasource;
pub mod logging;
pub mod server;
pub mod stage;
pub mod submission;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Service-level configuration combining all process-wide domains
///
/// Stage profiles and data sources are not part of it: they arrive with every
/// submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampedeConfig {
    /// Logging configuration
    pub logging: logging::LoggingConfig,

    /// Job submission server configuration
    pub server: server::ServerConfig,
}

impl StampedeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.logging.validate()?;
        self.server.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = StampedeConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses_back() {
        let sample = StampedeConfig::generate_sample();
        let parsed: StampedeConfig = serde_yaml::from_str(&sample).unwrap();
        assert_eq!(parsed, StampedeConfig::default());
        assert!(parsed.validate_all().is_ok());
    }
}

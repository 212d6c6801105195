//! Server configuration for the job submission API

use serde::{Deserialize, Serialize};

use crate::validation::{require_non_blank, require_positive, Validatable};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,

    /// Server port
    pub port: u16,

    /// Prefix for every API route
    pub api_prefix: String,

    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,

    /// Enable per-request tracing spans
    pub enable_tracing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            api_prefix: "/api/v1".to_string(),
            max_body_bytes: 64 * 1024,
            enable_tracing: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Validatable for ServerConfig {
    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require_non_blank(&self.bind_address, "bind_address", &mut violations);
        require_positive(self.port, "port", &mut violations);
        require_positive(self.max_body_bytes, "max_body_bytes", &mut violations);

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            violations.push(format!("api_prefix must start with '/', got '{}'", self.api_prefix));
        }

        violations
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_address(), "127.0.0.1:8080");
    }

    #[test]
    fn prefix_must_be_absolute() {
        let config = ServerConfig {
            api_prefix: "api".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(config.violations(), ["api_prefix must start with '/', got 'api'"]);
    }
}

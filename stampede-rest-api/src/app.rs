//! Main application configuration and router setup

use axum::{
    routing::{get, post},
    Router,
};
use stampede_config::ServerConfig;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{context::StagesContext, handlers};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enable request tracing
    pub enable_tracing: bool,
    /// API path prefix
    pub api_prefix: String,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        ServerConfig::default().into()
    }
}

impl From<ServerConfig> for AppConfig {
    fn from(config: ServerConfig) -> Self {
        Self {
            enable_tracing: config.enable_tracing,
            api_prefix: config.api_prefix,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// Create the complete REST API application
pub fn create_rest_app(context: StagesContext, config: AppConfig) -> Router {
    let api = Router::new().route("/stages", post(handlers::submit_stage));

    let router = Router::new().route("/health", get(handlers::health_check));
    let router = match config.api_prefix.trim_end_matches('/') {
        "" => router.merge(api),
        prefix => router.nest(prefix, api),
    };

    let router = router
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(context);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

//! Server startup and shutdown

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use stampede_config::{StampedeConfig, Validatable};
use stampede_rest_api::{create_rest_app, AppConfig, StagesContext};
use stampede_storage::{DefaultConnector, RepositoryConnector};

/// The job submission server
pub struct Server {
    config: StampedeConfig,
    context: StagesContext,
}

impl Server {
    /// Create a server over the real storage backends
    pub fn new(config: StampedeConfig) -> Result<Self> {
        Self::with_connector(config, Arc::new(DefaultConnector))
    }

    pub fn with_connector(config: StampedeConfig, connector: Arc<dyn RepositoryConnector>) -> Result<Self> {
        config.server.validate()?;

        Ok(Self {
            config,
            context: StagesContext::new(connector),
        })
    }

    /// Shared state of the submission handlers
    pub fn context(&self) -> &StagesContext {
        &self.context
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let rest_app = create_rest_app(self.context.clone(), AppConfig::from(self.config.server.clone()));
        let index = service_index(&self.config.server.api_prefix);

        Router::new()
            .route("/", get(move || std::future::ready(Json(index.clone()))))
            .merge(rest_app)
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let addr = self.config.server.socket_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// Stages still running when the signal arrives are abandoned with the
    /// runtime; their repositories are not closed.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app();
        let addr = listener.local_addr()?;

        self.log_config_summary();
        info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server terminated unexpectedly")?;

        let abandoned = self.context.active_stages();
        if abandoned > 0 {
            info!(abandoned, "Server shutdown with stages still running");
        } else {
            info!("Server shutdown complete");
        }
        Ok(())
    }

    fn log_config_summary(&self) {
        let server = &self.config.server;
        info!("=== Stampede Server Configuration ===");
        info!("Bind Address: {}", server.socket_address());
        info!("Stage API: {}/stages", server.api_prefix.trim_end_matches('/'));
        info!("Max Body: {} bytes", server.max_body_bytes);
        info!("Tracing: {}", if server.enable_tracing { "Enabled" } else { "Disabled" });
        info!("Log Level: {}", self.config.logging.level);
        info!("=====================================");
    }
}

fn service_index(api_prefix: &str) -> serde_json::Value {
    serde_json::json!({
        "service": "Stampede load stages",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "stages": format!("{}/stages", api_prefix.trim_end_matches('/'))
        }
    })
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

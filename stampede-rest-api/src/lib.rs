//! # Stampede REST API
//!
//! HTTP surface for submitting load stages. A submission carries a data
//! source and a traffic profile; once it validates, the stage starts in the
//! background and the caller gets the generated stage id right away. There is
//! no status polling: progress and the final report go to the logs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stampede_rest_api::{create_rest_app, AppConfig, StagesContext};
//! use stampede_storage::DefaultConnector;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = StagesContext::new(Arc::new(DefaultConnector));
//! let app = create_rest_app(context, AppConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod models;

pub use app::{create_rest_app, AppConfig};
pub use context::StagesContext;
pub use errors::{RestError, RestResult};

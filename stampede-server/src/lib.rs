//! Stampede server
//!
//! Hosts the job submission REST API: loads nothing itself, it is handed a
//! validated [`StampedeConfig`] and a repository connector, binds a listener
//! and serves until a shutdown signal arrives.

pub mod startup;

pub use startup::{shutdown_signal, Server};

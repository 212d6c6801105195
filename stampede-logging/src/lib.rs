//! Logging setup for Stampede
//!
//! Every crate logs through `tracing`; this crate only decides where the
//! events go and how they look. Binaries call [`init_logging_from_config`]
//! once at startup, tests and tools that have no configuration fall back to
//! [`init_simple_tracing`].

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};

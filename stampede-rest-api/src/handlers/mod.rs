//! HTTP handlers grouped by endpoint

pub mod health;
pub mod stages;

pub use health::health_check;
pub use stages::submit_stage;

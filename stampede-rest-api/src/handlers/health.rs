//! Health check endpoint

use axum::{extract::State, response::IntoResponse, Json};
use tracing::debug;

use crate::{context::StagesContext, models::HealthResponse};

/// Liveness plus the number of stages still running
pub async fn health_check(State(ctx): State<StagesContext>) -> impl IntoResponse {
    debug!("Health check requested");

    Json(HealthResponse::healthy(ctx.active_stages()))
}

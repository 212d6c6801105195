//! REST API specific error types and conversions

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stampede_config::ConfigError;
use thiserror::Error;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Submission rejected before any stage started
    #[error("Validation error: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::BadRequest(_) | RestError::Validation { .. } => StatusCode::BAD_REQUEST,
            RestError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RestError::NotFound(_) => "NOT_FOUND",
            RestError::BadRequest(_) => "BAD_REQUEST",
            RestError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            RestError::InternalError(_) => "INTERNAL_ERROR",
            RestError::Validation { .. } => "VALIDATION_ERROR",
        }
    }

    // Common error constructors
    pub fn not_found(resource: &str, id: &str) -> Self {
        RestError::NotFound(format!("{} with ID '{}' not found", resource, id))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        RestError::InternalError(message.into())
    }

    pub fn validation_error(violations: Vec<String>) -> Self {
        RestError::Validation { violations }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
            "status": status.as_u16()
        });
        if let RestError::Validation { violations } = &self {
            error["violations"] = json!(violations);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<ConfigError> for RestError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { violations, .. } => RestError::Validation { violations },
            other => RestError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RestError::PayloadTooLarge(rejection.body_text())
        } else {
            RestError::BadRequest(rejection.body_text())
        }
    }
}

// src/api/error.rs
// Centralized error handling for HTTP API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::error::AppError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: Option<String>,
}

impl ApiError {
    /// Create a new internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: Some("INTERNAL_ERROR".to_string()),
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
            error_code: Some("NOT_FOUND".to_string()),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNAUTHORIZED,
            error_code: Some("UNAUTHORIZED".to_string()),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::FORBIDDEN,
            error_code: Some("FORBIDDEN".to_string()),
        }
    }

    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::CONFLICT,
            error_code: Some("CONFLICT".to_string()),
        }
    }

    /// Create a new unprocessable entity error
    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNPROCESSABLE_ENTITY,
            error_code: Some("VALIDATION_FAILED".to_string()),
        }
    }

    /// Create a new bad gateway error (external model failure)
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_GATEWAY,
            error_code: Some("UPSTREAM_FAILURE".to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Domain errors carry their own taxonomy; map each variant onto its
/// HTTP presentation.
impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(message) => ApiError::not_found(message),
            AppError::Forbidden(message) => ApiError::forbidden(message),
            AppError::Unauthenticated(message) => ApiError::unauthorized(message),
            AppError::Conflict(message) => ApiError::conflict(message),
            AppError::Validation(message) => ApiError::unprocessable_entity(message),
            AppError::Upstream(message) => {
                error!("Upstream model failure: {}", message);
                ApiError::bad_gateway("The language model request failed")
            }
            AppError::Database(db_err) => {
                error!("Database error: {:?}", db_err);
                ApiError::internal("Database error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response_json = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16()
        });

        if let Some(error_code) = self.error_code {
            response_json["error_code"] = json!(error_code);
        }

        (self.status_code, Json(response_json)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// src/error.rs
// Domain error taxonomy shared by every store and service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The resource does not exist (or must be presented as absent,
    /// e.g. a private persona looked up by slug without auth).
    #[error("{0}")]
    NotFound(String),

    /// The resource exists but the caller is not its owner (or, for
    /// submission review, not the assigned instructor).
    #[error("{0}")]
    Forbidden(String),

    /// No caller identity where one is required.
    #[error("{0}")]
    Unauthenticated(String),

    /// State-transition collision, e.g. resubmitting an already
    /// submitted session.
    #[error("{0}")]
    Conflict(String),

    /// Malformed or missing required fields.
    #[error("{0}")]
    Validation(String),

    /// The external language model call failed (auth, quota, network,
    /// content policy). Surfaced so the chat layer can substitute the
    /// in-character fallback.
    #[error("language model request failed: {0}")]
    Upstream(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

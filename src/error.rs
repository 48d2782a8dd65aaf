//! Application error type and its HTTP rendering.
//!
//! Every failure that reaches a handler is an [`AppError`]. Each variant maps to
//! one HTTP status and a stable machine-readable `code`:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input: bad URL, missing field.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Missing, invalid, or unrecoverably expired credential; wrong link password.
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// Link is password-gated and no password was supplied.
    #[error("{message}")]
    PasswordRequired { message: String, details: Value },

    /// Authenticated, but not allowed to touch the resource.
    #[error("{message}")]
    Forbidden { message: String, details: Value },

    /// The safety oracle flagged the URL.
    #[error("{message}")]
    UnsafeUrl { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// An external dependency failed and the active policy blocks on it.
    #[error("{message}")]
    Dependency { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn password_required(message: impl Into<String>, details: Value) -> Self {
        Self::PasswordRequired {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn unsafe_url(message: impl Into<String>, details: Value) -> Self {
        Self::UnsafeUrl {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn dependency(message: impl Into<String>, details: Value) -> Self {
        Self::Dependency {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } | Self::PasswordRequired { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } | Self::UnsafeUrl { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Dependency { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code used in the JSON body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Unauthorized { .. } => "unauthorized",
            Self::PasswordRequired { .. } => "password_required",
            Self::Forbidden { .. } => "forbidden",
            Self::UnsafeUrl { .. } => "unsafe_url",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Dependency { .. } => "dependency_unavailable",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Converts the error into its serializable payload.
    pub fn into_error_info(self) -> ErrorInfo {
        let code = self.code();
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::Unauthorized { message, details }
            | Self::PasswordRequired { message, details }
            | Self::Forbidden { message, details }
            | Self::UnsafeUrl { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details }
            | Self::Dependency { message, details }
            | Self::Internal { message, details } => (message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.into_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        tracing::error!(error = %e, "Session store error");
        AppError::internal("Session error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

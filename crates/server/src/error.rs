//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error reaches the client as JSON:
//!
//! ```json
//! { "kind": "validation", "message": "Validation failed", "errors": [{ "field": "email", "reason": "email is required" }] }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use rollcall_core::{FieldError, ValidationErrors};

use crate::services::registration::RegistrationError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed field validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Registration operation failed.
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error kind: `validation`, `conflict` or `internal`.
    pub kind: &'static str,
    /// Human-readable message, safe to show to end users.
    pub message: String,
    /// Per-field failures; omitted unless `kind` is `validation`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Registration(RegistrationError::EmailTaken(_)) => StatusCode::CONFLICT,
            Self::Registration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Registration(RegistrationError::EmailTaken(_)) => "conflict",
            Self::Registration(_) => "internal",
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let kind = self.kind();

        // Don't expose internal error details to clients
        let (message, errors) = match self {
            Self::Validation(errors) => ("Validation failed".to_string(), errors.into_errors()),
            Self::Registration(err @ RegistrationError::EmailTaken(_)) => (err.to_string(), Vec::new()),
            Self::Registration(_) => ("Internal server error".to_string(), Vec::new()),
        };

        (
            status,
            Json(ErrorBody {
                kind,
                message,
                errors,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

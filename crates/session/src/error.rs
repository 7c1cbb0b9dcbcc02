//! Session client error types.

use thiserror::Error;

use rollcall_core::ValidationErrors;

/// Errors from a token storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from the auth API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL or an endpoint could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request did not complete (connection, timeout, decoding).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        kind: Option<String>,
        message: Option<String>,
    },

    /// The server answered with a success status but an unusable body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The server's message when there is one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    /// HTTP status of a server error response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from an [`AuthSession`](crate::AuthSession) operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The form failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The auth API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Text to show the user: the first validation reason, the server's
    /// message, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(errors) => errors
                .errors()
                .first()
                .map_or_else(|| fallback.to_owned(), |e| e.reason.clone()),
            Self::Api(err) => err.user_message(fallback),
            Self::Storage(_) => fallback.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Server {
            status: 409,
            kind: Some("conflict".into()),
            message: Some("User with email 'a@x.com' already exists".into()),
        };
        assert_eq!(
            err.user_message("Failed"),
            "User with email 'a@x.com' already exists"
        );
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Server {
            status: 500,
            kind: None,
            message: None,
        };
        assert_eq!(err.user_message("Failed"), "Failed");

        let err = ApiError::InvalidResponse("empty token".into());
        assert_eq!(err.user_message("Failed"), "Failed");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_session_error_validation_message() {
        let err = SessionError::from(ValidationErrors::single("password", "too short"));
        assert_eq!(err.user_message("Failed"), "too short");
    }
}

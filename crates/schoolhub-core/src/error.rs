//! Error types for SchoolHub.

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, SchoolHubError>;

/// Text shown to the user for every failure without a dedicated message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum SchoolHubError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure: connection refused, timeout, TLS, etc.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Backend error {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP 409. Carries the server's message verbatim.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid role for this operation: {0}")]
    InvalidRole(String),

    /// Response body did not match the expected schema.
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SchoolHubError {
    /// Map a non-success HTTP status and the server's message to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            409 => Self::Conflict(message),
            404 => Self::NotFound(message),
            401 | 403 => Self::Unauthorized(message),
            _ => Self::Api { status, message },
        }
    }

    /// The message a toast or form shows for this error.
    ///
    /// Only conflicts and local validation failures have their own text;
    /// everything else collapses to [`GENERIC_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Conflict(msg) | Self::Validation(msg) => msg.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

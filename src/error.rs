//! Crate-wide error type.

use std::time::Duration;

use crate::webhook::WebhookError;

/// The main error type for the EZUnsub SDK
#[derive(Debug, thiserror::Error)]
pub enum EzunsubError {
    /// HTTP 401 from the API. The API key is missing, invalid, or revoked.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP 403 from the API.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// HTTP 404 from the API.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 400 from the API.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// HTTP 429 from the API, with the `Retry-After` delay when the server
    /// sent one.
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other HTTP error status.
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Connection, timeout, or protocol failure before an HTTP status was
    /// available.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Webhook verification or parsing failure.
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl EzunsubError {
    /// Map an HTTP error status and response message onto the error taxonomy.
    pub(crate) fn from_status(
        status: u16,
        message: Option<String>,
        retry_after: Option<Duration>,
    ) -> Self {
        let msg = |default: &str| message.clone().unwrap_or_else(|| default.to_string());
        match status {
            400 => Self::Validation(msg("Invalid request")),
            401 => Self::Authentication(msg("Authentication required")),
            403 => Self::Forbidden(msg("Access denied")),
            404 => Self::NotFound(msg("Resource not found")),
            429 => Self::RateLimited { retry_after },
            _ => Self::Api {
                status,
                message: msg("Request failed"),
            },
        }
    }

    /// The HTTP status this error corresponds to, if it came from an API
    /// response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) => Some(400),
            Self::Authentication(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Webhook(_) => None,
        }
    }

    /// True when retrying the same request later could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EzunsubError>;

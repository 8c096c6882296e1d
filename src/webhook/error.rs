//! Webhook-specific error types.
//!
//! Each variant is a distinct rejection cause so callers can branch on the
//! failure kind before deciding how to answer the delivery at the transport
//! boundary (typically an HTTP 400).

use thiserror::Error;

/// Errors raised while verifying or parsing an inbound webhook delivery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The signature does not match the body, or the signing timestamp is
    /// outside the replay window. Both causes are reported identically.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// The timestamp header value is not a decimal integer.
    #[error("malformed webhook timestamp: {value:?}")]
    MalformedTimestamp { value: String },

    /// The body is not valid JSON, or is not a JSON object.
    #[error("invalid JSON payload: {message}")]
    MalformedPayload { message: String },

    /// A required top-level field is absent from the payload.
    #[error("missing '{field}' field in payload")]
    MissingField { field: &'static str },

    /// A required webhook header is absent (or empty).
    #[error("missing {header} header")]
    MissingHeader { header: &'static str },
}

impl WebhookError {
    /// True for rejections caused by a failed authenticity check, as opposed
    /// to a structurally broken request.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::InvalidSignature)
    }
}

//! Webhook verification and payload handling.
//!
//! Provides HMAC-SHA256 signature verification with replay protection, header
//! extraction, and structural validation of incoming EZUnsub webhook
//! deliveries.

mod error;
mod payload;
mod verifier;

pub use error::WebhookError;
pub use payload::{WebhookHeaders, WebhookPayload};
pub use verifier::{
    WebhookVerifier, DEFAULT_MAX_AGE_SECONDS, DELIVERY_ID_HEADER, EVENT_HEADER, SIGNATURE_HEADER,
    SIGNATURE_PREFIX, TIMESTAMP_HEADER,
};

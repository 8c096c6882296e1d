//! EZUnsub - Rust SDK for the EZUnsub contact suppression API
//!
//! Two halves:
//!
//! - **Webhooks**: verify inbound webhook deliveries (HMAC-SHA256 with replay
//!   protection) and parse them into typed payloads.
//! - **REST client**: async access to the contacts, webhooks, links, offers,
//!   and exports resources.
//!
//! # Verifying a webhook
//!
//! ```rust,no_run
//! use ezunsub::WebhookVerifier;
//! use std::collections::HashMap;
//!
//! # fn handle(headers: &HashMap<String, String>, body: &str) -> ezunsub::Result<()> {
//! let verifier = WebhookVerifier::new("your-webhook-secret");
//!
//! let extracted = WebhookVerifier::extract_headers(headers)?;
//! let payload = verifier.verify_and_parse(
//!     &extracted.signature,
//!     &extracted.timestamp,
//!     body,
//!     &extracted.delivery_id,
//! )?;
//!
//! println!("verified {} delivery", payload.event());
//! # Ok(())
//! # }
//! ```
//!
//! # Calling the API
//!
//! ```rust,no_run
//! use ezunsub::EzunsubClient;
//!
//! # async fn run() -> ezunsub::Result<()> {
//! let client = EzunsubClient::new("your-api-key")?;
//! let stats = client.contacts().stats().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod resources;
pub mod webhook;

// Re-exports for public API
pub use client::EzunsubClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
pub use error::{EzunsubError, Result};
pub use webhook::{
    WebhookError, WebhookHeaders, WebhookPayload, WebhookVerifier, DEFAULT_MAX_AGE_SECONDS,
};

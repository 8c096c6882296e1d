//! Parsed webhook payload types.

use serde_json::{Map, Value};

/// A verified, parsed webhook delivery.
///
/// Instances only exist after signature verification has succeeded; there is
/// no public constructor. The payload is immutable once built.
///
/// `event` is deliberately left as an unchecked string rather than a closed
/// enum: the API may introduce new event types without notice, and a payload
/// carrying an unknown event is still authentic. The currently documented
/// event types are:
///
/// - `contact.created`
/// - `contact.updated`
/// - `complaint.created`
/// - `complaint.updated`
/// - `link.created`
/// - `link.clicked`
/// - `export.completed`
/// - `test`
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    event: String,
    timestamp: String,
    data: Map<String, Value>,
    delivery_id: String,
}

impl WebhookPayload {
    pub(super) fn new(
        event: String,
        timestamp: String,
        data: Map<String, Value>,
        delivery_id: String,
    ) -> Self {
        Self {
            event,
            timestamp,
            data,
            delivery_id,
        }
    }

    /// The event type, e.g. `contact.created`.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// ISO-8601 event time from the payload body. This is the time the event
    /// occurred, distinct from the signing timestamp used for replay
    /// protection.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The event-specific data object. Its shape varies by event type and by
    /// the webhook's PII mode.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Delivery ID from the `X-Webhook-Delivery-Id` header. Retries of the
    /// same event carry distinct delivery IDs. Empty if the header was absent.
    #[must_use]
    pub fn delivery_id(&self) -> &str {
        &self.delivery_id
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Contact ID, present on contact events.
    #[must_use]
    pub fn contact_id(&self) -> Option<&str> {
        self.str_field("contactId")
    }

    /// Unsubscribe link code, present on link events.
    #[must_use]
    pub fn link_code(&self) -> Option<&str> {
        self.str_field("linkCode")
    }

    /// Plaintext email, only present when the webhook's PII mode allows it.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// Hashed email.
    #[must_use]
    pub fn email_hash(&self) -> Option<&str> {
        self.str_field("emailHash")
    }

    /// Plaintext phone number, only present when the webhook's PII mode
    /// allows it.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.str_field("phone")
    }

    /// Hashed phone number.
    #[must_use]
    pub fn phone_hash(&self) -> Option<&str> {
        self.str_field("phoneHash")
    }
}

/// Webhook headers extracted from an inbound request.
///
/// `signature` and `timestamp` are always present; `event` and `delivery_id`
/// default to the empty string when the sender omitted them. The event header
/// is informational only; the authoritative event type is the one in the
/// verified body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub signature: String,
    pub timestamp: String,
    pub event: String,
    pub delivery_id: String,
}

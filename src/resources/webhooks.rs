//! Webhook endpoint management.

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::EzunsubClient;
use crate::error::Result;

/// How much personally identifiable information webhook payloads carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PiiMode {
    /// Plaintext email/phone plus hashes.
    Full,
    /// Hashes only. The server default.
    #[default]
    Hashes,
    /// No contact identifiers at all.
    None,
}

impl PiiMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Hashes => "hashes",
            Self::None => "none",
        }
    }
}

/// Partial update for a webhook. Unset fields are left unchanged.
///
/// # Example
///
/// ```rust
/// use ezunsub::resources::WebhookUpdate;
///
/// let update = WebhookUpdate::new()
///     .url("https://new-host.example.com/hook")
///     .is_active(false);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pii_mode: Option<PiiMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

impl WebhookUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn events(mut self, events: Vec<String>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn pii_mode(mut self, pii_mode: PiiMode) -> Self {
        self.pii_mode = Some(pii_mode);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Webhooks API resource.
#[derive(Debug)]
pub struct Webhooks<'a> {
    pub(crate) client: &'a EzunsubClient,
}

impl Webhooks<'_> {
    /// List webhooks. `org_id` filters by organization (admin only).
    pub async fn list(&self, org_id: Option<&str>) -> Result<Value> {
        let query = org_id.map(|id| vec![("orgId", id.to_string())]);
        self.client
            .request(Method::GET, "/api/webhooks", query.as_deref(), None)
            .await
    }

    /// Get a webhook by ID.
    pub async fn get(&self, webhook_id: &str) -> Result<Value> {
        self.client
            .request(Method::GET, &format!("/api/webhooks/{webhook_id}"), None, None)
            .await
    }

    /// Create a webhook. The URL must be HTTPS. The response carries the
    /// signing secret; it is shown only once.
    pub async fn create(
        &self,
        name: &str,
        url: &str,
        events: &[&str],
        pii_mode: PiiMode,
        org_id: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({
            "name": name,
            "url": url,
            "events": events,
            "piiMode": pii_mode.as_str(),
        });
        if let Some(org_id) = org_id {
            body["orgId"] = json!(org_id);
        }
        self.client
            .request(Method::POST, "/api/webhooks", None, Some(&body))
            .await
    }

    /// Apply a partial update to a webhook.
    pub async fn update(&self, webhook_id: &str, update: WebhookUpdate) -> Result<Value> {
        let body = serde_json::to_value(update).map_err(|e| {
            crate::error::EzunsubError::Validation(format!("invalid update body: {e}"))
        })?;
        self.client
            .request(
                Method::PATCH,
                &format!("/api/webhooks/{webhook_id}"),
                None,
                Some(&body),
            )
            .await
    }

    /// Delete a webhook.
    pub async fn delete(&self, webhook_id: &str) -> Result<Value> {
        self.client
            .request(
                Method::DELETE,
                &format!("/api/webhooks/{webhook_id}"),
                None,
                None,
            )
            .await
    }

    /// Rotate the webhook's signing secret. The new secret in the response
    /// is shown only once.
    pub async fn rotate_secret(&self, webhook_id: &str) -> Result<Value> {
        self.client
            .request(
                Method::POST,
                &format!("/api/webhooks/{webhook_id}/rotate-secret"),
                None,
                None,
            )
            .await
    }

    /// Send a test delivery to the webhook's URL.
    pub async fn test(&self, webhook_id: &str) -> Result<Value> {
        self.client
            .request(
                Method::POST,
                &format!("/api/webhooks/{webhook_id}/test"),
                None,
                None,
            )
            .await
    }

    /// Delivery history. `limit` defaults to 50 (server max 100).
    pub async fn deliveries(
        &self,
        webhook_id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let query = vec![
            ("limit", limit.unwrap_or(50).to_string()),
            ("offset", offset.unwrap_or(0).to_string()),
        ];
        self.client
            .request(
                Method::GET,
                &format!("/api/webhooks/{webhook_id}/deliveries"),
                Some(&query),
                None,
            )
            .await
    }

    /// The event types and PII modes the server supports.
    pub async fn events(&self) -> Result<Value> {
        self.client
            .request(Method::GET, "/api/webhooks/events/list", None, None)
            .await
    }
}

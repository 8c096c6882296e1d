//! Unsubscribe links.

use reqwest::Method;
use serde_json::{json, Value};

use crate::client::EzunsubClient;
use crate::error::Result;

/// Links API resource.
#[derive(Debug)]
pub struct Links<'a> {
    pub(crate) client: &'a EzunsubClient,
}

impl Links<'_> {
    /// List unsubscribe links. `offer_id` filters by offer.
    pub async fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        offer_id: Option<&str>,
    ) -> Result<Value> {
        let mut query = vec![
            ("page", page.unwrap_or(1).to_string()),
            ("limit", limit.unwrap_or(50).to_string()),
        ];
        if let Some(offer_id) = offer_id {
            query.push(("offerId", offer_id.to_string()));
        }
        self.client
            .request(Method::GET, "/api/links", Some(&query), None)
            .await
    }

    /// Get a link by its code.
    pub async fn get(&self, code: &str) -> Result<Value> {
        self.client
            .request(Method::GET, &format!("/api/links/{code}"), None, None)
            .await
    }

    /// Create an unsubscribe link for an offer.
    pub async fn create(&self, offer_id: &str, name: Option<&str>) -> Result<Value> {
        let mut body = json!({ "offerId": offer_id });
        if let Some(name) = name {
            body["name"] = json!(name);
        }
        self.client
            .request(Method::POST, "/api/links", None, Some(&body))
            .await
    }
}

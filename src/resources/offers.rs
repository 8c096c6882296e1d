//! Offers.

use reqwest::Method;
use serde_json::Value;

use crate::client::EzunsubClient;
use crate::error::Result;

/// Offers API resource.
#[derive(Debug)]
pub struct Offers<'a> {
    pub(crate) client: &'a EzunsubClient,
}

impl Offers<'_> {
    /// List offers.
    pub async fn list(&self, page: Option<u32>, limit: Option<u32>) -> Result<Value> {
        let query = vec![
            ("page", page.unwrap_or(1).to_string()),
            ("limit", limit.unwrap_or(50).to_string()),
        ];
        self.client
            .request(Method::GET, "/api/offers", Some(&query), None)
            .await
    }

    /// Get an offer by ID.
    pub async fn get(&self, offer_id: &str) -> Result<Value> {
        self.client
            .request(Method::GET, &format!("/api/offers/{offer_id}"), None, None)
            .await
    }
}

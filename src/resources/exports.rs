//! Contact exports.

use reqwest::Method;
use serde_json::{json, Value};

use crate::client::EzunsubClient;
use crate::error::Result;

/// Exports API resource.
#[derive(Debug)]
pub struct Exports<'a> {
    pub(crate) client: &'a EzunsubClient,
}

impl Exports<'_> {
    /// List export jobs.
    pub async fn list(&self, page: Option<u32>, limit: Option<u32>) -> Result<Value> {
        let query = vec![
            ("page", page.unwrap_or(1).to_string()),
            ("limit", limit.unwrap_or(50).to_string()),
        ];
        self.client
            .request(Method::GET, "/api/exports", Some(&query), None)
            .await
    }

    /// Get an export job by ID.
    pub async fn get(&self, export_id: &str) -> Result<Value> {
        self.client
            .request(Method::GET, &format!("/api/exports/{export_id}"), None, None)
            .await
    }

    /// Create an export job. `format` defaults to `csv` when `None`.
    pub async fn create(
        &self,
        name: &str,
        filters: Option<&Value>,
        format: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({
            "name": name,
            "format": format.unwrap_or("csv"),
        });
        if let Some(filters) = filters {
            body["filters"] = filters.clone();
        }
        self.client
            .request(Method::POST, "/api/exports", None, Some(&body))
            .await
    }
}

//! Contact suppression records.

use reqwest::Method;
use serde_json::Value;

use crate::client::EzunsubClient;
use crate::error::Result;

/// Contacts API resource.
#[derive(Debug)]
pub struct Contacts<'a> {
    pub(crate) client: &'a EzunsubClient,
}

impl Contacts<'_> {
    /// List contacts. `page` defaults to 1 and `limit` to 50 (server max
    /// 200); `link_code` filters by unsubscribe link.
    pub async fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        link_code: Option<&str>,
    ) -> Result<Value> {
        let mut query = vec![
            ("page", page.unwrap_or(1).to_string()),
            ("limit", limit.unwrap_or(50).to_string()),
        ];
        if let Some(link_code) = link_code {
            query.push(("linkCode", link_code.to_string()));
        }
        self.client
            .request(Method::GET, "/api/contacts", Some(&query), None)
            .await
    }

    /// Get a contact by ID.
    pub async fn get(&self, contact_id: &str) -> Result<Value> {
        self.client
            .request(Method::GET, &format!("/api/contacts/{contact_id}"), None, None)
            .await
    }

    /// Delete a contact. Admin only.
    pub async fn delete(&self, contact_id: &str) -> Result<Value> {
        self.client
            .request(
                Method::DELETE,
                &format!("/api/contacts/{contact_id}"),
                None,
                None,
            )
            .await
    }

    /// Contact statistics (totals, emails, phones, global).
    pub async fn stats(&self) -> Result<Value> {
        self.client
            .request(Method::GET, "/api/contacts/stats", None, None)
            .await
    }
}

//! HTTP client for the EZUnsub REST API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::error::{EzunsubError, Result};
use crate::resources::{Contacts, Exports, Links, Offers, Webhooks};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the EZUnsub REST API.
///
/// Wraps an async `reqwest` client. Cheap to clone is not a goal here; create
/// one client and pass it by reference, resources borrow it.
///
/// # Example
///
/// ```rust,no_run
/// use ezunsub::EzunsubClient;
///
/// # async fn run() -> ezunsub::Result<()> {
/// let client = EzunsubClient::new("your-api-key")?;
/// let contacts = client.contacts().list(Some(1), Some(50), None).await?;
/// println!("{contacts:#}");
/// # Ok(())
/// # }
/// ```
pub struct EzunsubClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl EzunsubClient {
    /// Create a client against the production API with default settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot be
    /// constructed.
    pub fn with_config(api_key: impl Into<SecretString>, config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(ua) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Contact suppression records.
    #[must_use]
    pub fn contacts(&self) -> Contacts<'_> {
        Contacts { client: self }
    }

    /// Webhook endpoint management.
    #[must_use]
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks { client: self }
    }

    /// Unsubscribe links.
    #[must_use]
    pub fn links(&self) -> Links<'_> {
        Links { client: self }
    }

    /// Offers.
    #[must_use]
    pub fn offers(&self) -> Offers<'_> {
        Offers { client: self }
    }

    /// Contact exports.
    #[must_use]
    pub fn exports(&self) -> Exports<'_> {
        Exports { client: self }
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Send a request and decode the response.
    ///
    /// `path` is joined onto the base URL and must start with `/`.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(API_KEY_HEADER, self.api_key.expose_secret());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(target: "ezunsub::client", %method, path, "sending request");

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Turn an HTTP response into a JSON value or a mapped error.
    ///
    /// A 204 or an empty body decodes to an empty JSON object. Error
    /// responses prefer the body's `"error"` field as the message.
    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
                .or_else(|| (!body.is_empty()).then(|| body.clone()));

            tracing::debug!(
                target: "ezunsub::client",
                status = status.as_u16(),
                "request failed"
            );
            return Err(EzunsubError::from_status(
                status.as_u16(),
                message,
                retry_after,
            ));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(&body).map_err(|e| EzunsubError::Api {
            status: status.as_u16(),
            message: format!("invalid JSON in response body: {e}"),
        })
    }
}

// Debug implementation that doesn't expose the API key.
impl std::fmt::Debug for EzunsubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EzunsubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

//! Client configuration.

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.ezunsub.com";
/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("ezunsub-rust/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for [`EzunsubClient`](crate::EzunsubClient).
///
/// # Example
///
/// ```rust
/// use ezunsub::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .base_url("https://staging.ezunsub.com")
///     .timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing slash is trimmed.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

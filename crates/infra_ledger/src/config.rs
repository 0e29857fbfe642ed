//! HTTP adapter configuration

use std::time::Duration;

/// Connection settings for the ledger-backed REST API
///
/// # Example
///
/// ```rust
/// use infra_ledger::HttpLedgerConfig;
/// use std::time::Duration;
///
/// let config = HttpLedgerConfig::new("http://localhost:8080/api")
///     .timeout(Duration::from_secs(10))
///     .bearer_token("token");
/// assert_eq!(config.base_url, "http://localhost:8080/api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpLedgerConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer_token: Option<String>,
}

impl HttpLedgerConfig {
    /// Creates a configuration with a 30 second timeout and no token
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            bearer_token: None,
        }
    }

    /// Sets the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the per-request timeout in whole seconds
    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    /// Sets the bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Absolute URL for an API path such as `/invoices`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for HttpLedgerConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = HttpLedgerConfig::new("http://ledger.test/api/");
        assert_eq!(config.url("/invoices"), "http://ledger.test/api/invoices");
    }

    #[test]
    fn test_builder() {
        let config = HttpLedgerConfig::default().timeout_secs(5).bearer_token("abc");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.bearer_token.as_deref(), Some("abc"));
    }
}

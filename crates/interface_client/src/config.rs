//! Client configuration

use std::time::Duration;

use serde::Deserialize;

use core_kernel::CoreError;
use infra_ledger::HttpLedgerConfig;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// REST API root
    pub base_url: String,
    /// Dashboard polling interval
    pub poll_interval_secs: u64,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// How long a toast stays visible
    pub toast_duration_ms: u64,
    /// Identical failures inside this window notify once; 0 notifies every time
    pub repeat_failure_window_secs: u64,
    /// Bearer token for the REST API
    pub bearer_token: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            poll_interval_secs: 5,
            request_timeout_secs: 30,
            toast_duration_ms: 3000,
            repeat_failure_window_secs: 0,
            bearer_token: None,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `INVOICE_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("INVOICE"))
            .build()?
            .try_deserialize()
    }

    /// Rejects values the client cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::configuration("base_url must not be empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(CoreError::configuration("poll_interval_secs must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::configuration("request_timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn repeat_failure_window(&self) -> Duration {
        Duration::from_secs(self.repeat_failure_window_secs)
    }

    /// Adapter settings derived from this configuration
    pub fn ledger(&self) -> HttpLedgerConfig {
        let config = HttpLedgerConfig::new(self.base_url.clone()).timeout_secs(self.request_timeout_secs);
        match &self.bearer_token {
            Some(token) => config.bearer_token(token.clone()),
            None => config,
        }
    }
}

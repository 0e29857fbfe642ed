//! Thin reqwest wrapper shared by every adapter
//!
//! Handles URL building, the bearer token, command ids in the query string,
//! status checks and body decoding. Adapters only pick paths and payloads.

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use domain_invoice::CommandEnvelope;

use crate::config::HttpLedgerConfig;
use crate::error::{error_message, LedgerError};

/// HTTP client bound to one API root
#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: Client,
    config: HttpLedgerConfig,
}

impl LedgerClient {
    /// Builds the underlying reqwest client
    pub fn new(config: HttpLedgerConfig) -> Result<Self, LedgerError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| LedgerError::Configuration(format!("invalid bearer token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| LedgerError::Configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &HttpLedgerConfig {
        &self.config
    }

    /// GET and decode a JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        debug!(path = %path, "Fetching from ledger");
        let request = self.http.get(self.config.url(path));
        let body = self.send(path, request).await?;
        decode(path, &body)
    }

    /// POST a command, ignoring any response body
    pub async fn command<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: Option<&B>,
        envelope: &CommandEnvelope,
    ) -> Result<(), LedgerError> {
        self.post(path, payload, envelope).await.map(|_| ())
    }

    /// POST a command and decode its JSON result
    pub async fn command_with_result<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Option<&B>,
        envelope: &CommandEnvelope,
    ) -> Result<T, LedgerError> {
        let body = self.post(path, payload, envelope).await?;
        decode(path, &body)
    }

    /// DELETE a resource as a command
    pub async fn delete(&self, path: &str, envelope: &CommandEnvelope) -> Result<(), LedgerError> {
        info!(path = %path, command_id = %envelope.command_id, "Deleting ledger resource");
        let request = self
            .http
            .delete(self.config.url(path))
            .query(&[("commandId", envelope.command_id.to_string())]);
        self.send(path, request).await.map(|_| ())
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: Option<&B>,
        envelope: &CommandEnvelope,
    ) -> Result<String, LedgerError> {
        info!(
            path = %path,
            command_id = %envelope.command_id,
            contract_id = ?envelope.contract_id.as_ref().map(|id| id.as_str()),
            "Submitting ledger command"
        );

        let mut request = self
            .http
            .post(self.config.url(path))
            .query(&[("commandId", envelope.command_id.to_string())]);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        self.send(path, request).await
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<String, LedgerError> {
        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| LedgerError::from_reqwest(path, elapsed_ms(started), e))?;

        let status = response.status();
        let retry_after_secs = retry_after(&response);
        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::from_reqwest(path, elapsed_ms(started), e))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(
                path = %path,
                status = status.as_u16(),
                error = %message,
                "Ledger request rejected"
            );
            return Err(LedgerError::Status {
                status,
                message,
                path: path.to_string(),
                retry_after_secs,
            });
        }

        debug!(path = %path, status = status.as_u16(), elapsed_ms = elapsed_ms(started), "Ledger request completed");
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, LedgerError> {
    serde_json::from_str(body).map_err(|source| {
        warn!(path = %path, error = %source, "Failed to decode ledger response");
        LedgerError::Decode {
            path: path.to_string(),
            source,
        }
    })
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

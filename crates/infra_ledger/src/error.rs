//! Ledger transport errors
//!
//! Everything that can go wrong between the client and the REST API, and
//! the translation into the shared [`PortError`] taxonomy.

use core_kernel::PortError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the HTTP adapter
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The HTTP client could not be built
    #[error("Invalid ledger configuration: {0}")]
    Configuration(String),

    /// The server answered with a non-success status
    #[error("Ledger returned {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        path: String,
        retry_after_secs: Option<u64>,
    },

    /// The request did not complete in time
    #[error("Request to {path} timed out after {duration_ms}ms")]
    Timeout { path: String, duration_ms: u64 },

    /// The server could not be reached
    #[error("Could not reach ledger at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport failure
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body did not match the expected shape
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LedgerError {
    /// Classifies a reqwest failure
    pub fn from_reqwest(path: &str, duration_ms: u64, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            LedgerError::Timeout {
                path: path.to_string(),
                duration_ms,
            }
        } else if error.is_connect() {
            LedgerError::Connect {
                path: path.to_string(),
                source: error,
            }
        } else {
            LedgerError::Transport {
                path: path.to_string(),
                source: error,
            }
        }
    }

    /// Checks if the server rejected the request with the given status
    pub fn is_status(&self, expected: StatusCode) -> bool {
        matches!(self, LedgerError::Status { status, .. } if *status == expected)
    }
}

/// Extracts a displayable message from an error body
///
/// JSON bodies with a `message`, `error` or `detail` string field yield
/// that field; other non-empty bodies are used verbatim; empty bodies fall
/// back to the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error", "detail"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

impl From<LedgerError> for PortError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Configuration(message) => PortError::internal(message),
            LedgerError::Status {
                status,
                message,
                path,
                retry_after_secs,
            } => match status.as_u16() {
                400 | 422 => PortError::validation(message),
                401 | 403 => PortError::unauthorized(message),
                404 => PortError::NotFound {
                    entity_type: "resource".to_string(),
                    id: path,
                },
                409 => PortError::conflict(message),
                429 => PortError::RateLimited {
                    retry_after_secs: retry_after_secs.unwrap_or(1),
                },
                500..=599 => PortError::ServiceUnavailable {
                    service: format!("ledger ({})", message),
                },
                _ => PortError::internal(format!("{}: {}", status, message)),
            },
            LedgerError::Timeout { path, duration_ms } => PortError::Timeout {
                operation: path,
                duration_ms,
            },
            LedgerError::Connect { path, source } => PortError::Connection {
                message: format!("could not reach {}", path),
                source: Some(Box::new(source)),
            },
            LedgerError::Transport { path, source } => PortError::Connection {
                message: format!("request to {} failed", path),
                source: Some(Box::new(source)),
            },
            LedgerError::Decode { path, source } => {
                PortError::transformation(format!("unexpected response from {}: {}", path, source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, message: &str) -> LedgerError {
        LedgerError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            message: message.to_string(),
            path: "/invoices".to_string(),
            retry_after_secs: None,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(PortError::from(status(400, "bad")), PortError::Validation { .. }));
        assert!(matches!(PortError::from(status(422, "bad")), PortError::Validation { .. }));
        assert!(matches!(PortError::from(status(401, "no")), PortError::Unauthorized { .. }));
        assert!(matches!(PortError::from(status(403, "no")), PortError::Unauthorized { .. }));
        assert!(matches!(PortError::from(status(404, "gone")), PortError::NotFound { .. }));
        assert!(matches!(PortError::from(status(409, "paid")), PortError::Conflict { .. }));
        assert!(matches!(
            PortError::from(status(429, "slow")),
            PortError::RateLimited { retry_after_secs: 1 }
        ));
        assert!(matches!(
            PortError::from(status(503, "down")),
            PortError::ServiceUnavailable { .. }
        ));
        assert!(matches!(PortError::from(status(418, "tea")), PortError::Internal { .. }));
    }

    #[test]
    fn test_validation_keeps_server_message() {
        let error = PortError::from(status(400, "dueDate must be in the future"));
        assert_eq!(error.to_string(), "Validation error: dueDate must be in the future");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"message":"Invoice already paid"}"#),
            "Invoice already paid"
        );
        assert_eq!(error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad id"}"#), "bad id");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"), "upstream down");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }
}

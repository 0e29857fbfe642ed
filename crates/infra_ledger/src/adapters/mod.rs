//! REST Adapter for the Invoice Ports
//!
//! [`HttpLedgerAdapter`] implements every port in `domain_invoice` against
//! the ledger-backed REST API. One adapter instance is shared by all stores
//! behind `Arc<dyn Port>`.
//!
//! # Routes
//!
//! | Port call | Route |
//! |-----------|-------|
//! | `list_invoices` | `GET /invoices` |
//! | `create_invoice` | `POST /invoices` |
//! | invoice commands | `POST /invoices/{contractId}:{command}` |
//! | `withdraw_payment_request` | `POST /invoice-payment-requests/{contractId}:withdraw` |
//! | view listings | `GET /logistics-views`, `GET /bookkeeper-views` |
//! | view commands | `POST /{kind}-views/{contractId}:{acknowledge,revoke}` |
//! | tenant registrations | `GET`/`POST /admin/tenant-registrations`, `DELETE .../{tenantId}` |
//! | session | `GET /user`, `GET /parties`, `GET /feature-flags` |
//!
//! Every `POST` carries the command id as the `commandId` query parameter.
//!
//! # Error Handling
//!
//! Failures are mapped to `PortError` as described in [`crate::error`]:
//! - 400/422 -> `PortError::Validation`
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound`
//! - 409 -> `PortError::Conflict`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Undecodable bodies -> `PortError::Transformation`
//!
//! ```rust,ignore
//! use infra_ledger::{HttpLedgerAdapter, HttpLedgerConfig};
//! use domain_invoice::InvoicePort;
//! use std::sync::Arc;
//!
//! let adapter = Arc::new(HttpLedgerAdapter::new(HttpLedgerConfig::default())?);
//! let port: Arc<dyn InvoicePort> = adapter.clone();
//! ```

mod disclosure;
mod invoice;
mod session;
mod tenant;

use core_kernel::{DomainPort, PortError};
use domain_invoice::CommandEnvelope;

use crate::client::LedgerClient;
use crate::config::HttpLedgerConfig;
use crate::error::LedgerError;

/// HTTP implementation of the invoice, disclosure, tenant and session ports
#[derive(Debug, Clone)]
pub struct HttpLedgerAdapter {
    client: LedgerClient,
}

impl HttpLedgerAdapter {
    /// Creates an adapter for the given API root
    pub fn new(config: HttpLedgerConfig) -> Result<Self, LedgerError> {
        Ok(Self {
            client: LedgerClient::new(config)?,
        })
    }

    /// The underlying client
    pub fn client(&self) -> &LedgerClient {
        &self.client
    }
}

impl DomainPort for HttpLedgerAdapter {}

/// `{collection}/{contractId}:{command}` for a contract-addressed command
fn contract_path(
    collection: &str,
    envelope: &CommandEnvelope,
    command: &str,
) -> Result<String, PortError> {
    let contract_id = envelope.require_contract()?;
    Ok(format!("{}/{}:{}", collection, contract_id, command))
}

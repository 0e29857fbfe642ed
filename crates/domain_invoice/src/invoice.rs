//! Server-confirmed invoices and the payloads of invoice commands
//!
//! An [`Invoice`] is owned by the ledger and mirrored read-only by the
//! client. It is identified by its contract id and replaced wholesale on
//! every fetch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ContractId, CurrencyCode, PartyId};

use crate::line_item::LineItem;
use crate::party::{Address, PartyInfo};

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Issued and awaiting payment
    Issued,
    /// Some payment received
    PartiallyPaid,
    /// Fully paid
    Paid,
    /// Cancelled
    Void,
}

impl InvoiceStatus {
    /// Returns true for every status other than `Paid`
    ///
    /// `Void` counts as unpaid for dashboard aggregates.
    pub fn is_unpaid(&self) -> bool {
        !matches!(self, InvoiceStatus::Paid)
    }

    /// Wire / display name
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Issued => "Issued",
            InvoiceStatus::PartiallyPaid => "PartiallyPaid",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Void => "Void",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tax line in the invoice's tax breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxEntry {
    pub tax_name: String,
    pub tax_rate: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
}

/// A pending payment request attached to an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub contract_id: ContractId,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub prepare_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settle_before: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub expired: bool,
}

/// A confirmed invoice as returned by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub contract_id: ContractId,
    pub seller: PartyId,
    pub buyer: PartyId,
    #[serde(default)]
    pub provider: Option<PartyId>,
    #[serde(default)]
    pub invoice_num: i64,
    #[serde(default)]
    pub invoice_date: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub description: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub seller_info: PartyInfo,
    #[serde(default)]
    pub buyer_info: PartyInfo,
    #[serde(default)]
    pub shipping_address: Address,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub tax_breakdown: Vec<TaxEntry>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub total_discount: Decimal,
    #[serde(default)]
    pub total_tax: Decimal,
    pub grand_total: Decimal,
    #[serde(default)]
    pub amount_paid: Decimal,
    #[serde(default)]
    pub balance_due: Decimal,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub po_number: String,
    #[serde(default)]
    pub sales_order_number: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub delivery_terms: String,
    #[serde(default)]
    pub payment_requests: Vec<PaymentRequest>,
}

impl Invoice {
    /// Returns true unless the invoice is paid
    pub fn is_unpaid(&self) -> bool {
        self.status.is_unpaid()
    }

    /// Unpaid and due strictly before `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_unpaid() && self.due_date < now
    }

    /// The latest payment request, if any
    pub fn latest_payment_request(&self) -> Option<&PaymentRequest> {
        self.payment_requests.iter().max_by_key(|request| request.requested_at)
    }
}

/// Payload for creating an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub buyer: PartyId,
    pub seller: PartyId,
    pub description: String,
    pub currency: CurrencyCode,
    pub due_date: DateTime<Utc>,
    pub payment_terms: String,
    pub po_number: String,
    pub seller_info: PartyInfo,
    pub buyer_info: PartyInfo,
    pub shipping_address: Address,
    pub line_items: Vec<LineItem>,
    pub notes: String,
    pub delivery_terms: String,
}

/// Payload for requesting payment of an invoice
///
/// Durations are ISO-8601 strings, e.g. `PT1H`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPaymentRequest {
    pub prepare_until_duration: String,
    pub settle_before_duration: String,
}

impl Default for RequestPaymentRequest {
    fn default() -> Self {
        Self {
            prepare_until_duration: "PT1H".to_string(),
            settle_before_duration: "PT2H".to_string(),
        }
    }
}

/// Payload for completing an invoice payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentRequest {
    pub payment_request_contract_id: ContractId,
    pub allocation_contract_id: ContractId,
}

/// Result of completing an invoice payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePaymentResult {
    pub invoice_id: ContractId,
    pub receipt_id: ContractId,
}

/// Payload for cancelling an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub meta: CancelMeta,
}

/// Metadata attached to a cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelMeta {
    pub data: CancelData,
}

/// Human-readable cancellation reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelData {
    pub description: String,
}

impl CancelRequest {
    /// Builds a cancellation with a trimmed description
    pub fn new(description: &str) -> Self {
        Self {
            meta: CancelMeta {
                data: CancelData {
                    description: description.trim().to_string(),
                },
            },
        }
    }

    /// The trimmed description
    pub fn description(&self) -> &str {
        &self.meta.data.description
    }
}

/// Payload for sharing an invoice with a carrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareWithCarrierRequest {
    pub carrier: PartyId,
}

/// Payload for sharing an invoice with a bookkeeper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareWithBookkeeperRequest {
    pub bookkeeper: PartyId,
}

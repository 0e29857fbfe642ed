//! Privacy-scoped views of an invoice
//!
//! Logistics and bookkeeper views are separate ledger records, each keyed by
//! its own contract id. They are fetched, acknowledged and revoked
//! independently of the invoice and are never derived from it on the client.
//! A logistics view carries no prices; a bookkeeper view carries no line
//! items or addresses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ContractId, CurrencyCode, PartyId};

use crate::invoice::{InvoiceStatus, TaxEntry};
use crate::party::{Address, Contact};

/// A shipped item as seen by the carrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsItem {
    pub item_name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit_of_measure: String,
    #[serde(default)]
    pub batch_info: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
}

/// The carrier's projection of an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsView {
    pub contract_id: ContractId,
    pub grantor: PartyId,
    pub carrier: PartyId,
    #[serde(default)]
    pub provider: Option<PartyId>,
    #[serde(default)]
    pub invoice_ref: String,
    #[serde(default)]
    pub order_ref: String,
    #[serde(default)]
    pub ship_from_address: Address,
    #[serde(default)]
    pub ship_to_address: Address,
    #[serde(default)]
    pub seller_contact: Contact,
    #[serde(default)]
    pub buyer_contact: Contact,
    #[serde(default)]
    pub items: Vec<LogisticsItem>,
    #[serde(default)]
    pub delivery_terms: String,
    #[serde(default)]
    pub notes: String,
}

impl LogisticsView {
    /// Number of item lines on the shipment
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// The bookkeeper's projection of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookkeeperView {
    pub contract_id: ContractId,
    pub grantor: PartyId,
    pub bookkeeper: PartyId,
    #[serde(default)]
    pub provider: Option<PartyId>,
    #[serde(default)]
    pub invoice_num: i64,
    #[serde(default)]
    pub invoice_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub total_discount: Decimal,
    #[serde(default)]
    pub tax_breakdown: Vec<TaxEntry>,
    pub grand_total: Decimal,
    #[serde(default)]
    pub amount_paid: Decimal,
    #[serde(default)]
    pub balance_due: Decimal,
    #[serde(default)]
    pub item_categories: Vec<String>,
}

impl BookkeeperView {
    /// Sum of the tax breakdown amounts
    pub fn total_tax(&self) -> Decimal {
        self.tax_breakdown.iter().map(|entry| entry.tax_amount).sum()
    }

    /// Returns true unless the underlying invoice is paid
    pub fn is_unpaid(&self) -> bool {
        self.status.is_unpaid()
    }
}

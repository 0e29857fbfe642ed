//! Test Data Builders
//!
//! Provides builder patterns for invoices and disclosed views with
//! sensible defaults, so tests only spell out the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::{ContractId, CurrencyCode, PartyId};
use domain_invoice::{
    invoice_totals, BookkeeperView, Invoice, InvoiceStatus, LineItem, LogisticsItem,
    LogisticsView, TaxEntry,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{IdFixtures, PartyFixtures, TemporalFixtures};

/// Builder for server-confirmed invoices
///
/// Totals come from the line items unless set explicitly; the balance due
/// follows the status (zero when paid).
pub struct InvoiceBuilder {
    contract_id: ContractId,
    seller: PartyId,
    buyer: PartyId,
    invoice_num: i64,
    due_date: DateTime<Utc>,
    status: InvoiceStatus,
    line_items: Vec<LineItem>,
    grand_total: Option<Decimal>,
    balance_due: Option<Decimal>,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            contract_id: IdFixtures::invoice(1),
            seller: PartyFixtures::seller(),
            buyer: PartyFixtures::buyer(),
            invoice_num: 1,
            due_date: TemporalFixtures::due_later(),
            status: InvoiceStatus::Issued,
            line_items: vec![LineItem::new("Industrial Widget A", "WDG-A", 10, dec!(25)).with_tax_rate(dec!(8))],
            grand_total: None,
            balance_due: None,
        }
    }

    /// Sets the contract id and invoice number from a sequence number
    pub fn numbered(mut self, n: u32) -> Self {
        self.contract_id = IdFixtures::invoice(n);
        self.invoice_num = i64::from(n);
        self
    }

    pub fn with_contract_id(mut self, id: ContractId) -> Self {
        self.contract_id = id;
        self
    }

    pub fn with_seller(mut self, seller: PartyId) -> Self {
        self.seller = seller;
        self
    }

    pub fn with_buyer(mut self, buyer: PartyId) -> Self {
        self.buyer = buyer;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn paid(self) -> Self {
        self.with_status(InvoiceStatus::Paid)
    }

    pub fn with_line_items(mut self, items: Vec<LineItem>) -> Self {
        self.line_items = items;
        self
    }

    /// Overrides the grand total
    pub fn with_grand_total(mut self, total: Decimal) -> Self {
        self.grand_total = Some(total);
        self
    }

    /// Overrides the balance due
    pub fn with_balance_due(mut self, balance: Decimal) -> Self {
        self.balance_due = Some(balance);
        self
    }

    pub fn build(self) -> Invoice {
        let totals = invoice_totals(&self.line_items).expect("builder line items fit in a Decimal");
        let grand_total = self.grand_total.unwrap_or(totals.grand_total);
        let balance_due = self.balance_due.unwrap_or(if self.status == InvoiceStatus::Paid {
            Decimal::ZERO
        } else {
            grand_total
        });

        Invoice {
            contract_id: self.contract_id,
            seller: self.seller,
            buyer: self.buyer,
            provider: Some(PartyFixtures::provider()),
            invoice_num: self.invoice_num,
            invoice_date: Some(TemporalFixtures::now()),
            due_date: self.due_date,
            currency: CurrencyCode::default(),
            description: "Test invoice".to_string(),
            status: self.status,
            seller_info: Default::default(),
            buyer_info: Default::default(),
            shipping_address: Default::default(),
            line_items: self.line_items,
            tax_breakdown: Vec::new(),
            subtotal: totals.subtotal,
            total_discount: totals.total_discount,
            total_tax: totals.total_tax,
            grand_total,
            amount_paid: grand_total - balance_due,
            balance_due,
            payment_terms: "Net 30".to_string(),
            po_number: String::new(),
            sales_order_number: String::new(),
            notes: String::new(),
            delivery_terms: String::new(),
            payment_requests: Vec::new(),
        }
    }
}

/// Builder for carrier views
pub struct LogisticsViewBuilder {
    contract_id: ContractId,
    invoice_ref: String,
    items: Vec<LogisticsItem>,
}

impl Default for LogisticsViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticsViewBuilder {
    pub fn new() -> Self {
        Self {
            contract_id: IdFixtures::logistics_view(1),
            invoice_ref: "INV-1".to_string(),
            items: Vec::new(),
        }
    }

    pub fn with_contract_id(mut self, id: ContractId) -> Self {
        self.contract_id = id;
        self
    }

    pub fn with_invoice_ref(mut self, invoice_ref: impl Into<String>) -> Self {
        self.invoice_ref = invoice_ref.into();
        self
    }

    /// Adds a shipped item
    pub fn with_item(mut self, name: &str, quantity: i64) -> Self {
        self.items.push(LogisticsItem {
            item_name: name.to_string(),
            sku: String::new(),
            quantity,
            unit_of_measure: "EA".to_string(),
            batch_info: None,
            delivery_date: None,
        });
        self
    }

    pub fn build(self) -> LogisticsView {
        LogisticsView {
            contract_id: self.contract_id,
            grantor: PartyFixtures::seller(),
            carrier: PartyFixtures::carrier(),
            provider: Some(PartyFixtures::provider()),
            invoice_ref: self.invoice_ref,
            order_ref: String::new(),
            ship_from_address: Default::default(),
            ship_to_address: Default::default(),
            seller_contact: Default::default(),
            buyer_contact: Default::default(),
            items: self.items,
            delivery_terms: String::new(),
            notes: String::new(),
        }
    }
}

/// Builder for bookkeeper views
pub struct BookkeeperViewBuilder {
    contract_id: ContractId,
    status: InvoiceStatus,
    grand_total: Decimal,
    balance_due: Option<Decimal>,
    tax_breakdown: Vec<TaxEntry>,
}

impl Default for BookkeeperViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BookkeeperViewBuilder {
    pub fn new() -> Self {
        Self {
            contract_id: IdFixtures::bookkeeper_view(1),
            status: InvoiceStatus::Issued,
            grand_total: dec!(100),
            balance_due: None,
            tax_breakdown: Vec::new(),
        }
    }

    pub fn with_contract_id(mut self, id: ContractId) -> Self {
        self.contract_id = id;
        self
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_grand_total(mut self, total: Decimal) -> Self {
        self.grand_total = total;
        self
    }

    pub fn with_balance_due(mut self, balance: Decimal) -> Self {
        self.balance_due = Some(balance);
        self
    }

    /// Adds a tax breakdown line
    pub fn with_tax(mut self, name: &str, rate: Decimal, amount: Decimal) -> Self {
        self.tax_breakdown.push(TaxEntry {
            tax_name: name.to_string(),
            tax_rate: rate,
            tax_amount: amount,
        });
        self
    }

    pub fn build(self) -> BookkeeperView {
        let balance_due = self.balance_due.unwrap_or(if self.status == InvoiceStatus::Paid {
            Decimal::ZERO
        } else {
            self.grand_total
        });

        BookkeeperView {
            contract_id: self.contract_id,
            grantor: PartyFixtures::seller(),
            bookkeeper: PartyFixtures::bookkeeper(),
            provider: Some(PartyFixtures::provider()),
            invoice_num: 1,
            invoice_date: Some(TemporalFixtures::now()),
            seller_name: "Acme Supplies Inc.".to_string(),
            buyer_name: "TechCorp Ltd.".to_string(),
            currency: CurrencyCode::default(),
            status: self.status,
            subtotal: self.grand_total,
            total_discount: Decimal::ZERO,
            tax_breakdown: self.tax_breakdown,
            grand_total: self.grand_total,
            amount_paid: self.grand_total - balance_due,
            balance_due,
            item_categories: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_totals_follow_line_items() {
        let invoice = InvoiceBuilder::new().build();
        assert_eq!(invoice.grand_total, dec!(270));
        assert_eq!(invoice.balance_due, dec!(270));
    }

    #[test]
    fn test_paid_invoice_has_no_balance() {
        let invoice = InvoiceBuilder::new().paid().with_grand_total(dec!(100)).build();
        assert_eq!(invoice.balance_due, Decimal::ZERO);
        assert_eq!(invoice.amount_paid, dec!(100));
    }

    #[test]
    fn test_view_builders() {
        let logistics = LogisticsViewBuilder::new().with_item("A", 1).with_item("B", 2).build();
        assert_eq!(logistics.item_count(), 2);

        let books = BookkeeperViewBuilder::new().with_tax("VAT", dec!(8), dec!(8)).build();
        assert_eq!(books.total_tax(), dec!(8));
    }
}

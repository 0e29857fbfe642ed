//! Client-only invoice drafts
//!
//! A draft is created empty when the create-invoice view opens, edited field
//! by field, and consumed by [`InvoiceDraft::to_request`] on submit. Totals
//! are never stored on the draft; [`InvoiceDraft::totals`] recomputes them
//! from the current line items on every call.

use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;
use tracing::debug;

use core_kernel::{CurrencyCode, PartyId};

use crate::calculator::{self, InvoiceTotals};
use crate::error::InvoiceError;
use crate::invoice::CreateInvoiceRequest;
use crate::line_item::LineItem;
use crate::party::{Address, Contact, PartyInfo};

/// Progress indicator for the single-page form
///
/// Purely decorative: every field stays editable regardless of the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DraftStep {
    Details,
    Parties,
    LineItems,
    Review,
}

/// A mutable invoice being composed by the seller
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub description: String,
    pub currency: CurrencyCode,
    pub due_date: Option<DateTime<Utc>>,
    pub payment_terms: String,
    pub po_number: String,
    pub seller: Option<PartyId>,
    pub seller_info: PartyInfo,
    pub buyer: Option<PartyId>,
    pub buyer_info: PartyInfo,
    pub shipping_address: Address,
    line_items: Vec<LineItem>,
    pub notes: String,
    pub delivery_terms: String,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            currency: CurrencyCode::default(),
            due_date: None,
            payment_terms: String::new(),
            po_number: String::new(),
            seller: None,
            seller_info: PartyInfo::default(),
            buyer: None,
            buyer_info: PartyInfo::default(),
            shipping_address: Address::default(),
            line_items: vec![LineItem::default()],
            notes: String::new(),
            delivery_terms: String::new(),
        }
    }
}

impl InvoiceDraft {
    /// Creates an empty draft with a single blank line item
    pub fn new() -> Self {
        Self::default()
    }

    /// Line items in entry order
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Appends a blank line item
    pub fn add_line_item(&mut self) {
        self.line_items.push(LineItem::default());
    }

    /// Removes the line item at `index`
    pub fn remove_line_item(&mut self, index: usize) -> Result<LineItem, InvoiceError> {
        self.check_index(index)?;
        Ok(self.line_items.remove(index))
    }

    /// Edits the line item at `index` in place
    pub fn update_line_item<F>(&mut self, index: usize, edit: F) -> Result<(), InvoiceError>
    where
        F: FnOnce(&mut LineItem),
    {
        self.check_index(index)?;
        edit(&mut self.line_items[index]);
        Ok(())
    }

    /// Replaces all line items
    pub fn set_line_items(&mut self, items: Vec<LineItem>) {
        self.line_items = items;
    }

    /// Live totals for the current line items
    ///
    /// Fails when an entered amount is too large to compute.
    pub fn totals(&self) -> Result<InvoiceTotals, InvoiceError> {
        calculator::invoice_totals(&self.line_items)
    }

    /// Which section of the form the user appears to be working on
    pub fn step(&self) -> DraftStep {
        if self.line_items.iter().any(|item| !item.item_name.is_empty()) {
            DraftStep::Review
        } else if self.buyer.is_some() || !self.buyer_info.party_name.is_empty() {
            DraftStep::LineItems
        } else if self.seller.is_some() || !self.seller_info.party_name.is_empty() {
            DraftStep::Parties
        } else {
            DraftStep::Details
        }
    }

    /// Fills the draft with demo data
    ///
    /// The seller is the session's party; the buyer comes from the party
    /// directory and may be unknown.
    pub fn fill_sample_data(
        &mut self,
        seller: Option<PartyId>,
        buyer: Option<PartyId>,
        now: DateTime<Utc>,
    ) {
        self.description = "Supply Chain Demo Invoice".to_string();
        self.currency = CurrencyCode::default();
        self.due_date = Some(now + Duration::days(30));
        self.payment_terms = "Net 30".to_string();
        self.po_number = "PO-2026-001".to_string();

        self.seller = seller;
        self.seller_info = PartyInfo {
            party_name: "Acme Supplies Inc.".to_string(),
            reg_number: "REG-123456".to_string(),
            tax_number: "TAX-789012".to_string(),
            address: address("100 Main St", "Denver", "CO", "80202", "US"),
            contact: contact("Alice Seller", "alice@acme.com", "+1-555-0100"),
        };

        self.buyer = buyer;
        self.buyer_info = PartyInfo {
            party_name: "TechCorp Ltd.".to_string(),
            reg_number: "REG-654321".to_string(),
            tax_number: "TAX-210987".to_string(),
            address: address("200 Market St", "Boulder", "CO", "80301", "US"),
            contact: contact("Bob Buyer", "bob@techcorp.com", "+1-555-0200"),
        };
        self.shipping_address = address("200 Market St", "Boulder", "CO", "80301", "US");

        self.line_items = vec![
            LineItem::new("Industrial Widget A", "WDG-A", 10, dec!(25)).with_tax_rate(dec!(8)),
            LineItem::new("Premium Component B", "CMP-B", 5, dec!(45))
                .with_discount(dec!(10))
                .with_tax_rate(dec!(8)),
        ];

        self.notes = "Demo invoice for the supply chain workflow".to_string();
        self.delivery_terms = "FOB Destination".to_string();
    }

    /// Converts the draft into a create command payload, consuming it
    pub fn to_request(self) -> Result<CreateInvoiceRequest, InvoiceError> {
        let seller = self
            .seller
            .clone()
            .filter(|party| !party.is_empty())
            .ok_or_else(|| InvoiceError::IncompleteDraft("seller party is required".to_string()))?;
        let buyer = self
            .buyer
            .clone()
            .filter(|party| !party.is_empty())
            .ok_or_else(|| InvoiceError::IncompleteDraft("buyer party is required".to_string()))?;
        let due_date = self
            .due_date
            .ok_or_else(|| InvoiceError::IncompleteDraft("due date is required".to_string()))?;
        self.totals()?;

        debug!(
            seller = %seller,
            buyer = %buyer,
            line_items = self.line_items.len(),
            "Invoice draft submitted"
        );

        Ok(CreateInvoiceRequest {
            buyer,
            seller,
            description: self.description,
            currency: self.currency,
            due_date,
            payment_terms: self.payment_terms,
            po_number: self.po_number,
            seller_info: self.seller_info,
            buyer_info: self.buyer_info,
            shipping_address: self.shipping_address,
            line_items: self
                .line_items
                .into_iter()
                .map(|item| LineItem {
                    line_subtotal: None,
                    ..item
                })
                .collect(),
            notes: self.notes,
            delivery_terms: self.delivery_terms,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), InvoiceError> {
        if index < self.line_items.len() {
            Ok(())
        } else {
            Err(InvoiceError::LineItemOutOfRange {
                index,
                len: self.line_items.len(),
            })
        }
    }
}

fn address(street: &str, city: &str, state: &str, postal_code: &str, country: &str) -> Address {
    Address {
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        postal_code: postal_code.to_string(),
        country: country.to_string(),
    }
}

fn contact(name: &str, email: &str, phone: &str) -> Contact {
    Contact {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_draft_has_one_blank_line() {
        let draft = InvoiceDraft::new();
        assert_eq!(draft.line_items().len(), 1);
        assert_eq!(draft.line_items()[0], LineItem::default());
        assert_eq!(draft.currency.code(), "CC");
        assert_eq!(draft.step(), DraftStep::Details);
        assert_eq!(draft.totals(), Ok(InvoiceTotals::default()));
    }

    #[test]
    fn test_totals_follow_edits() {
        let mut draft = InvoiceDraft::new();
        draft
            .update_line_item(0, |item| {
                item.quantity = 10;
                item.unit_price = dec!(25);
                item.tax_rate = dec!(8);
            })
            .unwrap();
        assert_eq!(draft.totals().unwrap().grand_total, dec!(270));

        draft.add_line_item();
        draft
            .update_line_item(1, |item| {
                item.quantity = 5;
                item.unit_price = dec!(45);
                item.discount = dec!(10);
                item.tax_rate = dec!(8);
            })
            .unwrap();
        assert_eq!(draft.totals().unwrap().grand_total, dec!(502.2));

        draft.remove_line_item(0).unwrap();
        assert_eq!(draft.totals().unwrap().grand_total, dec!(232.2));
    }

    #[test]
    fn test_oversized_entry_is_an_error() {
        let mut draft = InvoiceDraft::new();
        draft.fill_sample_data(
            Some(PartyId::new("seller::1220")),
            Some(PartyId::new("buyer::1220")),
            now(),
        );
        draft
            .update_line_item(1, |item| {
                item.quantity = 1_000_000_000_000_000;
                item.unit_price = dec!(1000000000000000);
            })
            .unwrap();

        assert_eq!(draft.totals(), Err(InvoiceError::LineAmountOverflow { line: 1 }));
        assert_eq!(
            draft.to_request().unwrap_err(),
            InvoiceError::LineAmountOverflow { line: 1 }
        );
    }

    #[test]
    fn test_out_of_range_edit_is_rejected() {
        let mut draft = InvoiceDraft::new();
        let err = draft.remove_line_item(3).unwrap_err();
        assert_eq!(err, InvoiceError::LineItemOutOfRange { index: 3, len: 1 });
    }

    #[test]
    fn test_step_progression() {
        let mut draft = InvoiceDraft::new();
        draft.seller = Some(PartyId::new("seller::1220"));
        assert_eq!(draft.step(), DraftStep::Parties);
        draft.buyer_info.party_name = "TechCorp Ltd.".to_string();
        assert_eq!(draft.step(), DraftStep::LineItems);
        draft.update_line_item(0, |item| item.item_name = "Widget".to_string()).unwrap();
        assert_eq!(draft.step(), DraftStep::Review);
    }

    #[test]
    fn test_sample_data() {
        let mut draft = InvoiceDraft::new();
        draft.fill_sample_data(
            Some(PartyId::new("seller::1220")),
            Some(PartyId::new("buyer::1220")),
            now(),
        );
        assert_eq!(draft.due_date, Some(now() + Duration::days(30)));
        assert_eq!(draft.payment_terms, "Net 30");
        assert_eq!(draft.po_number, "PO-2026-001");
        assert_eq!(draft.delivery_terms, "FOB Destination");
        assert_eq!(draft.totals().unwrap().grand_total, dec!(502.2));

        let request = draft.to_request().unwrap();
        assert_eq!(request.line_items.len(), 2);
        assert_eq!(request.buyer.as_str(), "buyer::1220");
    }

    #[test]
    fn test_request_requires_parties_and_due_date() {
        let mut draft = InvoiceDraft::new();
        draft.seller = Some(PartyId::new("seller::1220"));
        assert!(matches!(
            draft.clone().to_request(),
            Err(InvoiceError::IncompleteDraft(_))
        ));

        draft.buyer = Some(PartyId::new("buyer::1220"));
        assert!(draft.clone().to_request().is_err());

        draft.due_date = Some(now());
        assert!(draft.to_request().is_ok());
    }
}

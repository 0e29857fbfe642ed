//! Role dashboard projections
//!
//! Each summary is a pure function of one cached slice (plus the wall clock
//! for the buyer). Summaries are recomputed on every cache change and never
//! stored. Amounts are summed unrounded and only formatted by
//! [`SummaryCard`].
//!
//! Status rules shared by every role:
//!
//! - outstanding sums `balance_due` of everything that is not `Paid`
//! - revenue / paid sums `grand_total` of `Paid` only
//! - due soon counts non-`Paid` with `now <= due_date <= now + 7 days`
//! - overdue marks non-`Paid` with `due_date < now`

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{format_currency, PartyId};

use crate::disclosure::{BookkeeperView, LogisticsView};
use crate::invoice::{Invoice, InvoiceStatus};

/// Window for the buyer's "due soon" count
pub const DUE_SOON_DAYS: i64 = 7;

/// Cancellation reason used when the seller leaves the prompt empty
pub const DEFAULT_CANCEL_REASON: &str = "Cancelled by seller";

/// A titled value ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
}

impl SummaryCard {
    fn count(title: &'static str, value: usize) -> Self {
        Self { title, value: value.to_string() }
    }

    fn amount(title: &'static str, value: Decimal) -> Self {
        Self { title, value: format_currency(value) }
    }
}

fn outstanding(rows: impl Iterator<Item = (InvoiceStatus, Decimal)>) -> Decimal {
    rows.filter(|(status, _)| status.is_unpaid())
        .map(|(_, balance_due)| balance_due)
        .sum()
}

fn paid_total(rows: impl Iterator<Item = (InvoiceStatus, Decimal)>) -> Decimal {
    rows.filter(|(status, _)| *status == InvoiceStatus::Paid)
        .map(|(_, grand_total)| grand_total)
        .sum()
}

// ------------------------------------------------------------------------
// Provider
// ------------------------------------------------------------------------

/// App provider overview across all invoices
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProviderSummary {
    pub total_invoices: usize,
    /// Distinct sellers and buyers
    pub active_parties: usize,
    pub pending_payments: usize,
}

impl ProviderSummary {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        let parties: HashSet<&PartyId> = invoices
            .iter()
            .flat_map(|invoice| [&invoice.seller, &invoice.buyer])
            .collect();

        Self {
            total_invoices: invoices.len(),
            active_parties: parties.len(),
            pending_payments: invoices.iter().filter(|invoice| invoice.is_unpaid()).count(),
        }
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard::count("Total Invoices", self.total_invoices),
            SummaryCard::count("Active Parties", self.active_parties),
            SummaryCard::count("Pending Payments", self.pending_payments),
        ]
    }
}

// ------------------------------------------------------------------------
// Seller
// ------------------------------------------------------------------------

/// Seller overview of their own invoices
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SellerSummary {
    pub total_invoices: usize,
    pub issued_count: usize,
    pub paid_count: usize,
    pub revenue: Decimal,
    pub outstanding: Decimal,
}

impl SellerSummary {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        let by_status = |status: InvoiceStatus| {
            invoices.iter().filter(|invoice| invoice.status == status).count()
        };

        Self {
            total_invoices: invoices.len(),
            issued_count: by_status(InvoiceStatus::Issued),
            paid_count: by_status(InvoiceStatus::Paid),
            revenue: paid_total(invoices.iter().map(|i| (i.status, i.grand_total))),
            outstanding: outstanding(invoices.iter().map(|i| (i.status, i.balance_due))),
        }
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard::count("Total Invoices", self.total_invoices),
            SummaryCard::count("Issued", self.issued_count),
            SummaryCard::count("Paid", self.paid_count),
            SummaryCard::amount("Revenue", self.revenue),
            SummaryCard::amount("Outstanding", self.outstanding),
        ]
    }
}

/// A row action offered to the seller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SellerAction {
    MarkPaid,
    ShareWithCarrier,
    ShareWithBookkeeper,
    RequestPayment,
    Cancel,
}

impl SellerAction {
    pub fn label(&self) -> &'static str {
        match self {
            SellerAction::MarkPaid => "Mark as Paid",
            SellerAction::ShareWithCarrier => "Share w/ Carrier",
            SellerAction::ShareWithBookkeeper => "Share w/ Bookkeeper",
            SellerAction::RequestPayment => "Request Payment",
            SellerAction::Cancel => "Cancel",
        }
    }

    /// Destructive actions are styled as danger
    pub fn is_danger(&self) -> bool {
        matches!(self, SellerAction::Cancel)
    }
}

/// Actions available on a seller's invoice row; none once paid
pub fn seller_actions(invoice: &Invoice) -> Vec<SellerAction> {
    if invoice.status == InvoiceStatus::Paid {
        return Vec::new();
    }
    vec![
        SellerAction::MarkPaid,
        SellerAction::ShareWithCarrier,
        SellerAction::ShareWithBookkeeper,
        SellerAction::RequestPayment,
        SellerAction::Cancel,
    ]
}

/// Default disclosure targets offered to the seller
///
/// Carrier and bookkeeper are assumed to live on the seller's participant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShareTargets {
    pub carrier: Option<PartyId>,
    pub bookkeeper: Option<PartyId>,
}

impl ShareTargets {
    pub fn for_seller(seller: &PartyId) -> Self {
        Self {
            carrier: seller.sibling("logistics"),
            bookkeeper: seller.sibling("finance"),
        }
    }
}

/// Resolves the reason typed at the cancel prompt
///
/// `None` means the prompt was dismissed and nothing should be sent.
pub fn cancel_reason(input: Option<&str>) -> Option<String> {
    input.map(|reason| {
        let reason = reason.trim();
        if reason.is_empty() {
            DEFAULT_CANCEL_REASON.to_string()
        } else {
            reason.to_string()
        }
    })
}

// ------------------------------------------------------------------------
// Buyer
// ------------------------------------------------------------------------

/// Buyer overview of invoices addressed to them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BuyerSummary {
    pub due_soon: usize,
    pub outstanding: Decimal,
    pub paid_this_month: Decimal,
}

impl BuyerSummary {
    pub fn from_invoices(invoices: &[Invoice], now: DateTime<Utc>) -> Self {
        let horizon = now + Duration::days(DUE_SOON_DAYS);
        let month_start = start_of_month(now);

        Self {
            due_soon: invoices
                .iter()
                .filter(|invoice| {
                    invoice.is_unpaid() && invoice.due_date >= now && invoice.due_date <= horizon
                })
                .count(),
            outstanding: outstanding(invoices.iter().map(|i| (i.status, i.balance_due))),
            paid_this_month: paid_total(
                invoices
                    .iter()
                    .filter(|invoice| invoice.due_date >= month_start)
                    .map(|i| (i.status, i.grand_total)),
            ),
        }
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard::count("Due Soon", self.due_soon),
            SummaryCard::amount("Outstanding", self.outstanding),
            SummaryCard::amount("Paid This Month", self.paid_this_month),
        ]
    }
}

/// A buyer table row
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerRow<'a> {
    pub invoice: &'a Invoice,
    pub overdue: bool,
    /// Wallet link for paying, only on unpaid rows
    pub pay_link: Option<&'a str>,
}

/// Buyer rows sorted by due date ascending
pub fn buyer_rows<'a>(
    invoices: &'a [Invoice],
    now: DateTime<Utc>,
    wallet_url: Option<&'a str>,
) -> Vec<BuyerRow<'a>> {
    let mut rows: Vec<BuyerRow<'a>> = invoices
        .iter()
        .map(|invoice| BuyerRow {
            invoice,
            overdue: invoice.is_overdue(now),
            pay_link: wallet_url.filter(|_| invoice.is_unpaid()),
        })
        .collect();
    rows.sort_by_key(|row| row.invoice.due_date);
    rows
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

// ------------------------------------------------------------------------
// Carrier
// ------------------------------------------------------------------------

/// Carrier overview of disclosed shipments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CarrierSummary {
    pub active_shipments: usize,
    pub total_items: usize,
}

impl CarrierSummary {
    pub fn from_views(views: &[LogisticsView]) -> Self {
        Self {
            active_shipments: views.len(),
            total_items: views.iter().map(LogisticsView::item_count).sum(),
        }
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard::count("Active Shipments", self.active_shipments),
            SummaryCard::count("Total Items", self.total_items),
        ]
    }
}

// ------------------------------------------------------------------------
// Bookkeeper
// ------------------------------------------------------------------------

/// Bookkeeper overview of disclosed financials
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BookkeeperSummary {
    pub total_invoiced: Decimal,
    pub tax_due: Decimal,
    pub outstanding: Decimal,
    pub paid: Decimal,
}

impl BookkeeperSummary {
    pub fn from_views(views: &[BookkeeperView]) -> Self {
        Self {
            total_invoiced: views.iter().map(|view| view.grand_total).sum(),
            tax_due: views.iter().map(BookkeeperView::total_tax).sum(),
            outstanding: outstanding(views.iter().map(|v| (v.status, v.balance_due))),
            paid: paid_total(views.iter().map(|v| (v.status, v.grand_total))),
        }
    }

    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard::amount("Total Invoiced", self.total_invoiced),
            SummaryCard::amount("Tax Due", self.tax_due),
            SummaryCard::amount("Outstanding", self.outstanding),
            SummaryCard::amount("Paid", self.paid),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn invoice(status: &str, due: &str, grand_total: f64, balance_due: f64) -> Invoice {
        serde_json::from_value(json!({
            "contractId": format!("00{}{}", status, due),
            "seller": "seller::1220",
            "buyer": "buyer::1220",
            "dueDate": due,
            "status": status,
            "grandTotal": grand_total,
            "balanceDue": balance_due
        }))
        .unwrap()
    }

    fn jan_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_outstanding_and_revenue() {
        let invoices = vec![
            invoice("Paid", "2024-01-05T00:00:00Z", 100.0, 0.0),
            invoice("Issued", "2024-01-05T00:00:00Z", 50.0, 50.0),
        ];
        let summary = SellerSummary::from_invoices(&invoices);
        assert_eq!(summary.outstanding, dec!(50));
        assert_eq!(summary.revenue, dec!(100));
        assert_eq!(summary.issued_count, 1);
        assert_eq!(summary.paid_count, 1);
    }

    #[test]
    fn test_due_soon_window() {
        let invoices = vec![
            invoice("Issued", "2024-01-05T00:00:00Z", 10.0, 10.0),
            invoice("Issued", "2024-01-10T00:00:00Z", 10.0, 10.0),
            invoice("Paid", "2024-01-03T00:00:00Z", 10.0, 0.0),
        ];
        let summary = BuyerSummary::from_invoices(&invoices, jan_first());
        assert_eq!(summary.due_soon, 1);
    }

    #[test]
    fn test_due_soon_bounds_are_inclusive() {
        let invoices = vec![
            invoice("Issued", "2024-01-01T00:00:00Z", 10.0, 10.0),
            invoice("Issued", "2024-01-08T00:00:00Z", 10.0, 10.0),
        ];
        assert_eq!(BuyerSummary::from_invoices(&invoices, jan_first()).due_soon, 2);
    }

    #[test]
    fn test_paid_this_month() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let invoices = vec![
            invoice("Paid", "2024-03-01T00:00:00Z", 120.0, 0.0),
            invoice("Paid", "2024-02-28T00:00:00Z", 80.0, 0.0),
            invoice("Issued", "2024-03-20T00:00:00Z", 40.0, 40.0),
        ];
        let summary = BuyerSummary::from_invoices(&invoices, now);
        assert_eq!(summary.paid_this_month, dec!(120));
        assert_eq!(summary.outstanding, dec!(40));
    }

    #[test]
    fn test_buyer_rows_sorted_and_flagged() {
        let invoices = vec![
            invoice("Issued", "2024-01-10T00:00:00Z", 10.0, 10.0),
            invoice("Issued", "2023-12-20T00:00:00Z", 10.0, 10.0),
            invoice("Paid", "2023-12-01T00:00:00Z", 10.0, 0.0),
        ];
        let rows = buyer_rows(&invoices, jan_first(), Some("https://wallet.test"));

        assert_eq!(rows[0].invoice.status, InvoiceStatus::Paid);
        assert!(!rows[0].overdue);
        assert!(rows[0].pay_link.is_none());
        assert!(rows[1].overdue);
        assert_eq!(rows[1].pay_link, Some("https://wallet.test"));
        assert!(!rows[2].overdue);
    }

    #[test]
    fn test_no_pay_link_without_wallet() {
        let invoices = vec![invoice("Issued", "2024-01-10T00:00:00Z", 10.0, 10.0)];
        let rows = buyer_rows(&invoices, jan_first(), None);
        assert!(rows[0].pay_link.is_none());
    }

    #[test]
    fn test_provider_counts_distinct_parties() {
        let mut other = invoice("Paid", "2024-01-05T00:00:00Z", 1.0, 0.0);
        other.buyer = PartyId::new("buyer2::1220");
        let invoices = vec![invoice("Issued", "2024-01-05T00:00:00Z", 1.0, 1.0), other];
        let summary = ProviderSummary::from_invoices(&invoices);
        assert_eq!(summary.total_invoices, 2);
        assert_eq!(summary.active_parties, 3);
        assert_eq!(summary.pending_payments, 1);
    }

    #[test]
    fn test_seller_actions_hidden_once_paid() {
        let paid = invoice("Paid", "2024-01-05T00:00:00Z", 1.0, 0.0);
        let void = invoice("Void", "2024-01-05T00:00:00Z", 1.0, 1.0);
        assert!(seller_actions(&paid).is_empty());
        let actions = seller_actions(&void);
        assert_eq!(actions.len(), 5);
        assert!(actions.last().unwrap().is_danger());
    }

    #[test]
    fn test_share_targets_from_fingerprint() {
        let targets = ShareTargets::for_seller(&PartyId::new("seller::1220abcd"));
        assert_eq!(targets.carrier.unwrap().as_str(), "logistics::1220abcd");
        assert_eq!(targets.bookkeeper.unwrap().as_str(), "finance::1220abcd");
        assert_eq!(ShareTargets::for_seller(&PartyId::new("seller")), ShareTargets::default());
    }

    #[test]
    fn test_cancel_reason() {
        assert_eq!(cancel_reason(None), None);
        assert_eq!(cancel_reason(Some("  ")).as_deref(), Some(DEFAULT_CANCEL_REASON));
        assert_eq!(cancel_reason(Some(" duplicate ")).as_deref(), Some("duplicate"));
    }

    #[test]
    fn test_cards_format_currency() {
        let summary = SellerSummary {
            revenue: dec!(1234.5),
            ..Default::default()
        };
        let cards = summary.cards();
        assert_eq!(cards[3].title, "Revenue");
        assert_eq!(cards[3].value, "$1,234.50");
    }
}

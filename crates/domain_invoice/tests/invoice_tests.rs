//! Integration tests for domain_invoice

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::{format_currency, PartyId};

use domain_invoice::{
    buyer_rows, invoice_totals, AuthMode, BookkeeperSummary, BookkeeperView, BuyerSummary,
    CarrierSummary, DraftStep, Invoice, InvoiceDraft, InvoiceError, InvoiceStatus, LineItem,
    LogisticsView, ProviderSummary, Role, SellerSummary, ShareTargets, TenantRegistrationForm,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn invoice(id: &str, status: &str, due: DateTime<Utc>, grand_total: Decimal, balance_due: Decimal) -> Invoice {
    serde_json::from_value(json!({
        "contractId": id,
        "seller": "seller::1220",
        "buyer": "buyer::1220",
        "invoiceNum": 1,
        "dueDate": due.to_rfc3339(),
        "status": status,
        "grandTotal": grand_total,
        "balanceDue": balance_due,
    }))
    .unwrap()
}

// ============================================================================
// Calculator
// ============================================================================

mod calculator_tests {
    use super::*;

    #[test]
    fn test_sample_line_item() {
        let item = LineItem::new("Widget", "W", 10, dec!(25)).with_tax_rate(dec!(8));
        assert_eq!(item.line_subtotal(), Some(dec!(250)));
        assert_eq!(item.line_tax(), Some(dec!(20)));
        assert_eq!(item.line_total(), Some(dec!(270)));
    }

    #[test]
    fn test_discount_exceeding_subtotal_is_not_clamped() {
        let item = LineItem::new("Widget", "W", 1, dec!(5)).with_discount(dec!(8));
        let totals = invoice_totals(std::iter::once(&item)).unwrap();
        assert_eq!(totals.grand_total, dec!(-3));
        assert_eq!(format_currency(totals.grand_total), "$-3.00");
    }

    #[test]
    fn test_display_rounding_happens_last() {
        let items: Vec<LineItem> = (0..3)
            .map(|_| LineItem::new("Bolt", "B", 1, dec!(0.333)).with_tax_rate(dec!(10)))
            .collect();
        let totals = invoice_totals(&items).unwrap();
        assert_eq!(totals.grand_total, dec!(1.0989));
        assert_eq!(format_currency(totals.grand_total), "$1.10");
    }
}

mod calculator_properties {
    use super::*;
    use test_utils::{invoice_strategy, line_item_strategy, line_items_strategy, TemporalFixtures};

    proptest! {
        #[test]
        fn grand_total_identity_holds(items in line_items_strategy(20)) {
            let totals = invoice_totals(&items).unwrap();
            prop_assert_eq!(totals.grand_total, totals.subtotal - totals.total_discount + totals.total_tax);
        }

        #[test]
        fn total_tax_is_sum_of_line_taxes(items in line_items_strategy(20)) {
            let totals = invoice_totals(&items).unwrap();
            let expected: Decimal = items
                .iter()
                .map(|i| (Decimal::from(i.quantity) * i.unit_price - i.discount) * i.tax_rate / Decimal::ONE_HUNDRED)
                .sum();
            prop_assert_eq!(totals.total_tax, expected);
        }

        #[test]
        fn line_totals_add_up(item in line_item_strategy()) {
            let totals = invoice_totals(std::iter::once(&item)).unwrap();
            prop_assert_eq!(Some(totals.grand_total), item.line_total());
        }

        #[test]
        fn recomputation_is_deterministic(items in line_items_strategy(10)) {
            prop_assert_eq!(invoice_totals(&items), invoice_totals(&items));
        }

        #[test]
        fn outstanding_is_the_sum_of_open_balances(
            invoices in proptest::collection::vec(invoice_strategy(), 0..12)
        ) {
            let seller = SellerSummary::from_invoices(&invoices);
            let expected: Decimal = invoices.iter().map(|i| i.balance_due).sum();
            prop_assert_eq!(seller.outstanding, expected);

            let provider = ProviderSummary::from_invoices(&invoices);
            prop_assert_eq!(provider.pending_payments + seller.paid_count, invoices.len());

            let buyer = BuyerSummary::from_invoices(&invoices, TemporalFixtures::now());
            prop_assert!(buyer.due_soon <= provider.pending_payments);
        }
    }
}

// ============================================================================
// Draft
// ============================================================================

mod draft_tests {
    use super::*;

    #[test]
    fn test_draft_to_request_carries_line_items_in_order() {
        let mut draft = InvoiceDraft::new();
        draft.fill_sample_data(Some(PartyId::new("seller::1220")), Some(PartyId::new("buyer::1220")), now());
        assert_eq!(draft.step(), DraftStep::Review);

        let request = draft.to_request().unwrap();
        let skus: Vec<&str> = request.line_items.iter().map(|item| item.sku.as_str()).collect();
        assert_eq!(skus, vec!["WDG-A", "CMP-B"]);
        assert_eq!(request.due_date, now() + Duration::days(30));

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["dueDate"], "2024-01-31T00:00:00Z");
        assert_eq!(wire["lineItems"][1]["discount"], 10.0);
    }

    #[test]
    fn test_sample_without_buyer_cannot_submit() {
        let mut draft = InvoiceDraft::new();
        draft.fill_sample_data(Some(PartyId::new("seller::1220")), None, now());
        assert!(matches!(draft.to_request(), Err(InvoiceError::IncompleteDraft(_))));
    }
}

// ============================================================================
// Dashboards
// ============================================================================

mod dashboard_tests {
    use super::*;

    fn ledger() -> Vec<Invoice> {
        vec![
            invoice("a", "Paid", now() - Duration::days(10), dec!(100), dec!(0)),
            invoice("b", "Issued", now() + Duration::days(4), dec!(50), dec!(50)),
            invoice("c", "PartiallyPaid", now() - Duration::days(1), dec!(80), dec!(30)),
            invoice("d", "Void", now() + Duration::days(20), dec!(10), dec!(10)),
        ]
    }

    #[test]
    fn test_seller_and_provider_agree_on_unpaid() {
        let invoices = ledger();
        let seller = SellerSummary::from_invoices(&invoices);
        let provider = ProviderSummary::from_invoices(&invoices);

        assert_eq!(seller.outstanding, dec!(90));
        assert_eq!(seller.revenue, dec!(100));
        assert_eq!(provider.pending_payments, 3);
        assert_eq!(provider.active_parties, 2);
    }

    #[test]
    fn test_buyer_view_of_the_same_ledger() {
        let invoices = ledger();
        let summary = BuyerSummary::from_invoices(&invoices, now());
        assert_eq!(summary.due_soon, 1);
        assert_eq!(summary.outstanding, dec!(90));
        assert_eq!(summary.paid_this_month, Decimal::ZERO);

        let rows = buyer_rows(&invoices, now(), Some("https://wallet.test"));
        let order: Vec<&str> = rows.iter().map(|row| row.invoice.contract_id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
        let overdue: Vec<bool> = rows.iter().map(|row| row.overdue).collect();
        assert_eq!(overdue, vec![false, true, false, false]);
    }

    #[test]
    fn test_disclosed_view_summaries() {
        let logistics: Vec<LogisticsView> = serde_json::from_value(json!([
            { "contractId": "lv1", "grantor": "seller::1220", "carrier": "logistics::1220",
              "items": [{ "itemName": "A", "quantity": 1 }, { "itemName": "B", "quantity": 2 }] },
            { "contractId": "lv2", "grantor": "seller::1220", "carrier": "logistics::1220",
              "items": [{ "itemName": "C", "quantity": 3 }] }
        ]))
        .unwrap();
        let carrier = CarrierSummary::from_views(&logistics);
        assert_eq!(carrier.active_shipments, 2);
        assert_eq!(carrier.total_items, 3);

        let books: Vec<BookkeeperView> = serde_json::from_value(json!([
            { "contractId": "bv1", "grantor": "seller::1220", "bookkeeper": "finance::1220",
              "status": "Paid", "grandTotal": 100, "balanceDue": 0,
              "taxBreakdown": [{ "taxName": "VAT", "taxRate": 8, "taxAmount": 8 }] },
            { "contractId": "bv2", "grantor": "seller::1220", "bookkeeper": "finance::1220",
              "status": "Issued", "grandTotal": 54, "balanceDue": 54,
              "taxBreakdown": [{ "taxName": "VAT", "taxRate": 8, "taxAmount": 4 }] }
        ]))
        .unwrap();
        let summary = BookkeeperSummary::from_views(&books);
        assert_eq!(summary.total_invoiced, dec!(154));
        assert_eq!(summary.tax_due, dec!(12));
        assert_eq!(summary.outstanding, dec!(54));
        assert_eq!(summary.paid, dec!(100));
        assert_eq!(books[1].status, InvoiceStatus::Issued);
    }

    #[test]
    fn test_default_share_targets() {
        let targets = ShareTargets::for_seller(&PartyId::new("seller::1220ab"));
        assert_eq!(targets.carrier, Some(PartyId::new("logistics::1220ab")));
        assert_eq!(targets.bookkeeper, Some(PartyId::new("finance::1220ab")));
    }

    #[test]
    fn test_role_routing_reads_the_right_slice() {
        assert!(Role::Buyer.reads_invoices());
        assert!(!Role::Carrier.reads_invoices());
        assert!(!Role::Bookkeeper.reads_invoices());
    }
}

// ============================================================================
// Tenant registration
// ============================================================================

mod tenant_tests {
    use super::*;

    #[test]
    fn test_unknown_auth_mode_only_checks_ids() {
        let form = TenantRegistrationForm {
            tenant_id: "acme".to_string(),
            party_id: "acme::1220".to_string(),
            ..Default::default()
        };
        let request = form.validate_for(None).unwrap();
        assert!(request.client_id.is_none());
        assert!(request.users.is_empty());
        assert!(form.validate_for(Some(AuthMode::SharedSecret)).is_err());
    }

    #[test]
    fn test_request_wire_shape_omits_blank_optionals() {
        let form = TenantRegistrationForm {
            tenant_id: "acme".to_string(),
            party_id: "acme::1220".to_string(),
            users: "alice".to_string(),
            ..Default::default()
        };
        let request = form.validate_for(Some(AuthMode::SharedSecret)).unwrap();
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["tenantId"], "acme");
        assert_eq!(wire["users"], json!(["alice"]));
        assert!(wire.get("clientId").is_none());
    }
}

//! Store integration tests against the in-memory ledger
//!
//! Every mutation is checked for the same contract: a confirmed command
//! leaves the cache equal to the server's collection and shows one success
//! toast; a rejected command leaves the cache alone, shows one error toast,
//! and never re-fetches.

use std::sync::Arc;

use chrono::Utc;
use core_kernel::{PortError, TenantId};
use domain_invoice::{
    AuthMode, CancelRequest, CompletePaymentRequest, CreateInvoiceRequest, FeatureFlags,
    InvoiceDraft, InvoiceStatus, MockLedger, RequestPaymentRequest, ShareWithCarrierRequest,
    TenantRegistrationForm,
};
use interface_client::{
    Command, DisclosureStore, InvoiceAction, InvoiceStore, Normalizer, Notification,
    NotificationKind, TenantAction, TenantRegistrationStore, ToastCenter,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{
    assert_same_contracts, BookkeeperViewBuilder, IdFixtures, InvoiceBuilder, LogisticsViewBuilder,
    PartyFixtures,
};

struct Harness {
    ledger: MockLedger,
    toasts: Arc<ToastCenter>,
    invoices: InvoiceStore,
    disclosures: DisclosureStore,
    tenants: TenantRegistrationStore,
}

fn harness(ledger: MockLedger) -> Harness {
    let toasts = Arc::new(ToastCenter::default());
    let normalizer = Normalizer::new(toasts.clone());
    Harness {
        invoices: InvoiceStore::new(Arc::new(ledger.clone()), normalizer.clone()),
        disclosures: DisclosureStore::new(Arc::new(ledger.clone()), normalizer.clone()),
        tenants: TenantRegistrationStore::new(Arc::new(ledger.clone()), normalizer),
        ledger,
        toasts,
    }
}

fn sample_request() -> CreateInvoiceRequest {
    let mut draft = InvoiceDraft::new();
    draft.fill_sample_data(
        Some(PartyFixtures::seller()),
        Some(PartyFixtures::buyer()),
        Utc::now(),
    );
    draft.to_request().unwrap()
}

fn messages(toasts: &ToastCenter) -> Vec<String> {
    toasts.history().into_iter().map(|n| n.message).collect()
}

mod invoice_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_invoice_mirrors_server_collection() {
        let h = harness(MockLedger::new());

        assert!(h.invoices.create_invoice(sample_request()).await);

        let server = h.ledger.invoices().await;
        assert_eq!(h.invoices.invoices().as_slice(), server.as_slice());
        assert_eq!(server[0].grand_total, dec!(502.2));
        assert_eq!(server[0].status, InvoiceStatus::Issued);
        assert_eq!(h.ledger.call_count("list_invoices").await, 1);
        assert_eq!(
            h.toasts.current(),
            Some(Notification::success("Invoice created successfully"))
        );
    }

    #[tokio::test]
    async fn test_rejected_command_leaves_cache_and_skips_resync() {
        let h = harness(MockLedger::with_invoices(vec![InvoiceBuilder::new().build()]).await);
        h.invoices.fetch_invoices().await;
        h.ledger
            .fail_next("mark_paid", PortError::conflict("Invoice is already paid"))
            .await;

        assert!(!h.invoices.mark_paid(&IdFixtures::invoice(1)).await);

        assert_eq!(h.invoices.invoices()[0].status, InvoiceStatus::Issued);
        assert_eq!(h.ledger.call_count("list_invoices").await, 1);
        assert_eq!(h.toasts.count(NotificationKind::Error), 1);
        assert_eq!(h.toasts.count(NotificationKind::Success), 0);
        assert_eq!(
            h.toasts.current().map(|n| n.message),
            Some("Marking Invoice as Paid failed: Invoice is already paid".to_string())
        );
    }

    #[tokio::test]
    async fn test_oversized_invoice_is_reported_not_created() {
        let h = harness(MockLedger::new());
        let mut request = sample_request();
        request.line_items[0].quantity = 1_000_000_000_000_000;
        request.line_items[0].unit_price = dec!(1000000000000000);

        assert!(!h.invoices.create_invoice(request).await);

        assert!(h.invoices.invoices().is_empty());
        assert_eq!(h.ledger.call_count("list_invoices").await, 0);
        assert_eq!(
            messages(&h.toasts),
            vec!["Creating Invoice failed: Line item 0 amounts are too large to compute"]
        );
    }

    #[tokio::test]
    async fn test_mark_paid_reflects_settled_invoice() {
        let h = harness(MockLedger::with_invoices(vec![InvoiceBuilder::new().build()]).await);

        assert!(h.invoices.mark_paid(&IdFixtures::invoice(1)).await);

        let cached = h.invoices.invoices();
        let invoice = &cached[0];
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.balance_due, Decimal::ZERO);
        assert_eq!(invoice.amount_paid, dec!(270));
        assert_eq!(messages(&h.toasts), vec!["Invoice marked as paid"]);
    }

    #[tokio::test]
    async fn test_resubmitted_command_applies_once() {
        let h = harness(MockLedger::new());
        let command = Command::new(InvoiceAction::Create(sample_request()));

        assert!(h.invoices.submit(&command).await.is_some());
        assert!(h.invoices.submit(&command).await.is_some());

        assert_eq!(h.ledger.invoices().await.len(), 1);
        assert_eq!(h.invoices.invoices().len(), 1);
        let ids: Vec<_> = h
            .ledger
            .calls()
            .await
            .into_iter()
            .filter(|call| call.operation == "create_invoice")
            .filter_map(|call| call.envelope.map(|e| e.command_id))
            .collect();
        assert_eq!(ids, vec![command.id, command.id]);
    }

    #[tokio::test]
    async fn test_each_helper_call_is_a_new_command() {
        let h = harness(MockLedger::new());

        assert!(h.invoices.create_invoice(sample_request()).await);
        assert!(h.invoices.create_invoice(sample_request()).await);

        assert_eq!(h.invoices.invoices().len(), 2);
    }

    #[tokio::test]
    async fn test_payment_flow_returns_receipt() {
        let h = harness(MockLedger::new());
        h.invoices.create_invoice(sample_request()).await;
        let invoice_id = h.invoices.invoices()[0].contract_id.clone();

        assert!(
            h.invoices
                .request_payment(&invoice_id, RequestPaymentRequest::default())
                .await
        );
        let request_id = h.invoices.invoices()[0].payment_requests[0].contract_id.clone();

        let result = h
            .invoices
            .complete_payment(
                &invoice_id,
                CompletePaymentRequest {
                    payment_request_contract_id: request_id,
                    allocation_contract_id: "allocation-1".into(),
                },
            )
            .await
            .expect("payment completes");

        assert_eq!(result.invoice_id, invoice_id);
        let cached = h.invoices.invoices();
        let invoice = &cached[0];
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.payment_requests.is_empty());
        assert_eq!(
            messages(&h.toasts),
            vec![
                "Invoice created successfully",
                "Payment request created successfully",
                "Invoice payment completed successfully",
            ]
        );
    }

    #[tokio::test]
    async fn test_withdraw_payment_request() {
        let h = harness(MockLedger::new());
        h.invoices.create_invoice(sample_request()).await;
        let invoice_id = h.invoices.invoices()[0].contract_id.clone();
        h.invoices
            .request_payment(&invoice_id, RequestPaymentRequest::default())
            .await;
        let request_id = h.invoices.invoices()[0].payment_requests[0].contract_id.clone();

        assert!(h.invoices.withdraw_payment_request(&request_id).await);

        assert!(h.invoices.invoices()[0].payment_requests.is_empty());
        assert_eq!(
            h.toasts.current().map(|n| n.message),
            Some("Payment request withdrawn successfully".to_string())
        );
    }

    #[tokio::test]
    async fn test_cancel_removes_invoice_from_cache() {
        let h = harness(
            MockLedger::with_invoices(vec![
                InvoiceBuilder::new().numbered(1).build(),
                InvoiceBuilder::new().numbered(2).build(),
            ])
            .await,
        );
        h.invoices.fetch_invoices().await;

        assert!(
            h.invoices
                .cancel_invoice(&IdFixtures::invoice(1), CancelRequest::new(" Cancelled by seller "))
                .await
        );

        let cached = h.invoices.invoices();
        assert_same_contracts(cached.iter().map(|i| &i.contract_id), [&IdFixtures::invoice(2)]);
        let cancel = h
            .ledger
            .calls()
            .await
            .into_iter()
            .find(|call| call.operation == "cancel_invoice")
            .and_then(|call| call.envelope)
            .unwrap();
        assert_eq!(cancel.contract_id, Some(IdFixtures::invoice(1)));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_snapshot() {
        let h = harness(MockLedger::with_invoices(vec![InvoiceBuilder::new().build()]).await);
        let first = h.invoices.fetch_invoices().await.unwrap();
        h.ledger.set_outage("list_invoices", "ledger unreachable").await;

        assert!(h.invoices.fetch_invoices().await.is_none());

        assert!(Arc::ptr_eq(&first, &h.invoices.invoices()));
        assert_eq!(
            messages(&h.toasts),
            vec!["Fetching Invoices failed: ledger unreachable"]
        );
    }

    #[tokio::test]
    async fn test_failed_resync_still_confirms_command() {
        let h = harness(MockLedger::with_invoices(vec![InvoiceBuilder::new().build()]).await);
        h.invoices.fetch_invoices().await;
        h.ledger
            .fail_next("list_invoices", PortError::connection("connection reset"))
            .await;

        assert!(h.invoices.mark_paid(&IdFixtures::invoice(1)).await);

        assert_eq!(h.invoices.invoices()[0].status, InvoiceStatus::Issued);
        assert_eq!(
            messages(&h.toasts),
            vec![
                "Fetching Invoices failed: connection reset",
                "Invoice marked as paid",
            ]
        );
    }

    #[tokio::test]
    async fn test_sharing_does_not_touch_view_caches() {
        let h = harness(MockLedger::with_invoices(vec![InvoiceBuilder::new().build()]).await);

        assert!(
            h.invoices
                .share_with_carrier(
                    &IdFixtures::invoice(1),
                    ShareWithCarrierRequest {
                        carrier: PartyFixtures::carrier(),
                    },
                )
                .await
        );

        assert_eq!(h.ledger.logistics_views().await.len(), 1);
        assert!(h.disclosures.logistics_views().is_empty());
        assert_eq!(h.ledger.call_count("list_logistics_views").await, 0);
        assert_eq!(messages(&h.toasts), vec!["Shared with carrier"]);
    }
}

mod disclosure_tests {
    use super::*;

    #[tokio::test]
    async fn test_acknowledge_resyncs_only_its_kind() {
        let h = harness(MockLedger::new());
        h.ledger
            .set_logistics_views(vec![LogisticsViewBuilder::new().with_item("Widget", 3).build()])
            .await;
        h.ledger
            .set_bookkeeper_views(vec![BookkeeperViewBuilder::new().build()])
            .await;
        h.disclosures.fetch_logistics_views().await;

        assert!(
            h.disclosures
                .acknowledge_logistics_view(&IdFixtures::logistics_view(1))
                .await
        );

        assert!(h.disclosures.logistics_views().is_empty());
        assert!(h.disclosures.bookkeeper_views().is_empty());
        assert_eq!(h.ledger.call_count("list_logistics_views").await, 2);
        assert_eq!(h.ledger.call_count("list_bookkeeper_views").await, 0);
        assert_eq!(h.ledger.call_count("list_invoices").await, 0);
        assert_eq!(messages(&h.toasts), vec!["Logistics view acknowledged"]);
    }

    #[tokio::test]
    async fn test_revoke_is_silent() {
        let h = harness(MockLedger::new());
        h.ledger
            .set_bookkeeper_views(vec![BookkeeperViewBuilder::new().build()])
            .await;
        h.disclosures.fetch_bookkeeper_views().await;
        assert_eq!(h.disclosures.bookkeeper_views().len(), 1);

        assert!(
            h.disclosures
                .revoke_bookkeeper_view(&IdFixtures::bookkeeper_view(1))
                .await
        );

        assert!(h.disclosures.bookkeeper_views().is_empty());
        assert!(h.toasts.history().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_view_is_reported() {
        let h = harness(MockLedger::new());

        assert!(
            !h.disclosures
                .acknowledge_bookkeeper_view(&IdFixtures::bookkeeper_view(9))
                .await
        );

        assert_eq!(h.toasts.count(NotificationKind::Error), 1);
        let message = h.toasts.current().unwrap().message;
        assert!(message.starts_with("Acknowledging Bookkeeper View failed"), "{}", message);
        assert_eq!(h.ledger.call_count("list_bookkeeper_views").await, 0);
    }
}

mod tenant_tests {
    use super::*;

    fn form(users: &str) -> TenantRegistrationForm {
        TenantRegistrationForm {
            tenant_id: "acme".to_string(),
            party_id: PartyFixtures::seller().to_string(),
            users: users.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_feature_flag_failure_has_fixed_message() {
        let h = harness(MockLedger::new());

        assert!(h.tenants.fetch_feature_flags().await.is_none());

        assert_eq!(h.tenants.auth_mode(), None);
        assert_eq!(messages(&h.toasts), vec!["Error fetching feature flags"]);
    }

    #[tokio::test]
    async fn test_form_validation_follows_auth_mode() {
        let h = harness(MockLedger::new());
        h.ledger
            .set_feature_flags(FeatureFlags {
                auth_mode: AuthMode::OAuth2,
            })
            .await;
        h.tenants.fetch_feature_flags().await;

        assert!(!h.tenants.submit_form(&form("alice")).await);

        assert_eq!(messages(&h.toasts), vec!["Client ID is required (OAuth2)"]);
        assert_eq!(h.ledger.call_count("create_tenant_registration").await, 0);
    }

    #[tokio::test]
    async fn test_register_and_delete_tenant() {
        let h = harness(MockLedger::new());
        h.ledger
            .set_feature_flags(FeatureFlags {
                auth_mode: AuthMode::SharedSecret,
            })
            .await;
        h.tenants.fetch_feature_flags().await;

        assert!(h.tenants.submit_form(&form(" alice, ,bob ")).await);
        let registrations = h.tenants.registrations();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].users, vec!["alice", "bob"]);

        assert!(h.tenants.delete_tenant_registration(&TenantId::new("acme")).await);
        assert!(h.tenants.registrations().is_empty());

        let delete = h
            .ledger
            .calls()
            .await
            .into_iter()
            .find(|call| call.operation == "delete_tenant_registration")
            .unwrap();
        let envelope = delete.envelope.unwrap();
        assert_eq!(envelope.contract_id, None);
        assert_eq!(
            messages(&h.toasts),
            vec![
                "Tenant registration created successfully",
                "Tenant registration deleted successfully",
            ]
        );
    }

    #[tokio::test]
    async fn test_replayed_delete_applies_once() {
        let h = harness(MockLedger::new());
        assert!(h.tenants.submit_form(&form("alice")).await);
        let command = Command::new(TenantAction::Delete(TenantId::new("acme")));

        assert!(h.tenants.submit(&command).await);
        assert!(h.tenants.submit(&command).await);

        assert!(h.tenants.registrations().is_empty());
        assert_eq!(h.toasts.count(NotificationKind::Error), 0);
        let ids: Vec<_> = h
            .ledger
            .calls()
            .await
            .into_iter()
            .filter(|call| call.operation == "delete_tenant_registration")
            .filter_map(|call| call.envelope.map(|e| e.command_id))
            .collect();
        assert_eq!(ids, vec![command.id, command.id]);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let h = harness(MockLedger::new());
        assert!(h.tenants.submit_form(&form("alice")).await);

        assert!(!h.tenants.submit_form(&form("alice")).await);

        assert_eq!(h.tenants.registrations().len(), 1);
        assert_eq!(
            h.toasts.current().map(|n| n.message),
            Some("Creating Tenant Registration failed: Tenant acme is already registered".to_string())
        );
    }
}

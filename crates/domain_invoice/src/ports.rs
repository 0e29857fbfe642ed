//! Invoice Domain Ports
//!
//! Port traits for everything the client needs from the ledger-backed
//! service. Stores receive `Arc<dyn Port>` and never know which adapter is
//! behind it.
//!
//! # Commands
//!
//! Every mutating call carries a [`CommandEnvelope`]: the contract the
//! command acts on (absent for creates) and the command id. The ledger
//! treats two requests with the same command id as one command, so the
//! caller decides idempotency by choosing when to mint a new id.
//!
//! # Adapters
//!
//! - **HTTP adapter** (`infra_ledger`): the ledger-backed REST API
//! - **Mock adapter** ([`mock::MockLedger`]): in-memory ledger for tests
//!
//! ```rust,ignore
//! use domain_invoice::ports::InvoicePort;
//! use std::sync::Arc;
//!
//! pub struct InvoiceStore {
//!     port: Arc<dyn InvoicePort>,
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{CommandId, ContractId, DomainPort, PortError, TenantId};

use crate::disclosure::{BookkeeperView, LogisticsView};
use crate::invoice::{
    CancelRequest, CompletePaymentRequest, CreateInvoiceRequest, Invoice, InvoicePaymentResult,
    RequestPaymentRequest, ShareWithBookkeeperRequest, ShareWithCarrierRequest,
};
use crate::session::{AuthenticatedUser, PartyDirectory};
use crate::tenant::{FeatureFlags, TenantRegistration, TenantRegistrationRequest};

/// Addressing and idempotency key of a mutating call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
    pub command_id: CommandId,
}

impl CommandEnvelope {
    /// Envelope for a command that creates a new record
    pub fn create(command_id: CommandId) -> Self {
        Self {
            contract_id: None,
            command_id,
        }
    }

    /// Envelope for a command addressed by something other than a contract
    pub fn unaddressed(command_id: CommandId) -> Self {
        Self::create(command_id)
    }

    /// Envelope for a command on an existing contract
    pub fn on(contract_id: ContractId, command_id: CommandId) -> Self {
        Self {
            contract_id: Some(contract_id),
            command_id,
        }
    }

    /// The target contract, or a validation error for create envelopes
    pub fn require_contract(&self) -> Result<&ContractId, PortError> {
        self.contract_id
            .as_ref()
            .ok_or_else(|| PortError::validation_field("contract id is required", "contractId"))
    }
}

/// Full invoices and their commands
#[async_trait]
pub trait InvoicePort: DomainPort {
    /// Invoices visible to the current party
    async fn list_invoices(&self) -> Result<Vec<Invoice>, PortError>;

    async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;

    async fn request_payment(
        &self,
        request: RequestPaymentRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;

    async fn complete_payment(
        &self,
        request: CompletePaymentRequest,
        envelope: CommandEnvelope,
    ) -> Result<InvoicePaymentResult, PortError>;

    async fn mark_paid(&self, envelope: CommandEnvelope) -> Result<(), PortError>;

    async fn cancel_invoice(
        &self,
        request: CancelRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;

    /// The envelope addresses the payment request contract, not the invoice
    async fn withdraw_payment_request(&self, envelope: CommandEnvelope) -> Result<(), PortError>;

    async fn share_with_carrier(
        &self,
        request: ShareWithCarrierRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;

    async fn share_with_bookkeeper(
        &self,
        request: ShareWithBookkeeperRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;
}

/// Privacy-scoped invoice views
#[async_trait]
pub trait DisclosurePort: DomainPort {
    async fn list_logistics_views(&self) -> Result<Vec<LogisticsView>, PortError>;
    async fn acknowledge_logistics_view(&self, envelope: CommandEnvelope) -> Result<(), PortError>;
    async fn revoke_logistics_view(&self, envelope: CommandEnvelope) -> Result<(), PortError>;

    async fn list_bookkeeper_views(&self) -> Result<Vec<BookkeeperView>, PortError>;
    async fn acknowledge_bookkeeper_view(&self, envelope: CommandEnvelope) -> Result<(), PortError>;
    async fn revoke_bookkeeper_view(&self, envelope: CommandEnvelope) -> Result<(), PortError>;
}

/// Admin management of tenant registrations
#[async_trait]
pub trait TenantRegistrationPort: DomainPort {
    async fn list_tenant_registrations(&self) -> Result<Vec<TenantRegistration>, PortError>;

    async fn create_tenant_registration(
        &self,
        request: TenantRegistrationRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;

    /// Addressed by tenant id; the envelope carries only the command id
    async fn delete_tenant_registration(
        &self,
        tenant_id: &TenantId,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError>;

    async fn feature_flags(&self) -> Result<FeatureFlags, PortError>;
}

/// Read-only access to the session collaborator
#[async_trait]
pub trait SessionPort: DomainPort {
    /// The authenticated user, or `None` when nobody is logged in
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, PortError>;

    /// Configured party ids by role
    async fn parties(&self) -> Result<PartyDirectory, PortError>;
}

// ============================================================================
// Mock Implementation (for testing)
// ============================================================================

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory ledger for tests
    //!
    //! Applies commands to local state the way the ledger would, records
    //! every call, replays duplicate command ids without re-applying them,
    //! and can be told to fail specific operations.

    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;
    use tokio::sync::RwLock;

    use crate::calculator::{self, InvoiceTotals};
    use crate::disclosure::LogisticsItem;
    use crate::invoice::{InvoiceStatus, PaymentRequest};

    /// A call observed by the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        /// Port method name, e.g. `mark_paid`
        pub operation: &'static str,
        pub envelope: Option<CommandEnvelope>,
    }

    #[derive(Debug, Clone)]
    enum Applied {
        Done,
        Payment(InvoicePaymentResult),
    }

    #[derive(Debug, Default)]
    struct LedgerState {
        invoices: Vec<Invoice>,
        logistics_views: Vec<LogisticsView>,
        bookkeeper_views: Vec<BookkeeperView>,
        registrations: Vec<TenantRegistration>,
        feature_flags: Option<FeatureFlags>,
        user: Option<AuthenticatedUser>,
        parties: PartyDirectory,
        calls: Vec<RecordedCall>,
        failures: HashMap<&'static str, VecDeque<PortError>>,
        outages: HashMap<&'static str, String>,
        applied: HashMap<CommandId, Applied>,
        sequence: u64,
    }

    impl LedgerState {
        fn next_id(&mut self, prefix: &str) -> ContractId {
            self.sequence += 1;
            ContractId::new(format!("{}-{:04}", prefix, self.sequence))
        }

        /// Records a call and applies any injected failure
        fn enter(
            &mut self,
            operation: &'static str,
            envelope: Option<&CommandEnvelope>,
        ) -> Result<(), PortError> {
            self.calls.push(RecordedCall {
                operation,
                envelope: envelope.cloned(),
            });
            if let Some(error) = self.failures.get_mut(operation).and_then(VecDeque::pop_front) {
                tracing::debug!(operation, error = %error, "Injected failure");
                return Err(error);
            }
            if let Some(message) = self.outages.get(operation) {
                tracing::debug!(operation, "Simulated outage");
                return Err(PortError::connection(message.clone()));
            }
            Ok(())
        }

        fn invoice_mut(&mut self, contract_id: &ContractId) -> Result<&mut Invoice, PortError> {
            self.invoices
                .iter_mut()
                .find(|invoice| &invoice.contract_id == contract_id)
                .ok_or_else(|| PortError::not_found("Invoice", contract_id))
        }

        fn invoice(&self, contract_id: &ContractId) -> Result<&Invoice, PortError> {
            self.invoices
                .iter()
                .find(|invoice| &invoice.contract_id == contract_id)
                .ok_or_else(|| PortError::not_found("Invoice", contract_id))
        }
    }

    /// In-memory implementation of every ledger port
    #[derive(Debug, Clone, Default)]
    pub struct MockLedger {
        state: Arc<RwLock<LedgerState>>,
    }

    impl MockLedger {
        /// Creates an empty ledger
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates invoices
        pub async fn with_invoices(invoices: Vec<Invoice>) -> Self {
            let ledger = Self::new();
            ledger.state.write().await.invoices = invoices;
            ledger
        }

        pub async fn set_invoices(&self, invoices: Vec<Invoice>) {
            self.state.write().await.invoices = invoices;
        }

        pub async fn set_logistics_views(&self, views: Vec<LogisticsView>) {
            self.state.write().await.logistics_views = views;
        }

        pub async fn set_bookkeeper_views(&self, views: Vec<BookkeeperView>) {
            self.state.write().await.bookkeeper_views = views;
        }

        pub async fn set_registrations(&self, registrations: Vec<TenantRegistration>) {
            self.state.write().await.registrations = registrations;
        }

        pub async fn set_feature_flags(&self, flags: FeatureFlags) {
            self.state.write().await.feature_flags = Some(flags);
        }

        pub async fn set_user(&self, user: Option<AuthenticatedUser>) {
            self.state.write().await.user = user;
        }

        pub async fn set_parties(&self, parties: PartyDirectory) {
            self.state.write().await.parties = parties;
        }

        /// Fails the next call to `operation` with `error`
        pub async fn fail_next(&self, operation: &'static str, error: PortError) {
            self.state
                .write()
                .await
                .failures
                .entry(operation)
                .or_default()
                .push_back(error);
        }

        /// Fails every call to `operation` with a connection error until cleared
        pub async fn set_outage(&self, operation: &'static str, message: impl Into<String>) {
            self.state.write().await.outages.insert(operation, message.into());
        }

        pub async fn clear_outage(&self, operation: &'static str) {
            self.state.write().await.outages.remove(operation);
        }

        /// Every call observed so far, in order
        pub async fn calls(&self) -> Vec<RecordedCall> {
            self.state.read().await.calls.clone()
        }

        /// Number of calls to `operation`
        pub async fn call_count(&self, operation: &str) -> usize {
            self.state
                .read()
                .await
                .calls
                .iter()
                .filter(|call| call.operation == operation)
                .count()
        }

        pub async fn clear_calls(&self) {
            self.state.write().await.calls.clear();
        }

        /// Current server-side invoices
        pub async fn invoices(&self) -> Vec<Invoice> {
            self.state.read().await.invoices.clone()
        }

        pub async fn logistics_views(&self) -> Vec<LogisticsView> {
            self.state.read().await.logistics_views.clone()
        }

        pub async fn bookkeeper_views(&self) -> Vec<BookkeeperView> {
            self.state.read().await.bookkeeper_views.clone()
        }

        /// Runs a command once per command id
        async fn command<F>(
            &self,
            operation: &'static str,
            envelope: &CommandEnvelope,
            apply: F,
        ) -> Result<Applied, PortError>
        where
            F: FnOnce(&mut LedgerState) -> Result<Applied, PortError> + Send,
        {
            let mut state = self.state.write().await;
            state.enter(operation, Some(envelope))?;
            if let Some(previous) = state.applied.get(&envelope.command_id) {
                return Ok(previous.clone());
            }
            let applied = apply(&mut *state)?;
            state.applied.insert(envelope.command_id, applied.clone());
            Ok(applied)
        }

        async fn read<T, F>(&self, operation: &'static str, read: F) -> Result<T, PortError>
        where
            F: FnOnce(&LedgerState) -> T + Send,
        {
            let mut state = self.state.write().await;
            state.enter(operation, None)?;
            Ok(read(&*state))
        }
    }

    fn invoice_from_request(
        contract_id: ContractId,
        invoice_num: i64,
        request: CreateInvoiceRequest,
        totals: InvoiceTotals,
    ) -> Invoice {
        Invoice {
            contract_id,
            seller: request.seller,
            buyer: request.buyer,
            provider: None,
            invoice_num,
            invoice_date: Some(Utc::now()),
            due_date: request.due_date,
            currency: request.currency,
            description: request.description,
            status: InvoiceStatus::Issued,
            seller_info: request.seller_info,
            buyer_info: request.buyer_info,
            shipping_address: request.shipping_address,
            line_items: request.line_items,
            tax_breakdown: Vec::new(),
            subtotal: totals.subtotal,
            total_discount: totals.total_discount,
            total_tax: totals.total_tax,
            grand_total: totals.grand_total,
            amount_paid: Decimal::ZERO,
            balance_due: totals.grand_total,
            payment_terms: request.payment_terms,
            po_number: request.po_number,
            sales_order_number: String::new(),
            notes: request.notes,
            delivery_terms: request.delivery_terms,
            payment_requests: Vec::new(),
        }
    }

    fn settle(invoice: &mut Invoice) {
        invoice.status = InvoiceStatus::Paid;
        invoice.amount_paid = invoice.grand_total;
        invoice.balance_due = Decimal::ZERO;
        invoice.payment_requests.clear();
    }

    impl DomainPort for MockLedger {}

    #[async_trait]
    impl InvoicePort for MockLedger {
        async fn list_invoices(&self) -> Result<Vec<Invoice>, PortError> {
            self.read("list_invoices", |state| state.invoices.clone()).await
        }

        async fn create_invoice(
            &self,
            request: CreateInvoiceRequest,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            self.command("create_invoice", &envelope, move |state| {
                let totals = calculator::invoice_totals(&request.line_items)
                    .map_err(|error| PortError::validation(error.to_string()))?;
                let contract_id = state.next_id("invoice");
                let invoice_num = state.invoices.len() as i64 + 1;
                state
                    .invoices
                    .push(invoice_from_request(contract_id, invoice_num, request, totals));
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn request_payment(
            &self,
            _request: RequestPaymentRequest,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("request_payment", &envelope, move |state| {
                let request_id = state.next_id("payment-request");
                let invoice = state.invoice_mut(&contract_id)?;
                if invoice.status == InvoiceStatus::Paid {
                    return Err(PortError::conflict("Invoice is already paid"));
                }
                invoice.payment_requests.push(PaymentRequest {
                    contract_id: request_id,
                    requested_at: Utc::now(),
                    prepare_until: None,
                    settle_before: None,
                    amount: Some(invoice.balance_due),
                    expired: false,
                });
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn complete_payment(
            &self,
            request: CompletePaymentRequest,
            envelope: CommandEnvelope,
        ) -> Result<InvoicePaymentResult, PortError> {
            let contract_id = envelope.require_contract()?.clone();
            let applied = self
                .command("complete_payment", &envelope, move |state| {
                    let receipt_id = state.next_id("receipt");
                    let invoice = state.invoice_mut(&contract_id)?;
                    let known = invoice
                        .payment_requests
                        .iter()
                        .any(|pr| pr.contract_id == request.payment_request_contract_id);
                    if !known {
                        return Err(PortError::not_found(
                            "InvoicePaymentRequest",
                            &request.payment_request_contract_id,
                        ));
                    }
                    settle(invoice);
                    Ok(Applied::Payment(InvoicePaymentResult {
                        invoice_id: contract_id,
                        receipt_id,
                    }))
                })
                .await?;

            match applied {
                Applied::Payment(result) => Ok(result),
                Applied::Done => Err(PortError::conflict(
                    "command id was already used for a different command",
                )),
            }
        }

        async fn mark_paid(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("mark_paid", &envelope, move |state| {
                let invoice = state.invoice_mut(&contract_id)?;
                if invoice.status == InvoiceStatus::Paid {
                    return Err(PortError::conflict("Invoice is already paid"));
                }
                settle(invoice);
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn cancel_invoice(
            &self,
            _request: CancelRequest,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("cancel_invoice", &envelope, move |state| {
                state.invoice(&contract_id)?;
                state.invoices.retain(|invoice| invoice.contract_id != contract_id);
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn withdraw_payment_request(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
            let request_id = envelope.require_contract()?.clone();
            self.command("withdraw_payment_request", &envelope, move |state| {
                let invoice = state
                    .invoices
                    .iter_mut()
                    .find(|invoice| {
                        invoice
                            .payment_requests
                            .iter()
                            .any(|pr| pr.contract_id == request_id)
                    })
                    .ok_or_else(|| PortError::not_found("InvoicePaymentRequest", &request_id))?;
                invoice.payment_requests.retain(|pr| pr.contract_id != request_id);
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn share_with_carrier(
            &self,
            request: ShareWithCarrierRequest,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("share_with_carrier", &envelope, move |state| {
                let invoice = state.invoice(&contract_id)?.clone();
                let view_id = state.next_id("logistics-view");
                state.logistics_views.push(LogisticsView {
                    contract_id: view_id,
                    grantor: invoice.seller.clone(),
                    carrier: request.carrier,
                    provider: invoice.provider.clone(),
                    invoice_ref: format!("INV-{}", invoice.invoice_num),
                    order_ref: invoice.po_number.clone(),
                    ship_from_address: invoice.seller_info.address.clone(),
                    ship_to_address: invoice.shipping_address.clone(),
                    seller_contact: invoice.seller_info.contact.clone(),
                    buyer_contact: invoice.buyer_info.contact.clone(),
                    items: invoice
                        .line_items
                        .iter()
                        .map(|item| LogisticsItem {
                            item_name: item.item_name.clone(),
                            sku: item.sku.clone(),
                            quantity: item.quantity,
                            unit_of_measure: item.unit_of_measure.clone(),
                            batch_info: item.batch_info.clone(),
                            delivery_date: item.delivery_date.clone(),
                        })
                        .collect(),
                    delivery_terms: invoice.delivery_terms.clone(),
                    notes: invoice.notes.clone(),
                });
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn share_with_bookkeeper(
            &self,
            request: ShareWithBookkeeperRequest,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("share_with_bookkeeper", &envelope, move |state| {
                let invoice = state.invoice(&contract_id)?.clone();
                let view_id = state.next_id("bookkeeper-view");
                state.bookkeeper_views.push(BookkeeperView {
                    contract_id: view_id,
                    grantor: invoice.seller.clone(),
                    bookkeeper: request.bookkeeper,
                    provider: invoice.provider.clone(),
                    invoice_num: invoice.invoice_num,
                    invoice_date: invoice.invoice_date,
                    seller_name: invoice.seller_info.party_name.clone(),
                    buyer_name: invoice.buyer_info.party_name.clone(),
                    currency: invoice.currency.clone(),
                    status: invoice.status,
                    subtotal: invoice.subtotal,
                    total_discount: invoice.total_discount,
                    tax_breakdown: invoice.tax_breakdown.clone(),
                    grand_total: invoice.grand_total,
                    amount_paid: invoice.amount_paid,
                    balance_due: invoice.balance_due,
                    item_categories: Vec::new(),
                });
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }
    }

    fn archive<T, F>(views: &mut Vec<T>, entity: &str, contract_id: &ContractId, key: F) -> Result<(), PortError>
    where
        F: Fn(&T) -> &ContractId,
    {
        let before = views.len();
        views.retain(|view| key(view) != contract_id);
        if views.len() == before {
            return Err(PortError::not_found(entity, contract_id));
        }
        Ok(())
    }

    #[async_trait]
    impl DisclosurePort for MockLedger {
        async fn list_logistics_views(&self) -> Result<Vec<LogisticsView>, PortError> {
            self.read("list_logistics_views", |state| state.logistics_views.clone())
                .await
        }

        async fn acknowledge_logistics_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("acknowledge_logistics_view", &envelope, move |state| {
                archive(&mut state.logistics_views, "LogisticsView", &contract_id, |v| &v.contract_id)?;
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn revoke_logistics_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("revoke_logistics_view", &envelope, move |state| {
                archive(&mut state.logistics_views, "LogisticsView", &contract_id, |v| &v.contract_id)?;
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn list_bookkeeper_views(&self) -> Result<Vec<BookkeeperView>, PortError> {
            self.read("list_bookkeeper_views", |state| state.bookkeeper_views.clone())
                .await
        }

        async fn acknowledge_bookkeeper_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("acknowledge_bookkeeper_view", &envelope, move |state| {
                archive(&mut state.bookkeeper_views, "BookkeeperView", &contract_id, |v| &v.contract_id)?;
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn revoke_bookkeeper_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
            let contract_id = envelope.require_contract()?.clone();
            self.command("revoke_bookkeeper_view", &envelope, move |state| {
                archive(&mut state.bookkeeper_views, "BookkeeperView", &contract_id, |v| &v.contract_id)?;
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }
    }

    #[async_trait]
    impl TenantRegistrationPort for MockLedger {
        async fn list_tenant_registrations(&self) -> Result<Vec<TenantRegistration>, PortError> {
            self.read("list_tenant_registrations", |state| state.registrations.clone())
                .await
        }

        async fn create_tenant_registration(
            &self,
            request: TenantRegistrationRequest,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            self.command("create_tenant_registration", &envelope, move |state| {
                let tenant_id = TenantId::new(request.tenant_id);
                if state.registrations.iter().any(|r| r.tenant_id == tenant_id) {
                    return Err(PortError::conflict(format!(
                        "Tenant {} is already registered",
                        tenant_id
                    )));
                }
                state.registrations.push(TenantRegistration {
                    tenant_id,
                    party_id: request.party_id.into(),
                    client_id: request.client_id,
                    issuer_url: request.issuer_url,
                    wallet_url: request.wallet_url,
                    users: request.users,
                    internal: false,
                });
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn delete_tenant_registration(
            &self,
            tenant_id: &TenantId,
            envelope: CommandEnvelope,
        ) -> Result<(), PortError> {
            let tenant_id = tenant_id.clone();
            self.command("delete_tenant_registration", &envelope, move |state| {
                let before = state.registrations.len();
                state.registrations.retain(|r| r.tenant_id != tenant_id);
                if state.registrations.len() == before {
                    return Err(PortError::not_found("TenantRegistration", &tenant_id));
                }
                Ok(Applied::Done)
            })
            .await
            .map(|_| ())
        }

        async fn feature_flags(&self) -> Result<FeatureFlags, PortError> {
            let mut state = self.state.write().await;
            state.enter("feature_flags", None)?;
            state
                .feature_flags
                .clone()
                .ok_or_else(|| PortError::not_found("FeatureFlags", "current"))
        }
    }

    #[async_trait]
    impl SessionPort for MockLedger {
        async fn current_user(&self) -> Result<Option<AuthenticatedUser>, PortError> {
            self.read("current_user", |state| state.user.clone()).await
        }

        async fn parties(&self) -> Result<PartyDirectory, PortError> {
            self.read("parties", |state| state.parties.clone()).await
        }
    }
}

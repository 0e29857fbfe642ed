//! Invoice store

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use core_kernel::{ContractId, PortError};
use domain_invoice::{
    CancelRequest, CommandEnvelope, CompletePaymentRequest, CreateInvoiceRequest, Invoice,
    InvoicePaymentResult, InvoicePort, RequestPaymentRequest, ShareWithBookkeeperRequest,
    ShareWithCarrierRequest,
};

use super::Command;
use crate::cache::{SliceCache, Snapshot};
use crate::normalizer::Normalizer;

/// Mutations on full invoices
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceAction {
    Create(CreateInvoiceRequest),
    RequestPayment {
        invoice: ContractId,
        request: RequestPaymentRequest,
    },
    CompletePayment {
        invoice: ContractId,
        request: CompletePaymentRequest,
    },
    MarkPaid {
        invoice: ContractId,
    },
    Cancel {
        invoice: ContractId,
        request: CancelRequest,
    },
    WithdrawPaymentRequest {
        payment_request: ContractId,
    },
    ShareWithCarrier {
        invoice: ContractId,
        request: ShareWithCarrierRequest,
    },
    ShareWithBookkeeper {
        invoice: ContractId,
        request: ShareWithBookkeeperRequest,
    },
}

impl InvoiceAction {
    /// Action name used in failure notifications
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceAction::Create(_) => "Creating Invoice",
            InvoiceAction::RequestPayment { .. } => "Requesting Invoice Payment",
            InvoiceAction::CompletePayment { .. } => "Completing Invoice Payment",
            InvoiceAction::MarkPaid { .. } => "Marking Invoice as Paid",
            InvoiceAction::Cancel { .. } => "Cancelling Invoice",
            InvoiceAction::WithdrawPaymentRequest { .. } => "Withdrawing payment request",
            InvoiceAction::ShareWithCarrier { .. } => "Sharing with carrier",
            InvoiceAction::ShareWithBookkeeper { .. } => "Sharing with bookkeeper",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            InvoiceAction::Create(_) => "Invoice created successfully",
            InvoiceAction::RequestPayment { .. } => "Payment request created successfully",
            InvoiceAction::CompletePayment { .. } => "Invoice payment completed successfully",
            InvoiceAction::MarkPaid { .. } => "Invoice marked as paid",
            InvoiceAction::Cancel { .. } => "Invoice cancelled successfully",
            InvoiceAction::WithdrawPaymentRequest { .. } => "Payment request withdrawn successfully",
            InvoiceAction::ShareWithCarrier { .. } => "Shared with carrier",
            InvoiceAction::ShareWithBookkeeper { .. } => "Shared with bookkeeper",
        }
    }

    /// The contract the command addresses, `None` for creates
    pub fn contract_id(&self) -> Option<&ContractId> {
        match self {
            InvoiceAction::Create(_) => None,
            InvoiceAction::RequestPayment { invoice, .. }
            | InvoiceAction::CompletePayment { invoice, .. }
            | InvoiceAction::MarkPaid { invoice }
            | InvoiceAction::Cancel { invoice, .. }
            | InvoiceAction::ShareWithCarrier { invoice, .. }
            | InvoiceAction::ShareWithBookkeeper { invoice, .. } => Some(invoice),
            InvoiceAction::WithdrawPaymentRequest { payment_request } => Some(payment_request),
        }
    }
}

/// What a confirmed invoice command returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    PaymentCompleted(InvoicePaymentResult),
}

/// Owns the invoice collection visible to the current party
#[derive(Clone)]
pub struct InvoiceStore {
    port: Arc<dyn InvoicePort>,
    normalizer: Normalizer,
    invoices: SliceCache<Invoice>,
}

impl InvoiceStore {
    pub fn new(port: Arc<dyn InvoicePort>, normalizer: Normalizer) -> Self {
        Self {
            port,
            normalizer,
            invoices: SliceCache::new(),
        }
    }

    /// The last fetched collection
    pub fn invoices(&self) -> Snapshot<Invoice> {
        self.invoices.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Invoice>> {
        self.invoices.subscribe()
    }

    /// Replaces the cache with the server's collection
    ///
    /// On failure the previous collection stays in place.
    pub async fn fetch_invoices(&self) -> Option<Snapshot<Invoice>> {
        let invoices = self
            .normalizer
            .run("Fetching Invoices", self.port.list_invoices())
            .await?;
        debug!(count = invoices.len(), "Fetched invoices");
        Some(self.invoices.replace(invoices))
    }

    /// Sends a command, then re-fetches and notifies on success
    pub async fn submit(&self, command: &Command<InvoiceAction>) -> Option<CommandOutcome> {
        let action = &command.action;
        info!(
            action = action.label(),
            command_id = %command.id,
            contract_id = ?action.contract_id().map(|id| id.as_str()),
            "Submitting invoice command"
        );

        let outcome = self.normalizer.run(action.label(), self.dispatch(command)).await?;

        self.fetch_invoices().await;
        self.normalizer.notify_success(action.success_message());
        Some(outcome)
    }

    async fn dispatch(&self, command: &Command<InvoiceAction>) -> Result<CommandOutcome, PortError> {
        let envelope = |contract: &ContractId| CommandEnvelope::on(contract.clone(), command.id);
        match &command.action {
            InvoiceAction::Create(request) => self
                .port
                .create_invoice(request.clone(), CommandEnvelope::create(command.id))
                .await
                .map(|()| CommandOutcome::Applied),
            InvoiceAction::RequestPayment { invoice, request } => self
                .port
                .request_payment(request.clone(), envelope(invoice))
                .await
                .map(|()| CommandOutcome::Applied),
            InvoiceAction::CompletePayment { invoice, request } => self
                .port
                .complete_payment(request.clone(), envelope(invoice))
                .await
                .map(CommandOutcome::PaymentCompleted),
            InvoiceAction::MarkPaid { invoice } => self
                .port
                .mark_paid(envelope(invoice))
                .await
                .map(|()| CommandOutcome::Applied),
            InvoiceAction::Cancel { invoice, request } => self
                .port
                .cancel_invoice(request.clone(), envelope(invoice))
                .await
                .map(|()| CommandOutcome::Applied),
            InvoiceAction::WithdrawPaymentRequest { payment_request } => self
                .port
                .withdraw_payment_request(envelope(payment_request))
                .await
                .map(|()| CommandOutcome::Applied),
            InvoiceAction::ShareWithCarrier { invoice, request } => self
                .port
                .share_with_carrier(request.clone(), envelope(invoice))
                .await
                .map(|()| CommandOutcome::Applied),
            InvoiceAction::ShareWithBookkeeper { invoice, request } => self
                .port
                .share_with_bookkeeper(request.clone(), envelope(invoice))
                .await
                .map(|()| CommandOutcome::Applied),
        }
    }

    async fn apply(&self, action: InvoiceAction) -> bool {
        self.submit(&Command::new(action)).await.is_some()
    }

    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> bool {
        self.apply(InvoiceAction::Create(request)).await
    }

    pub async fn request_payment(&self, invoice: &ContractId, request: RequestPaymentRequest) -> bool {
        self.apply(InvoiceAction::RequestPayment {
            invoice: invoice.clone(),
            request,
        })
        .await
    }

    /// The payment result, or `None` when the payment did not complete
    pub async fn complete_payment(
        &self,
        invoice: &ContractId,
        request: CompletePaymentRequest,
    ) -> Option<InvoicePaymentResult> {
        let command = Command::new(InvoiceAction::CompletePayment {
            invoice: invoice.clone(),
            request,
        });
        match self.submit(&command).await? {
            CommandOutcome::PaymentCompleted(result) => Some(result),
            CommandOutcome::Applied => None,
        }
    }

    pub async fn mark_paid(&self, invoice: &ContractId) -> bool {
        self.apply(InvoiceAction::MarkPaid {
            invoice: invoice.clone(),
        })
        .await
    }

    pub async fn cancel_invoice(&self, invoice: &ContractId, request: CancelRequest) -> bool {
        self.apply(InvoiceAction::Cancel {
            invoice: invoice.clone(),
            request,
        })
        .await
    }

    pub async fn withdraw_payment_request(&self, payment_request: &ContractId) -> bool {
        self.apply(InvoiceAction::WithdrawPaymentRequest {
            payment_request: payment_request.clone(),
        })
        .await
    }

    pub async fn share_with_carrier(&self, invoice: &ContractId, request: ShareWithCarrierRequest) -> bool {
        self.apply(InvoiceAction::ShareWithCarrier {
            invoice: invoice.clone(),
            request,
        })
        .await
    }

    pub async fn share_with_bookkeeper(
        &self,
        invoice: &ContractId,
        request: ShareWithBookkeeperRequest,
    ) -> bool {
        self.apply(InvoiceAction::ShareWithBookkeeper {
            invoice: invoice.clone(),
            request,
        })
        .await
    }
}

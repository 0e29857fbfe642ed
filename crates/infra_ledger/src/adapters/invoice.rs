use async_trait::async_trait;

use core_kernel::PortError;
use domain_invoice::{
    CancelRequest, CommandEnvelope, CompletePaymentRequest, CreateInvoiceRequest, Invoice,
    InvoicePaymentResult, InvoicePort, RequestPaymentRequest, ShareWithBookkeeperRequest,
    ShareWithCarrierRequest,
};

use super::{contract_path, HttpLedgerAdapter};

const INVOICES: &str = "/invoices";
const PAYMENT_REQUESTS: &str = "/invoice-payment-requests";

#[async_trait]
impl InvoicePort for HttpLedgerAdapter {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, PortError> {
        Ok(self.client.get(INVOICES).await?)
    }

    async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        Ok(self.client.command(INVOICES, Some(&request), &envelope).await?)
    }

    async fn request_payment(
        &self,
        request: RequestPaymentRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        let path = contract_path(INVOICES, &envelope, "request-payment")?;
        Ok(self.client.command(&path, Some(&request), &envelope).await?)
    }

    async fn complete_payment(
        &self,
        request: CompletePaymentRequest,
        envelope: CommandEnvelope,
    ) -> Result<InvoicePaymentResult, PortError> {
        let path = contract_path(INVOICES, &envelope, "complete-payment")?;
        Ok(self
            .client
            .command_with_result(&path, Some(&request), &envelope)
            .await?)
    }

    async fn mark_paid(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        let path = contract_path(INVOICES, &envelope, "mark-paid")?;
        Ok(self.client.command::<()>(&path, None, &envelope).await?)
    }

    async fn cancel_invoice(
        &self,
        request: CancelRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        let path = contract_path(INVOICES, &envelope, "cancel")?;
        Ok(self.client.command(&path, Some(&request), &envelope).await?)
    }

    async fn withdraw_payment_request(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        let path = contract_path(PAYMENT_REQUESTS, &envelope, "withdraw")?;
        Ok(self.client.command::<()>(&path, None, &envelope).await?)
    }

    async fn share_with_carrier(
        &self,
        request: ShareWithCarrierRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        let path = contract_path(INVOICES, &envelope, "share-with-carrier")?;
        Ok(self.client.command(&path, Some(&request), &envelope).await?)
    }

    async fn share_with_bookkeeper(
        &self,
        request: ShareWithBookkeeperRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        let path = contract_path(INVOICES, &envelope, "share-with-bookkeeper")?;
        Ok(self.client.command(&path, Some(&request), &envelope).await?)
    }
}

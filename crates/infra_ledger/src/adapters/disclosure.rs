use async_trait::async_trait;

use core_kernel::PortError;
use domain_invoice::{BookkeeperView, CommandEnvelope, DisclosurePort, LogisticsView};

use super::{contract_path, HttpLedgerAdapter};

const LOGISTICS_VIEWS: &str = "/logistics-views";
const BOOKKEEPER_VIEWS: &str = "/bookkeeper-views";

impl HttpLedgerAdapter {
    async fn view_command(
        &self,
        collection: &str,
        command: &str,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        let path = contract_path(collection, &envelope, command)?;
        Ok(self.client.command::<()>(&path, None, &envelope).await?)
    }
}

#[async_trait]
impl DisclosurePort for HttpLedgerAdapter {
    async fn list_logistics_views(&self) -> Result<Vec<LogisticsView>, PortError> {
        Ok(self.client.get(LOGISTICS_VIEWS).await?)
    }

    async fn acknowledge_logistics_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        self.view_command(LOGISTICS_VIEWS, "acknowledge", envelope).await
    }

    async fn revoke_logistics_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        self.view_command(LOGISTICS_VIEWS, "revoke", envelope).await
    }

    async fn list_bookkeeper_views(&self) -> Result<Vec<BookkeeperView>, PortError> {
        Ok(self.client.get(BOOKKEEPER_VIEWS).await?)
    }

    async fn acknowledge_bookkeeper_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        self.view_command(BOOKKEEPER_VIEWS, "acknowledge", envelope).await
    }

    async fn revoke_bookkeeper_view(&self, envelope: CommandEnvelope) -> Result<(), PortError> {
        self.view_command(BOOKKEEPER_VIEWS, "revoke", envelope).await
    }
}

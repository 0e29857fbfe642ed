use async_trait::async_trait;

use core_kernel::{PortError, TenantId};
use domain_invoice::{
    CommandEnvelope, FeatureFlags, TenantRegistration, TenantRegistrationPort,
    TenantRegistrationRequest,
};

use super::HttpLedgerAdapter;

const TENANT_REGISTRATIONS: &str = "/admin/tenant-registrations";

#[async_trait]
impl TenantRegistrationPort for HttpLedgerAdapter {
    async fn list_tenant_registrations(&self) -> Result<Vec<TenantRegistration>, PortError> {
        Ok(self.client.get(TENANT_REGISTRATIONS).await?)
    }

    async fn create_tenant_registration(
        &self,
        request: TenantRegistrationRequest,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        Ok(self
            .client
            .command(TENANT_REGISTRATIONS, Some(&request), &envelope)
            .await?)
    }

    async fn delete_tenant_registration(
        &self,
        tenant_id: &TenantId,
        envelope: CommandEnvelope,
    ) -> Result<(), PortError> {
        let path = format!("{}/{}", TENANT_REGISTRATIONS, tenant_id);
        Ok(self.client.delete(&path, &envelope).await?)
    }

    async fn feature_flags(&self) -> Result<FeatureFlags, PortError> {
        Ok(self.client.get("/feature-flags").await?)
    }
}

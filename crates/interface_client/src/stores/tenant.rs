//! Tenant registration store (admin only)

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use core_kernel::{PortError, TenantId};
use domain_invoice::{
    AuthMode, CommandEnvelope, FeatureFlags, TenantRegistration, TenantRegistrationForm,
    TenantRegistrationPort, TenantRegistrationRequest,
};

use super::Command;
use crate::cache::{SliceCache, Snapshot};
use crate::normalizer::Normalizer;

/// Mutations on tenant registrations
///
/// Deletes are addressed by tenant id; the command id travels alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantAction {
    Create(TenantRegistrationRequest),
    Delete(TenantId),
}

impl TenantAction {
    pub fn label(&self) -> &'static str {
        match self {
            TenantAction::Create(_) => "Creating Tenant Registration",
            TenantAction::Delete(_) => "Deleting Tenant Registration",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            TenantAction::Create(_) => "Tenant registration created successfully",
            TenantAction::Delete(_) => "Tenant registration deleted successfully",
        }
    }
}

/// Owns the tenant registrations and the backend feature flags
#[derive(Clone)]
pub struct TenantRegistrationStore {
    port: Arc<dyn TenantRegistrationPort>,
    normalizer: Normalizer,
    registrations: SliceCache<TenantRegistration>,
    flags: Arc<watch::Sender<Option<FeatureFlags>>>,
}

impl TenantRegistrationStore {
    pub fn new(port: Arc<dyn TenantRegistrationPort>, normalizer: Normalizer) -> Self {
        let (flags, _rx) = watch::channel(None);
        Self {
            port,
            normalizer,
            registrations: SliceCache::new(),
            flags: Arc::new(flags),
        }
    }

    pub fn registrations(&self) -> Snapshot<TenantRegistration> {
        self.registrations.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<TenantRegistration>> {
        self.registrations.subscribe()
    }

    /// Feature flags from the last successful fetch
    pub fn feature_flags(&self) -> Option<FeatureFlags> {
        self.flags.borrow().clone()
    }

    pub fn auth_mode(&self) -> Option<AuthMode> {
        self.flags.borrow().as_ref().map(|flags| flags.auth_mode)
    }

    pub async fn fetch_tenant_registrations(&self) -> Option<Snapshot<TenantRegistration>> {
        let registrations = self
            .normalizer
            .run("Fetching Tenant Registrations", self.port.list_tenant_registrations())
            .await?;
        debug!(count = registrations.len(), "Fetched tenant registrations");
        Some(self.registrations.replace(registrations))
    }

    pub async fn fetch_feature_flags(&self) -> Option<FeatureFlags> {
        match self.port.feature_flags().await {
            Ok(flags) => {
                debug!(auth_mode = ?flags.auth_mode, "Fetched feature flags");
                self.flags.send_replace(Some(flags.clone()));
                Some(flags)
            }
            Err(error) => {
                warn!(error = %error, "Failed to fetch feature flags");
                self.normalizer.notify_failure("Error fetching feature flags");
                None
            }
        }
    }

    /// Sends a command, then re-fetches and notifies on success
    pub async fn submit(&self, command: &Command<TenantAction>) -> bool {
        let action = &command.action;
        info!(action = action.label(), command_id = %command.id, "Submitting tenant command");

        if self
            .normalizer
            .run(action.label(), self.dispatch(command))
            .await
            .is_none()
        {
            return false;
        }

        self.fetch_tenant_registrations().await;
        self.normalizer.notify_success(action.success_message());
        true
    }

    async fn dispatch(&self, command: &Command<TenantAction>) -> Result<(), PortError> {
        match &command.action {
            TenantAction::Create(request) => {
                self.port
                    .create_tenant_registration(request.clone(), CommandEnvelope::create(command.id))
                    .await
            }
            TenantAction::Delete(tenant_id) => {
                self.port
                    .delete_tenant_registration(tenant_id, CommandEnvelope::unaddressed(command.id))
                    .await
            }
        }
    }

    pub async fn create_tenant_registration(&self, request: TenantRegistrationRequest) -> bool {
        self.submit(&Command::new(TenantAction::Create(request))).await
    }

    pub async fn delete_tenant_registration(&self, tenant_id: &TenantId) -> bool {
        self.submit(&Command::new(TenantAction::Delete(tenant_id.clone())))
            .await
    }

    /// Validates the form against the current auth mode and submits it
    ///
    /// A validation failure is shown as an error notification and nothing
    /// is sent.
    pub async fn submit_form(&self, form: &TenantRegistrationForm) -> bool {
        match form.validate_for(self.auth_mode()) {
            Ok(request) => self.create_tenant_registration(request).await,
            Err(error) => {
                debug!(error = %error, "Tenant registration form rejected");
                self.normalizer.notify_failure(error.to_string());
                false
            }
        }
    }
}

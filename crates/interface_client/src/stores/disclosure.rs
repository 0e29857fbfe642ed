//! Disclosure store
//!
//! Logistics and bookkeeper views are separate ledger records. Each kind
//! has its own cache, and a command on one kind only re-fetches that kind.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use core_kernel::{ContractId, PortError};
use domain_invoice::{BookkeeperView, CommandEnvelope, DisclosurePort, LogisticsView};

use super::Command;
use crate::cache::{SliceCache, Snapshot};
use crate::normalizer::Normalizer;

/// Mutations on disclosed views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisclosureAction {
    AcknowledgeLogistics(ContractId),
    RevokeLogistics(ContractId),
    AcknowledgeBookkeeper(ContractId),
    RevokeBookkeeper(ContractId),
}

impl DisclosureAction {
    pub fn label(&self) -> &'static str {
        match self {
            DisclosureAction::AcknowledgeLogistics(_) => "Acknowledging Logistics View",
            DisclosureAction::RevokeLogistics(_) => "Revoking Logistics View",
            DisclosureAction::AcknowledgeBookkeeper(_) => "Acknowledging Bookkeeper View",
            DisclosureAction::RevokeBookkeeper(_) => "Revoking Bookkeeper View",
        }
    }

    /// Revocations complete silently
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            DisclosureAction::AcknowledgeLogistics(_) => Some("Logistics view acknowledged"),
            DisclosureAction::AcknowledgeBookkeeper(_) => Some("Bookkeeper view acknowledged"),
            DisclosureAction::RevokeLogistics(_) | DisclosureAction::RevokeBookkeeper(_) => None,
        }
    }

    pub fn contract_id(&self) -> &ContractId {
        match self {
            DisclosureAction::AcknowledgeLogistics(id)
            | DisclosureAction::RevokeLogistics(id)
            | DisclosureAction::AcknowledgeBookkeeper(id)
            | DisclosureAction::RevokeBookkeeper(id) => id,
        }
    }

    fn is_logistics(&self) -> bool {
        matches!(
            self,
            DisclosureAction::AcknowledgeLogistics(_) | DisclosureAction::RevokeLogistics(_)
        )
    }
}

/// Owns the logistics and bookkeeper view collections
#[derive(Clone)]
pub struct DisclosureStore {
    port: Arc<dyn DisclosurePort>,
    normalizer: Normalizer,
    logistics: SliceCache<LogisticsView>,
    bookkeeper: SliceCache<BookkeeperView>,
}

impl DisclosureStore {
    pub fn new(port: Arc<dyn DisclosurePort>, normalizer: Normalizer) -> Self {
        Self {
            port,
            normalizer,
            logistics: SliceCache::new(),
            bookkeeper: SliceCache::new(),
        }
    }

    pub fn logistics_views(&self) -> Snapshot<LogisticsView> {
        self.logistics.snapshot()
    }

    pub fn bookkeeper_views(&self) -> Snapshot<BookkeeperView> {
        self.bookkeeper.snapshot()
    }

    pub fn subscribe_logistics(&self) -> watch::Receiver<Snapshot<LogisticsView>> {
        self.logistics.subscribe()
    }

    pub fn subscribe_bookkeeper(&self) -> watch::Receiver<Snapshot<BookkeeperView>> {
        self.bookkeeper.subscribe()
    }

    pub async fn fetch_logistics_views(&self) -> Option<Snapshot<LogisticsView>> {
        let views = self
            .normalizer
            .run("Fetching Logistics Views", self.port.list_logistics_views())
            .await?;
        debug!(count = views.len(), "Fetched logistics views");
        Some(self.logistics.replace(views))
    }

    pub async fn fetch_bookkeeper_views(&self) -> Option<Snapshot<BookkeeperView>> {
        let views = self
            .normalizer
            .run("Fetching Bookkeeper Views", self.port.list_bookkeeper_views())
            .await?;
        debug!(count = views.len(), "Fetched bookkeeper views");
        Some(self.bookkeeper.replace(views))
    }

    /// Sends a command, then re-fetches the affected view kind
    pub async fn submit(&self, command: &Command<DisclosureAction>) -> bool {
        let action = &command.action;
        info!(
            action = action.label(),
            command_id = %command.id,
            contract_id = %action.contract_id(),
            "Submitting disclosure command"
        );

        if self
            .normalizer
            .run(action.label(), self.dispatch(command))
            .await
            .is_none()
        {
            return false;
        }

        if action.is_logistics() {
            self.fetch_logistics_views().await;
        } else {
            self.fetch_bookkeeper_views().await;
        }
        if let Some(message) = action.success_message() {
            self.normalizer.notify_success(message);
        }
        true
    }

    async fn dispatch(&self, command: &Command<DisclosureAction>) -> Result<(), PortError> {
        let envelope = CommandEnvelope::on(command.action.contract_id().clone(), command.id);
        match &command.action {
            DisclosureAction::AcknowledgeLogistics(_) => {
                self.port.acknowledge_logistics_view(envelope).await
            }
            DisclosureAction::RevokeLogistics(_) => self.port.revoke_logistics_view(envelope).await,
            DisclosureAction::AcknowledgeBookkeeper(_) => {
                self.port.acknowledge_bookkeeper_view(envelope).await
            }
            DisclosureAction::RevokeBookkeeper(_) => self.port.revoke_bookkeeper_view(envelope).await,
        }
    }

    pub async fn acknowledge_logistics_view(&self, view: &ContractId) -> bool {
        self.submit(&Command::new(DisclosureAction::AcknowledgeLogistics(view.clone())))
            .await
    }

    pub async fn revoke_logistics_view(&self, view: &ContractId) -> bool {
        self.submit(&Command::new(DisclosureAction::RevokeLogistics(view.clone())))
            .await
    }

    pub async fn acknowledge_bookkeeper_view(&self, view: &ContractId) -> bool {
        self.submit(&Command::new(DisclosureAction::AcknowledgeBookkeeper(view.clone())))
            .await
    }

    pub async fn revoke_bookkeeper_view(&self, view: &ContractId) -> bool {
        self.submit(&Command::new(DisclosureAction::RevokeBookkeeper(view.clone())))
            .await
    }
}

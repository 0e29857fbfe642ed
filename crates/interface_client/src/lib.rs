//! Client Layer
//!
//! The command/state-synchronization layer between the role dashboards and
//! the ledger-backed API.
//!
//! # Architecture
//!
//! - **Notifications**: typed notifications, sinks, and the toast display
//! - **Normalizer**: turns every failure into one error notification
//! - **Stores**: server-mirrored slices with mutate-then-resync commands
//! - **Polling**: cancellable fixed-interval fetches
//! - **Dashboards**: role routing, mounting, and per-role summaries
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_client::{Client, ClientConfig};
//!
//! let client = Client::connect(&ClientConfig::from_env()?)?;
//! let dashboard = client.mount_for_session().await?;
//! ```

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod normalizer;
pub mod notification;
pub mod polling;
pub mod stores;

use std::sync::Arc;

use domain_invoice::{
    AuthenticatedUser, DisclosurePort, InvoicePort, PartyDirectory, Role, SessionPort,
    TenantRegistrationPort,
};
use infra_ledger::HttpLedgerAdapter;

pub use crate::config::ClientConfig;
pub use crate::dashboard::{route, Dashboard, DashboardSummary};
pub use crate::error::ClientError;
pub use crate::normalizer::Normalizer;
pub use crate::notification::{
    FanOut, Notification, NotificationKind, NotificationSink, ToastCenter, TracingSink,
};
pub use crate::polling::{PollHandle, Poller};
pub use crate::stores::{
    Command, CommandOutcome, DisclosureAction, DisclosureStore, InvoiceAction, InvoiceStore,
    TenantAction, TenantRegistrationStore,
};

/// The stores and collaborators one client session works with
///
/// Everything is owned here and handed to dashboards explicitly; there is
/// no process-wide state.
#[derive(Clone)]
pub struct Client {
    pub invoices: InvoiceStore,
    pub disclosures: DisclosureStore,
    pub tenants: TenantRegistrationStore,
    pub toasts: Arc<ToastCenter>,
    session: Arc<dyn SessionPort>,
    poller: Poller,
}

impl Client {
    /// Wires the stores to one adapter implementing every port
    pub fn new<P>(port: Arc<P>, config: &ClientConfig) -> Self
    where
        P: InvoicePort + DisclosurePort + TenantRegistrationPort + SessionPort,
    {
        let toasts = Arc::new(ToastCenter::new(config.toast_duration()));
        let sink = FanOut::new().with(toasts.clone()).with(Arc::new(TracingSink));
        let normalizer = Normalizer::new(Arc::new(sink)).with_repeat_window(config.repeat_failure_window());

        Self {
            invoices: InvoiceStore::new(port.clone(), normalizer.clone()),
            disclosures: DisclosureStore::new(port.clone(), normalizer.clone()),
            tenants: TenantRegistrationStore::new(port.clone(), normalizer),
            toasts,
            session: port,
            poller: Poller::new(config.poll_interval()),
        }
    }

    /// Builds the HTTP adapter from configuration and wires the stores
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let adapter = Arc::new(HttpLedgerAdapter::new(config.ledger())?);
        Ok(Self::new(adapter, config))
    }

    /// The authenticated user, if any
    pub async fn current_user(&self) -> Result<Option<AuthenticatedUser>, ClientError> {
        Ok(self.session.current_user().await?)
    }

    /// Configured party ids by role
    pub async fn parties(&self) -> Result<PartyDirectory, ClientError> {
        Ok(self.session.parties().await?)
    }

    /// Mounts the dashboard for `role`
    pub fn mount(&self, role: Role) -> Dashboard {
        Dashboard::mount(role, &self.invoices, &self.disclosures, &self.poller)
    }

    /// Routes the session to its dashboard and mounts it
    pub async fn mount_for_session(&self) -> Result<Dashboard, ClientError> {
        let user = self.current_user().await?;
        let role = route(user.as_ref()).ok_or(ClientError::NoSession)?;
        Ok(self.mount(role))
    }
}

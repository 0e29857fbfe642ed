//! Role dashboards
//!
//! The session decides the role; the role decides which store slice is
//! polled and which summary is derived from it. Summaries are recomputed
//! from the current snapshot on every call and never cached.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use domain_invoice::{
    AuthenticatedUser, BookkeeperSummary, BookkeeperView, BuyerSummary, CarrierSummary, Invoice,
    LogisticsView, ProviderSummary, Role, SellerSummary, SummaryCard,
};

use crate::cache::Snapshot;
use crate::polling::{PollHandle, Poller};
use crate::stores::{DisclosureStore, InvoiceStore};

/// The dashboard for the session, `None` when nobody is logged in
pub fn route(user: Option<&AuthenticatedUser>) -> Option<Role> {
    user.map(AuthenticatedUser::role)
}

/// Per-role aggregate of the polled slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum DashboardSummary {
    Provider(ProviderSummary),
    Seller(SellerSummary),
    Buyer(BuyerSummary),
    Carrier(CarrierSummary),
    Bookkeeper(BookkeeperSummary),
}

impl DashboardSummary {
    pub fn cards(&self) -> Vec<SummaryCard> {
        match self {
            DashboardSummary::Provider(summary) => summary.cards(),
            DashboardSummary::Seller(summary) => summary.cards(),
            DashboardSummary::Buyer(summary) => summary.cards(),
            DashboardSummary::Carrier(summary) => summary.cards(),
            DashboardSummary::Bookkeeper(summary) => summary.cards(),
        }
    }
}

enum Source {
    Invoices(watch::Receiver<Snapshot<Invoice>>),
    Logistics(watch::Receiver<Snapshot<LogisticsView>>),
    Bookkeeper(watch::Receiver<Snapshot<BookkeeperView>>),
}

/// A mounted dashboard: its poll and its view of the store
///
/// Dropping it unmounts the dashboard and cancels the poll.
pub struct Dashboard {
    role: Role,
    source: Source,
    poll: PollHandle,
}

impl Dashboard {
    /// Starts polling the slice `role` reads
    pub fn mount(role: Role, invoices: &InvoiceStore, disclosures: &DisclosureStore, poller: &Poller) -> Self {
        let (source, poll) = match role {
            Role::Provider | Role::Seller | Role::Buyer => {
                let store = invoices.clone();
                let poll = poller.spawn("invoices", move || {
                    let store = store.clone();
                    async move {
                        store.fetch_invoices().await;
                    }
                });
                (Source::Invoices(invoices.subscribe()), poll)
            }
            Role::Carrier => {
                let store = disclosures.clone();
                let poll = poller.spawn("logistics-views", move || {
                    let store = store.clone();
                    async move {
                        store.fetch_logistics_views().await;
                    }
                });
                (Source::Logistics(disclosures.subscribe_logistics()), poll)
            }
            Role::Bookkeeper => {
                let store = disclosures.clone();
                let poll = poller.spawn("bookkeeper-views", move || {
                    let store = store.clone();
                    async move {
                        store.fetch_bookkeeper_views().await;
                    }
                });
                (Source::Bookkeeper(disclosures.subscribe_bookkeeper()), poll)
            }
        };

        info!(role = %role, "Dashboard mounted");
        Self { role, source, poll }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Aggregates of the current snapshot
    pub fn summary(&self, now: DateTime<Utc>) -> DashboardSummary {
        match &self.source {
            Source::Invoices(rx) => {
                let invoices = rx.borrow().clone();
                match self.role {
                    Role::Provider => DashboardSummary::Provider(ProviderSummary::from_invoices(&invoices)),
                    Role::Buyer => DashboardSummary::Buyer(BuyerSummary::from_invoices(&invoices, now)),
                    _ => DashboardSummary::Seller(SellerSummary::from_invoices(&invoices)),
                }
            }
            Source::Logistics(rx) => {
                DashboardSummary::Carrier(CarrierSummary::from_views(&rx.borrow().clone()))
            }
            Source::Bookkeeper(rx) => {
                DashboardSummary::Bookkeeper(BookkeeperSummary::from_views(&rx.borrow().clone()))
            }
        }
    }

    /// Waits for the next replacement of the polled slice
    ///
    /// Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        let result = match &mut self.source {
            Source::Invoices(rx) => rx.changed().await,
            Source::Logistics(rx) => rx.changed().await,
            Source::Bookkeeper(rx) => rx.changed().await,
        };
        result.is_ok()
    }

    /// Stops the poll and waits for it to finish
    pub async fn unmount(self) {
        info!(role = %self.role, "Dashboard unmounted");
        self.poll.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PartyId;

    fn user(name: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            name: name.to_string(),
            party: PartyId::new(format!("{}::1220", name)),
            is_admin: false,
            wallet_url: None,
        }
    }

    #[test]
    fn test_route_by_session_name() {
        assert_eq!(route(None), None);
        assert_eq!(route(Some(&user("app-provider"))), Some(Role::Provider));
        assert_eq!(route(Some(&user("logistics"))), Some(Role::Carrier));
        assert_eq!(route(Some(&user("finance"))), Some(Role::Bookkeeper));
        assert_eq!(route(Some(&user("auditor"))), Some(Role::Seller));
    }

    #[test]
    fn test_summary_cards_follow_role() {
        let summary = DashboardSummary::Carrier(CarrierSummary::default());
        assert_eq!(summary.cards().len(), 2);
    }
}

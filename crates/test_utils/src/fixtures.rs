//! Pre-built Test Fixtures
//!
//! Provides fixed parties, session users and timestamps. Every party shares
//! the fingerprint `1220ab`, so derived share targets line up.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{ContractId, PartyId};
use domain_invoice::{AuthenticatedUser, PartyDirectory};

/// Fixture for ledger parties
pub struct PartyFixtures;

impl PartyFixtures {
    pub fn seller() -> PartyId {
        PartyId::new("seller::1220ab")
    }

    pub fn buyer() -> PartyId {
        PartyId::new("buyer::1220ab")
    }

    pub fn carrier() -> PartyId {
        PartyId::new("logistics::1220ab")
    }

    pub fn bookkeeper() -> PartyId {
        PartyId::new("finance::1220ab")
    }

    pub fn provider() -> PartyId {
        PartyId::new("app-provider::1220ab")
    }

    /// The `/parties` response for a fully configured deployment
    pub fn directory() -> PartyDirectory {
        PartyDirectory::new()
            .with("seller", Self::seller())
            .with("buyer", Self::buyer())
            .with("logistics", Self::carrier())
            .with("finance", Self::bookkeeper())
    }
}

/// Fixture for session users
pub struct UserFixtures;

impl UserFixtures {
    fn user(name: &str, party: PartyId) -> AuthenticatedUser {
        AuthenticatedUser {
            name: name.to_string(),
            party,
            is_admin: false,
            wallet_url: None,
        }
    }

    pub fn seller() -> AuthenticatedUser {
        Self::user("seller", PartyFixtures::seller())
    }

    /// Buyer with a wallet link for paying
    pub fn buyer() -> AuthenticatedUser {
        AuthenticatedUser {
            wallet_url: Some("https://wallet.localhost/buyer".to_string()),
            ..Self::user("buyer", PartyFixtures::buyer())
        }
    }

    pub fn carrier() -> AuthenticatedUser {
        Self::user("logistics", PartyFixtures::carrier())
    }

    pub fn bookkeeper() -> AuthenticatedUser {
        Self::user("finance", PartyFixtures::bookkeeper())
    }

    /// App provider with admin rights
    pub fn provider() -> AuthenticatedUser {
        AuthenticatedUser {
            is_admin: true,
            ..Self::user("app-provider", PartyFixtures::provider())
        }
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The reference "now" (Jan 1, 2024)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Inside the due-soon window (Jan 5, 2024)
    pub fn due_soon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
    }

    /// Past the due-soon window (Jan 10, 2024)
    pub fn due_later() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    /// Before `now`
    pub fn overdue() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 20, 0, 0, 0).unwrap()
    }
}

/// Fixture for contract ids
pub struct IdFixtures;

impl IdFixtures {
    pub fn invoice(n: u32) -> ContractId {
        ContractId::new(format!("00invoice{:04}", n))
    }

    pub fn logistics_view(n: u32) -> ContractId {
        ContractId::new(format!("00logistics{:04}", n))
    }

    pub fn bookkeeper_view(n: u32) -> ContractId {
        ContractId::new(format!("00bookkeeper{:04}", n))
    }
}

//! Session identity and role routing
//!
//! The session is owned by an external collaborator; the client only reads
//! the authenticated identity to decide which dashboard to show and which
//! party the user acts as.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use core_kernel::PartyId;

/// The authenticated user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Role key, e.g. `seller`
    pub name: String,
    pub party: PartyId,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub wallet_url: Option<String>,
}

impl AuthenticatedUser {
    /// The dashboard role this user is routed to
    pub fn role(&self) -> Role {
        Role::from_session_name(&self.name)
    }
}

/// The five dashboard roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Provider,
    Seller,
    Buyer,
    Carrier,
    Bookkeeper,
}

impl Role {
    /// Routes a session role key to a role
    ///
    /// Unknown keys fall back to [`Role::Seller`].
    pub fn from_session_name(name: &str) -> Self {
        match name {
            "app-provider" => Role::Provider,
            "seller" => Role::Seller,
            "buyer" => Role::Buyer,
            "logistics" => Role::Carrier,
            "finance" => Role::Bookkeeper,
            _ => Role::Seller,
        }
    }

    /// The session role key for this role
    pub fn session_name(&self) -> &'static str {
        match self {
            Role::Provider => "app-provider",
            Role::Seller => "seller",
            Role::Buyer => "buyer",
            Role::Carrier => "logistics",
            Role::Bookkeeper => "finance",
        }
    }

    /// Dashboard title
    pub fn title(&self) -> &'static str {
        match self {
            Role::Provider => "Provider Dashboard",
            Role::Seller => "Seller Dashboard",
            Role::Buyer => "Buyer Dashboard",
            Role::Carrier => "Carrier Dashboard",
            Role::Bookkeeper => "Bookkeeper Dashboard",
        }
    }

    /// Whether the role reads full invoices rather than a disclosed view
    pub fn reads_invoices(&self) -> bool {
        matches!(self, Role::Provider | Role::Seller | Role::Buyer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.session_name())
    }
}

/// Configured party ids keyed by role name (`seller`, `buyer`, `logistics`, `finance`)
///
/// Unconfigured roles are reported as empty strings and treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyDirectory(BTreeMap<String, PartyId>);

impl PartyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: impl Into<String>, party: impl Into<PartyId>) -> Self {
        self.0.insert(role.into(), party.into());
        self
    }

    /// The configured party for a role name
    pub fn get(&self, role: &str) -> Option<&PartyId> {
        self.0.get(role).filter(|party| !party.is_empty())
    }

    pub fn buyer(&self) -> Option<&PartyId> {
        self.get("buyer")
    }
}

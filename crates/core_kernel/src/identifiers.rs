//! Strongly-typed identifiers for ledger records and commands
//!
//! Ledger-assigned keys (contract ids, party ids, tenant ids) are opaque
//! strings: the client never parses them except where the party format is
//! documented (`<hint>::<fingerprint>`). Command identifiers are generated
//! locally and are the idempotency key of every mutating request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_opaque_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a server-assigned key
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the raw key
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the key is empty
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Human-readable kind of record this key identifies
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_opaque_id!(ContractId, "contract");
define_opaque_id!(TenantId, "tenant");
define_opaque_id!(PartyId, "party");

impl PartyId {
    /// Returns the display hint before `::`
    pub fn hint(&self) -> &str {
        self.0.split("::").next().unwrap_or_default()
    }

    /// Returns the participant fingerprint after `::`, if present
    pub fn fingerprint(&self) -> Option<&str> {
        self.0
            .split_once("::")
            .map(|(_, fingerprint)| fingerprint)
            .filter(|fingerprint| !fingerprint.is_empty())
    }

    /// Builds a party id on the same participant with a different hint
    pub fn sibling(&self, hint: &str) -> Option<PartyId> {
        self.fingerprint()
            .map(|fingerprint| PartyId(format!("{}::{}", hint, fingerprint)))
    }
}

/// Idempotency key for a single mutating request
///
/// A fresh id must be generated for every independent user action; replaying
/// a request with the same id is treated by the ledger as the same command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(Uuid);

impl CommandId {
    /// Generates a fresh random identifier
    ///
    /// Never blocks and needs no network access.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommandId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for CommandId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<CommandId> for Uuid {
    fn from(id: CommandId) -> Uuid {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_id_round_trips_through_display() {
        let original = CommandId::new();
        let parsed: CommandId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_party_fingerprint() {
        let party = PartyId::new("seller::1220abcd");
        assert_eq!(party.hint(), "seller");
        assert_eq!(party.fingerprint(), Some("1220abcd"));
        assert_eq!(party.sibling("logistics"), Some(PartyId::new("logistics::1220abcd")));
    }

    #[test]
    fn test_party_without_fingerprint() {
        let party = PartyId::new("seller");
        assert_eq!(party.fingerprint(), None);
        assert_eq!(party.sibling("finance"), None);

        let trailing = PartyId::new("seller::");
        assert_eq!(trailing.fingerprint(), None);
    }
}

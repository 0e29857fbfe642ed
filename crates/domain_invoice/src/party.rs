//! Party details printed on an invoice

use serde::{Deserialize, Serialize};

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// One-line rendering, skipping empty parts
    pub fn single_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.postal_code, &self.country]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Contact person
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Legal details of the seller or buyer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyInfo {
    pub party_name: String,
    pub reg_number: String,
    pub tax_number: String,
    pub address: Address,
    pub contact: Contact,
}

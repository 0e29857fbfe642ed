//! Core Kernel - Foundational types for the invoicing client
//!
//! This crate provides the building blocks shared by every other crate:
//! - Ledger identifiers and the command identifier generator
//! - Amount, rate, and currency display helpers on top of `rust_decimal`
//! - The port error taxonomy used by all adapters

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{CurrencyCode, Rate, format_amount, format_currency, round_for_display};
pub use identifiers::{CommandId, ContractId, PartyId, TenantId};
pub use error::CoreError;
pub use ports::{PortError, DomainPort};

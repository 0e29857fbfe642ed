//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! invoicing client test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed parties, users, and timestamps
//! - `builders`: Builder patterns for invoices and disclosed views
//! - `assertions`: Assertion helpers for amounts and summary cards
//! - `generators`: Property-based test data generators
//!
//! The in-memory ledger is `domain_invoice::MockLedger`; it is re-exported
//! here so tests need a single import.

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

pub use domain_invoice::MockLedger;

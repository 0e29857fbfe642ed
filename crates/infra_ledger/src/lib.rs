//! Ledger Infrastructure
//!
//! HTTP adapter connecting the invoice ports to the ledger-backed REST
//! API. Nothing above this crate knows about URLs, status codes or JSON
//! bodies; everything leaves here as domain types or a `PortError`.

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;

pub use adapters::HttpLedgerAdapter;
pub use client::LedgerClient;
pub use config::HttpLedgerConfig;
pub use error::LedgerError;

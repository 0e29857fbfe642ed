//! Client error handling

use thiserror::Error;

use core_kernel::{CoreError, PortError};
use infra_ledger::LedgerError;

/// Errors surfaced to the binary
///
/// Store operations never return these; their failures become
/// notifications. Only start-up (configuration, adapter, session) can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Ledger adapter error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Session error: {0}")]
    Session(#[from] PortError),

    #[error("No authenticated session")]
    NoSession,
}

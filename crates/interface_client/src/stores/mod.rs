//! Resource stores
//!
//! Each store owns one or more [`SliceCache`](crate::cache::SliceCache)s
//! mirroring server collections. Mutations follow one flow:
//!
//! 1. send the command with its command id
//! 2. on success, re-fetch the affected collection
//! 3. on success, publish the success notification (if the action has one)
//!
//! A failed command leaves the cache untouched and never triggers a
//! re-fetch. Nothing is patched locally.
//!
//! # Idempotency
//!
//! A [`Command`] owns its [`CommandId`]. Submitting the same command value
//! twice replays the id and the ledger applies it once; the per-action
//! helpers build a new command, and therefore a new id, on every call.

mod disclosure;
mod invoice;
mod tenant;

pub use disclosure::{DisclosureAction, DisclosureStore};
pub use invoice::{CommandOutcome, InvoiceAction, InvoiceStore};
pub use tenant::{TenantAction, TenantRegistrationStore};

use core_kernel::CommandId;

/// One logical user action and its idempotency key
#[derive(Debug, Clone, PartialEq)]
pub struct Command<A> {
    pub id: CommandId,
    pub action: A,
}

impl<A> Command<A> {
    /// Wraps an action with a freshly generated id
    pub fn new(action: A) -> Self {
        Self {
            id: CommandId::new(),
            action,
        }
    }

    /// Wraps an action with a caller-chosen id
    pub fn with_id(id: CommandId, action: A) -> Self {
        Self { id, action }
    }
}

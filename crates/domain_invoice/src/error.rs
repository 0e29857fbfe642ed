//! Invoice domain errors
//!
//! Client-side validation failures for drafts and tenant registrations.
//! Server rejections arrive as [`core_kernel::PortError`] instead.

use thiserror::Error;

/// Errors raised before a command is sent to the ledger
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    /// A required form field is empty
    #[error("{0}")]
    MissingField(String),

    /// A line item index does not exist in the draft
    #[error("Line item {index} does not exist (draft has {len})")]
    LineItemOutOfRange { index: usize, len: usize },

    /// The draft has no seller or buyer party
    #[error("Invoice draft is incomplete: {0}")]
    IncompleteDraft(String),

    /// A computed amount does not fit in a `Decimal`
    #[error("Line item {line} amounts are too large to compute")]
    LineAmountOverflow { line: usize },

    /// The line amounts fit but their sum does not
    #[error("Invoice totals are too large to compute")]
    TotalOverflow,

    /// Field-level validation failed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl InvoiceError {
    pub fn missing(message: impl Into<String>) -> Self {
        InvoiceError::MissingField(message.into())
    }
}

impl From<validator::ValidationErrors> for InvoiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        InvoiceError::ValidationFailed(errors.to_string())
    }
}

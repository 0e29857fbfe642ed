//! Invoice Domain
//!
//! Everything the client knows about invoices without talking to the
//! network: line item arithmetic, the server-confirmed invoice and its
//! privacy-scoped views, tenant registrations, the seller's draft, the
//! per-role dashboard projections, and the ports the stores call.
//!
//! # Privacy-scoped views
//!
//! One ledger invoice is seen five ways:
//!
//! - **Provider / Seller / Buyer**: the full [`Invoice`]
//! - **Carrier**: a [`LogisticsView`] with shipping data and no prices
//! - **Bookkeeper**: a [`BookkeeperView`] with financials and no line items
//!
//! Views are separate ledger records with their own contract ids and are
//! never derived from an `Invoice` on the client.
//!
//! # Examples
//!
//! ```rust
//! use domain_invoice::{invoice_totals, LineItem};
//! use rust_decimal_macros::dec;
//!
//! let items = vec![
//!     LineItem::new("Industrial Widget A", "WDG-A", 10, dec!(25)).with_tax_rate(dec!(8)),
//!     LineItem::new("Premium Component B", "CMP-B", 5, dec!(45))
//!         .with_discount(dec!(10))
//!         .with_tax_rate(dec!(8)),
//! ];
//!
//! let totals = invoice_totals(&items)?;
//! assert_eq!(totals.grand_total, dec!(502.2));
//! # Ok::<(), domain_invoice::InvoiceError>(())
//! ```

pub mod calculator;
pub mod dashboards;
pub mod disclosure;
pub mod draft;
pub mod error;
pub mod invoice;
pub mod line_item;
pub mod party;
pub mod ports;
pub mod session;
pub mod tenant;

pub use calculator::{invoice_totals, line_totals, InvoiceTotals, LineTotals};
pub use dashboards::{
    buyer_rows, cancel_reason, seller_actions, BookkeeperSummary, BuyerRow, BuyerSummary,
    CarrierSummary, ProviderSummary, SellerAction, SellerSummary, ShareTargets, SummaryCard,
    DEFAULT_CANCEL_REASON,
};
pub use disclosure::{BookkeeperView, LogisticsItem, LogisticsView};
pub use draft::{DraftStep, InvoiceDraft};
pub use error::InvoiceError;
pub use invoice::{
    CancelRequest, CompletePaymentRequest, CreateInvoiceRequest, Invoice, InvoicePaymentResult,
    InvoiceStatus, PaymentRequest, RequestPaymentRequest, ShareWithBookkeeperRequest,
    ShareWithCarrierRequest, TaxEntry,
};
pub use line_item::LineItem;
pub use party::{Address, Contact, PartyInfo};
pub use ports::{CommandEnvelope, DisclosurePort, InvoicePort, SessionPort, TenantRegistrationPort};
pub use session::{AuthenticatedUser, PartyDirectory, Role};
pub use tenant::{
    parse_users, AuthMode, FeatureFlags, TenantRegistration, TenantRegistrationForm,
    TenantRegistrationRequest,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLedger;

//! Financial calculator
//!
//! Pure functions from an ordered sequence of line items to invoice totals.
//! Nothing is cached: callers recompute on every edit.
//!
//! ```text
//! subtotal       = Σ quantity * unit_price
//! total_discount = Σ discount
//! total_tax      = Σ (quantity * unit_price - discount) * tax_rate / 100
//! grand_total    = subtotal - total_discount + total_tax
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvoiceError;
use crate::line_item::LineItem;

/// Computed amounts for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub after_discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Aggregate amounts for a whole invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub total_tax: Decimal,
    pub grand_total: Decimal,
}

/// Computes the amounts for one line, or `None` if any step overflows
pub fn line_totals(item: &LineItem) -> Option<LineTotals> {
    Some(LineTotals {
        subtotal: item.line_subtotal()?,
        discount: item.discount,
        after_discount: item.line_after_discount()?,
        tax: item.line_tax()?,
        total: item.line_total()?,
    })
}

/// Computes invoice totals for an ordered sequence of line items
///
/// No rounding is applied; round only when displaying. Amounts too large
/// for a `Decimal` are reported instead of panicking.
pub fn invoice_totals<'a, I>(items: I) -> Result<InvoiceTotals, InvoiceError>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut subtotal = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;

    for (line, item) in items.into_iter().enumerate() {
        let overflow = || InvoiceError::LineAmountOverflow { line };
        let line_subtotal = item.line_subtotal().ok_or_else(overflow)?;
        let line_tax = item.line_tax().ok_or_else(overflow)?;

        subtotal = subtotal
            .checked_add(line_subtotal)
            .ok_or(InvoiceError::TotalOverflow)?;
        total_discount = total_discount
            .checked_add(item.discount)
            .ok_or(InvoiceError::TotalOverflow)?;
        total_tax = total_tax
            .checked_add(line_tax)
            .ok_or(InvoiceError::TotalOverflow)?;
    }

    let grand_total = subtotal
        .checked_sub(total_discount)
        .and_then(|amount| amount.checked_add(total_tax))
        .ok_or(InvoiceError::TotalOverflow)?;

    Ok(InvoiceTotals {
        subtotal,
        total_discount,
        total_tax,
        grand_total,
    })
}

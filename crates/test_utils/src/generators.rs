//! Property-Based Test Generators
//!
//! Provides proptest strategies for line items and invoices. Amounts are
//! non-negative with up to four fractional digits, as entered in forms.

use chrono::Duration;
use domain_invoice::{Invoice, InvoiceStatus, LineItem};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::InvoiceBuilder;
use crate::fixtures::TemporalFixtures;

/// Strategy for non-negative unit prices (0.0000 to 100000.0000)
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for non-negative absolute discounts (0.00 to 10000.00)
pub fn discount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for tax rate percentages (0.00 to 100.00)
pub fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for quantities
pub fn quantity_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000i64
}

/// Strategy for a line item with non-negative fields
pub fn line_item_strategy() -> impl Strategy<Value = LineItem> {
    (
        "[A-Z]{3}-[0-9]{2}",
        quantity_strategy(),
        price_strategy(),
        discount_strategy(),
        tax_rate_strategy(),
    )
        .prop_map(|(sku, quantity, price, discount, tax_rate)| {
            LineItem::new(format!("Item {}", sku), sku, quantity, price)
                .with_discount(discount)
                .with_tax_rate(tax_rate)
        })
}

/// Strategy for an ordered sequence of line items
pub fn line_items_strategy(max: usize) -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item_strategy(), 0..=max)
}

/// Strategy for invoice statuses
pub fn status_strategy() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Issued),
        Just(InvoiceStatus::PartiallyPaid),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Void),
    ]
}

/// Strategy for invoices due within 60 days either side of the reference now
pub fn invoice_strategy() -> impl Strategy<Value = Invoice> {
    (1u32..10_000u32, status_strategy(), -60i64..60i64, line_items_strategy(3)).prop_map(
        |(n, status, due_in_days, items)| {
            InvoiceBuilder::new()
                .numbered(n)
                .with_status(status)
                .with_due_date(TemporalFixtures::now() + Duration::days(due_in_days))
                .with_line_items(items)
                .build()
        },
    )
}

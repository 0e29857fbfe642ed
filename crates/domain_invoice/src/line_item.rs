//! Invoice line items
//!
//! A line item is priced by quantity and unit price, reduced by an absolute
//! discount, and taxed at a percentage rate. The per-line arithmetic lives on
//! the type; aggregation across lines lives in [`crate::calculator`].
//!
//! Every step is checked: a result that does not fit in a `Decimal` is
//! `None` rather than a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Rate;

/// Default unit of measure for new line items ("each")
pub const DEFAULT_UNIT_OF_MEASURE: &str = "EA";

/// A single line on an invoice
///
/// Negative quantities or prices are not rejected here; validation is the
/// caller's concern. A discount larger than the line subtotal is likewise
/// accepted and yields a negative line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_of_measure: String,
    pub unit_price: Decimal,
    /// Absolute currency amount, not a percentage
    pub discount: Decimal,
    /// Percentage, e.g. `8` for 8%
    pub tax_rate: Decimal,
    /// Server-computed subtotal, present on confirmed invoices only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_subtotal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            item_name: String::new(),
            sku: String::new(),
            quantity: 1,
            unit_of_measure: DEFAULT_UNIT_OF_MEASURE.to_string(),
            unit_price: Decimal::ZERO,
            discount: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            line_subtotal: None,
            batch_info: None,
            delivery_date: None,
        }
    }
}

impl LineItem {
    /// Creates a line item with the given name, sku, quantity and unit price
    pub fn new(
        item_name: impl Into<String>,
        sku: impl Into<String>,
        quantity: i64,
        unit_price: Decimal,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            sku: sku.into(),
            quantity,
            unit_price,
            ..Default::default()
        }
    }

    /// Sets an absolute discount
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    /// Sets the tax rate as a percentage
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Sets the unit of measure
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = unit.into();
        self
    }

    /// `quantity * unit_price`
    pub fn line_subtotal(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }

    /// `line_subtotal - discount`
    pub fn line_after_discount(&self) -> Option<Decimal> {
        self.line_subtotal()?.checked_sub(self.discount)
    }

    /// `line_after_discount * tax_rate / 100`
    pub fn line_tax(&self) -> Option<Decimal> {
        Rate::from_percentage(self.tax_rate).apply(self.line_after_discount()?)
    }

    /// `line_after_discount + line_tax`
    pub fn line_total(&self) -> Option<Decimal> {
        self.line_after_discount()?.checked_add(self.line_tax()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sample_line() {
        let item = LineItem::new("Industrial Widget A", "WDG-A", 10, dec!(25)).with_tax_rate(dec!(8));
        assert_eq!(item.line_subtotal(), Some(dec!(250)));
        assert_eq!(item.line_tax(), Some(dec!(20)));
        assert_eq!(item.line_total(), Some(dec!(270)));
    }

    #[test]
    fn test_discount_is_absolute() {
        let item = LineItem::new("Premium Component B", "CMP-B", 5, dec!(45))
            .with_discount(dec!(10))
            .with_tax_rate(dec!(8));
        assert_eq!(item.line_after_discount(), Some(dec!(215)));
        assert_eq!(item.line_tax(), Some(dec!(17.2)));
        assert_eq!(item.line_total(), Some(dec!(232.2)));
    }

    #[test]
    fn test_default_line() {
        let item = LineItem::default();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_of_measure, "EA");
        assert_eq!(item.line_total(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_oversized_line_has_no_subtotal() {
        let item = LineItem::new("Bulk", "B", 1_000_000_000_000_000, dec!(1000000000000000));
        assert_eq!(item.line_subtotal(), None);
        assert_eq!(item.line_total(), None);

        let item = LineItem::new("Bulk", "B", 1, Decimal::MAX).with_tax_rate(dec!(200));
        assert_eq!(item.line_subtotal(), Some(Decimal::MAX));
        assert_eq!(item.line_tax(), None);
    }

    #[test]
    fn test_wire_shape() {
        let item = LineItem::new("Widget", "W-1", 2, dec!(3.5));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["itemName"], "Widget");
        assert_eq!(json["unitOfMeasure"], "EA");
        assert!(json.get("lineSubtotal").is_none());
    }
}

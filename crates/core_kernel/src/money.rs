//! Amounts, rates, and currency display
//!
//! Amounts are plain `rust_decimal::Decimal` values in currency units. No
//! rounding is applied while computing; rounding to the currency's fraction
//! digits happens only when an amount is formatted for display.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits shown for every displayed amount
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Free-form currency code as carried by ledger instruments (e.g. `CC`, `USD`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    /// Canton Coin, the default instrument for new drafts
    fn default() -> Self {
        Self("CC".to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A percentage rate such as a line item's tax rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.08 for 8%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.08 for 8%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 8 for 8%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to an amount, without rounding
    ///
    /// Returns `None` if the product does not fit in a `Decimal`.
    pub fn apply(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4).normalize())
    }
}

/// Rounds an amount for display (half away from zero)
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with thousands separators and exactly two fraction digits
///
/// `1234.5` becomes `1,234.50`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    let fixed = format!("{:.dp$}", rounded.abs(), dp = DISPLAY_DECIMAL_PLACES as usize);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Formats an amount as a dollar figure, e.g. `$1,234.50`
pub fn format_currency(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(1234.5)), "1,234.50");
        assert_eq!(format_amount(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_amount(dec!(999)), "999.00");
        assert_eq!(format_amount(dec!(0)), "0.00");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(-0.125)), "-0.13");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(270)), "$270.00");
        assert_eq!(format_currency(dec!(-5)), "$-5.00");
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(8));
        assert_eq!(rate.apply(dec!(250)), Some(dec!(20)));
        assert_eq!(Rate::from_percentage(dec!(200)).apply(Decimal::MAX), None);
        assert_eq!(rate.to_string(), "8%");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn formatted_amount_always_has_two_fraction_digits(minor in -1_000_000_000i64..1_000_000_000i64) {
            let formatted = format_amount(Decimal::new(minor, 3));
            let (_, fraction) = formatted.split_once('.').unwrap();
            prop_assert_eq!(fraction.len(), 2);
        }
    }
}

//! Custom Test Assertions
//!
//! Provides assertion helpers for amounts, summary cards and contract id
//! sets that give more meaningful failure messages than `assert_eq!`.

use core_kernel::ContractId;
use domain_invoice::SummaryCard;
use rust_decimal::Decimal;

/// Asserts that two amounts are equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than `tolerance`
pub fn assert_amount_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that the card titled `title` shows `value`
///
/// # Panics
///
/// Panics if no card has that title or its value differs
pub fn assert_card(cards: &[SummaryCard], title: &str, value: &str) {
    let card = cards.iter().find(|card| card.title == title).unwrap_or_else(|| {
        let titles: Vec<&str> = cards.iter().map(|card| card.title).collect();
        panic!("No card titled {:?}; cards are {:?}", title, titles)
    });
    assert_eq!(card.value, value, "Card {:?} shows {:?}, expected {:?}", title, card.value, value);
}

/// Asserts that two collections hold the same contract ids, ignoring order
pub fn assert_same_contracts<'a>(
    actual: impl IntoIterator<Item = &'a ContractId>,
    expected: impl IntoIterator<Item = &'a ContractId>,
) {
    let mut actual: Vec<&str> = actual.into_iter().map(ContractId::as_str).collect();
    let mut expected: Vec<&str> = expected.into_iter().map(ContractId::as_str).collect();
    actual.sort_unstable();
    expected.sort_unstable();
    assert_eq!(actual, expected, "Contract id sets differ");
}

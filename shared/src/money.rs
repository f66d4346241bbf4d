//! Money conversions
//!
//! Amounts travel through the API as `Decimal` and are stored as integer
//! cents, so that line subtotals and purchase totals are exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert an amount to integer cents, rounding half away from zero.
///
/// Returns `None` when the amount does not fit in an `i64` number of cents.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.checked_mul(Decimal::from(100))?.to_i64()
}

/// Convert integer cents back to a two-decimal amount
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

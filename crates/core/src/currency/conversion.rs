//! Amount conversion and rounding.
//!
//! Report amounts are converted one ledger figure at a time and rounded to
//! the target currency's decimal places with banker's rounding (round half
//! to even), so sums of converted figures do not drift in one direction.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Multiplies `amount` by `rate` and rounds to `decimal_places`.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    round_amount(amount * rate, decimal_places)
}

/// Rounds `value` to `decimal_places`, half to even.
#[must_use]
pub fn round_amount(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

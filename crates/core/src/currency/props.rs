//! Property-based tests for currency operations.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{convert_amount, round_amount};
use super::format::AmountFormatter;
use super::types::Currency;

/// Strategy to generate signed decimal amounts (-1,000,000.00 to 1,000,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Conversion never carries more decimals than requested.
    #[test]
    fn prop_convert_respects_decimal_places(
        amount in signed_amount(),
        rate in positive_rate(),
        decimal_places in 0u32..=4,
    ) {
        let result = convert_amount(amount, rate, decimal_places);
        prop_assert_eq!(result, round_amount(result, decimal_places));
    }

    /// Conversion is odd: converting the negation negates the result.
    #[test]
    fn prop_convert_is_sign_symmetric(
        amount in signed_amount(),
        rate in positive_rate(),
    ) {
        prop_assert_eq!(
            convert_amount(-amount, rate, 2),
            -convert_amount(amount, rate, 2)
        );
    }

    /// Stripping the symbol and separators from a formatted amount gives
    /// back the rounded value.
    #[test]
    fn prop_format_round_trips_value(amount in signed_amount()) {
        let currency = Currency::new("USD", "$");
        let text = AmountFormatter::new(&currency).format(amount, false);
        let digits: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        let parsed: Decimal = digits.parse().unwrap();
        prop_assert_eq!(parsed, round_amount(amount, 2));
    }
}

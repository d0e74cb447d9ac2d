//! Amount formatting for report columns.
//!
//! Uses the en locale ('.' as decimal mark, ',' thousands separator)
//! regardless of the currency.

use num_format::{Locale, ToFormattedString as _};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::conversion::round_amount;
use super::types::{Currency, SymbolPosition};

/// Formats amounts in a given currency.
#[derive(Debug, Clone, Copy)]
pub struct AmountFormatter<'a> {
    currency: &'a Currency,
}

impl<'a> AmountFormatter<'a> {
    /// Creates a formatter for `currency`.
    #[must_use]
    pub const fn new(currency: &'a Currency) -> Self {
        Self { currency }
    }

    /// Formats `value` with the currency symbol, its decimal places, and
    /// thousands separators. Returns an empty string for zero when
    /// `blank_if_zero` is set.
    #[must_use]
    pub fn format(&self, value: Decimal, blank_if_zero: bool) -> String {
        let decimal_places = self.currency.decimal_places;
        let rounded = round_amount(value, decimal_places);
        if blank_if_zero && rounded.is_zero() {
            return String::new();
        }

        let abs = rounded.abs();
        let integer = abs
            .trunc()
            .to_u128()
            .unwrap_or_default()
            .to_formatted_string(&Locale::en);
        let precision = decimal_places as usize;
        let digits = format!("{abs:.precision$}");
        let number = match digits.split_once('.') {
            Some((_, fraction)) => format!("{integer}.{fraction}"),
            None => integer,
        };
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        match self.currency.position {
            SymbolPosition::Before => format!("{sign}{} {number}", self.currency.symbol),
            SymbolPosition::After => format!("{sign}{number} {}", self.currency.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn usd() -> Currency {
        Currency::new("USD", "$")
    }

    #[rstest]
    #[case(dec!(1234567.891), "$ 1,234,567.89")]
    #[case(dec!(-42.5), "-$ 42.50")]
    #[case(dec!(0), "$ 0.00")]
    #[case(dec!(999.995), "$ 1,000.00")]
    fn test_format_usd(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(AmountFormatter::new(&usd()).format(value, false), expected);
    }

    #[test]
    fn test_format_trailing_symbol_without_decimals() {
        let jpy = Currency::new("JPY", "¥")
            .with_decimal_places(0)
            .with_position(SymbolPosition::After);
        assert_eq!(
            AmountFormatter::new(&jpy).format(dec!(1500000.4), false),
            "1,500,000 ¥"
        );
    }

    #[test]
    fn test_blank_if_zero() {
        let currency = usd();
        let formatter = AmountFormatter::new(&currency);
        assert_eq!(formatter.format(dec!(0.001), true), "");
        assert_eq!(formatter.format(dec!(0.01), true), "$ 0.01");
    }
}

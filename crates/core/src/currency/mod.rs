//! Currencies, exchange rates, and amount formatting.

pub mod conversion;
pub mod exchange;
pub mod format;
pub mod types;

#[cfg(test)]
mod props;

pub use conversion::convert_amount;
pub use exchange::{ExchangeRate, RateTable};
pub use format::AmountFormatter;
pub use types::{Currency, SymbolPosition};

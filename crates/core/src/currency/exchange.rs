//! Exchange rate types and lookup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Exchange rate between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        from_currency: String,
        to_currency: String,
        rate: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            from_currency,
            to_currency,
            rate,
            effective_date,
        }
    }

    /// Returns the inverse rate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from_currency: self.to_currency.clone(),
            to_currency: self.from_currency.clone(),
            rate: Decimal::ONE / self.rate,
            effective_date: self.effective_date,
        }
    }
}

/// A set of exchange rates; the most recent rate for a pair wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: Vec<ExchangeRate>,
}

impl RateTable {
    /// Creates a rate table from a list of rates.
    #[must_use]
    pub const fn new(rates: Vec<ExchangeRate>) -> Self {
        Self { rates }
    }

    /// Adds a rate to the table.
    pub fn push(&mut self, rate: ExchangeRate) {
        self.rates.push(rate);
    }

    /// Looks up the rate converting `from` into `to`.
    ///
    /// Same-currency lookups are always `1`. A direct rate is preferred;
    /// otherwise the inverse of the reverse pair is used. Zero rates are
    /// never inverted.
    #[must_use]
    pub fn rate(&self, from: &str, to: &str) -> Option<Decimal> {
        if from.eq_ignore_ascii_case(to) {
            return Some(Decimal::ONE);
        }

        if let Some(direct) = self.latest(from, to) {
            return Some(direct.rate);
        }

        self.latest(to, from)
            .filter(|reverse| !reverse.rate.is_zero())
            .map(|reverse| reverse.inverse().rate)
    }

    fn latest(&self, from: &str, to: &str) -> Option<&ExchangeRate> {
        self.rates
            .iter()
            .filter(|r| {
                r.from_currency.eq_ignore_ascii_case(from) && r.to_currency.eq_ignore_ascii_case(to)
            })
            .max_by_key(|r| r.effective_date)
    }
}

//! Currency catalog entries.

use serde::{Deserialize, Serialize};
use tbfx_shared::types::CurrencyId;

/// Where the currency symbol is printed relative to the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// `$ 1,000.00`
    #[default]
    Before,
    /// `1,000.00 €`
    After,
}

/// A currency known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Catalog identifier.
    pub id: CurrencyId,
    /// ISO 4217 code (e.g., "USD", "EUR").
    pub name: String,
    /// Display symbol.
    pub symbol: String,
    /// Number of decimal places amounts are rounded to.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Symbol placement.
    #[serde(default)]
    pub position: SymbolPosition,
}

fn default_decimal_places() -> u32 {
    2
}

impl Currency {
    /// Creates a currency with two decimal places and a leading symbol.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: CurrencyId::new(),
            name: name.into(),
            symbol: symbol.into(),
            decimal_places: default_decimal_places(),
            position: SymbolPosition::Before,
        }
    }

    /// Sets the number of decimal places.
    #[must_use]
    pub const fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    /// Sets the symbol position.
    #[must_use]
    pub const fn with_position(mut self, position: SymbolPosition) -> Self {
        self.position = position;
        self
    }
}

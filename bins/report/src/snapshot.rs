//! Ledger snapshot loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tbfx_core::reports::{InMemoryBook, PeriodOption};
use tbfx_shared::{AppError, AppResult};
use tbfx_shared::types::CurrencyId;
use tracing::debug;

/// A book plus the periods to report on, as stored on disk.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    /// Reporting periods, the current one first.
    #[serde(default)]
    pub periods: Vec<PeriodOption>,
    /// Chart of accounts, currencies, rates, and ledger figures.
    #[serde(flatten)]
    pub book: InMemoryBook,
}

impl Snapshot {
    /// Reads and parses the JSON snapshot at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read ledger snapshot {}", path.display()))?;
        let snapshot = Self::parse(&raw)
            .with_context(|| format!("parse ledger snapshot {}", path.display()))?;
        debug!(
            path = %path.display(),
            accounts = snapshot.book.accounts.len(),
            periods = snapshot.periods.len(),
            "loaded ledger snapshot"
        );
        Ok(snapshot)
    }

    /// Parses a JSON snapshot.
    pub fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| AppError::Validation(e.to_string()))
    }

    /// Resolves an ISO currency code against the book's catalog.
    pub fn currency_id(&self, code: &str) -> AppResult<CurrencyId> {
        self.book
            .currencies
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(code))
            .map(|c| c.id)
            .ok_or_else(|| AppError::Validation(format!("unknown currency {code:?}")))
    }
}

//! Collaborators the report reads from.
//!
//! The chart of accounts, the currency catalog and converter, and the
//! general ledger live outside this crate. Each is a trait here;
//! [`InMemoryBook`] implements all of them over plain data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tbfx_shared::types::{AccountGroupId, AccountId, CurrencyId};

use super::error::ReportError;
use super::types::PeriodOption;
use crate::currency::{Currency, RateTable, convert_amount};

/// Hierarchical classification of ledger accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGroup {
    /// Group identifier.
    pub id: AccountGroupId,
    /// Code prefix shared by the group's accounts (e.g., "10").
    #[serde(default)]
    pub code_prefix: Option<String>,
    /// Group name.
    pub name: String,
    /// Enclosing group.
    #[serde(default)]
    pub parent_id: Option<AccountGroupId>,
}

impl AccountGroup {
    /// Header label: `"<code_prefix> <name>"`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.code_prefix.as_deref().map(str::trim) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix} {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Account code (e.g., "101200").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Group the account is classified under.
    #[serde(default)]
    pub group_id: Option<AccountGroupId>,
}

impl Account {
    /// Name shown on report lines: `"<code> <name>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

/// Debit, credit, and balance amounts in the company currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    /// Debit sum.
    pub debit: Decimal,
    /// Credit sum.
    pub credit: Decimal,
    /// Signed balance.
    pub balance: Decimal,
}

/// Aggregated ledger figures for one account over one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodTotals {
    /// Movements up to the end of the period, initial balance included.
    pub sum: Totals,
    /// Balance carried in from before the period.
    pub initial_balance: Totals,
    /// Prior retained earnings not yet allocated.
    pub unaffected_earnings: Totals,
}

/// Ledger figures of one account, one entry per requested period in the
/// same order as the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// The account.
    pub account: Account,
    /// Per-period figures.
    pub periods: Vec<PeriodTotals>,
}

/// Chart of accounts lookups.
pub trait AccountDirectory {
    /// Resolves an account.
    fn account(&self, id: AccountId) -> Result<Account, ReportError>;

    /// Resolves an account group.
    fn group(&self, id: AccountGroupId) -> Result<AccountGroup, ReportError>;
}

/// Currency catalog.
pub trait CurrencyCatalog {
    /// Every known currency.
    fn currencies(&self) -> Result<Vec<Currency>, ReportError>;

    /// Resolves a currency.
    fn currency(&self, id: CurrencyId) -> Result<Currency, ReportError>;

    /// The company's functional currency.
    fn company_currency(&self) -> Result<Currency, ReportError>;
}

/// Currency conversion.
pub trait CurrencyConverter {
    /// Converts `amount` from `from` into `to`.
    fn convert(&self, amount: Decimal, from: &Currency, to: &Currency)
    -> Result<Decimal, ReportError>;
}

/// Aggregated general ledger query.
pub trait GeneralLedger {
    /// Returns per-account figures for each of `periods`.
    fn query(&self, periods: &[PeriodOption]) -> Result<Vec<AccountTotals>, ReportError>;
}

/// Everything a trial balance reads from.
pub trait ReportSources: AccountDirectory + CurrencyCatalog + CurrencyConverter + GeneralLedger {}

impl<T> ReportSources for T where
    T: AccountDirectory + CurrencyCatalog + CurrencyConverter + GeneralLedger
{
}

impl CurrencyConverter for RateTable {
    fn convert(
        &self,
        amount: Decimal,
        from: &Currency,
        to: &Currency,
    ) -> Result<Decimal, ReportError> {
        let rate = self
            .rate(&from.name, &to.name)
            .ok_or_else(|| ReportError::NoExchangeRate {
                from: from.name.clone(),
                to: to.name.clone(),
            })?;
        Ok(convert_amount(amount, rate, to.decimal_places))
    }
}

/// Ledger figures of one account as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Account the figures belong to.
    pub account_id: AccountId,
    /// Per-period figures, current period first.
    #[serde(default)]
    pub periods: Vec<PeriodTotals>,
}

/// In-memory book: chart of accounts, currencies, rates, and ledger figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryBook {
    /// Company functional currency.
    pub company_currency: CurrencyId,
    /// Currency catalog.
    #[serde(default)]
    pub currencies: Vec<Currency>,
    /// Exchange rates.
    #[serde(default)]
    pub rates: RateTable,
    /// Account groups.
    #[serde(default)]
    pub groups: Vec<AccountGroup>,
    /// Accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Ledger figures, in report order.
    #[serde(default)]
    pub ledger: Vec<LedgerRecord>,
}

impl InMemoryBook {
    /// Creates an empty book whose functional currency is `company_currency`.
    #[must_use]
    pub fn new(company_currency: Currency) -> Self {
        Self {
            company_currency: company_currency.id,
            currencies: vec![company_currency],
            rates: RateTable::default(),
            groups: Vec::new(),
            accounts: Vec::new(),
            ledger: Vec::new(),
        }
    }
}

impl AccountDirectory for InMemoryBook {
    fn account(&self, id: AccountId) -> Result<Account, ReportError> {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(ReportError::AccountNotFound(id))
    }

    fn group(&self, id: AccountGroupId) -> Result<AccountGroup, ReportError> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(ReportError::AccountGroupNotFound(id))
    }
}

impl CurrencyCatalog for InMemoryBook {
    fn currencies(&self) -> Result<Vec<Currency>, ReportError> {
        Ok(self.currencies.clone())
    }

    fn currency(&self, id: CurrencyId) -> Result<Currency, ReportError> {
        self.currencies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ReportError::CurrencyNotFound(id))
    }

    fn company_currency(&self) -> Result<Currency, ReportError> {
        self.currency(self.company_currency)
    }
}

impl CurrencyConverter for InMemoryBook {
    fn convert(
        &self,
        amount: Decimal,
        from: &Currency,
        to: &Currency,
    ) -> Result<Decimal, ReportError> {
        self.rates.convert(amount, from, to)
    }
}

impl GeneralLedger for InMemoryBook {
    fn query(&self, periods: &[PeriodOption]) -> Result<Vec<AccountTotals>, ReportError> {
        self.ledger
            .iter()
            .map(|record| {
                let account = self.account(record.account_id)?;
                let figures = (0..periods.len())
                    .map(|i| record.periods.get(i).copied().unwrap_or_default())
                    .collect();
                Ok(AccountTotals {
                    account,
                    periods: figures,
                })
            })
            .collect()
    }
}

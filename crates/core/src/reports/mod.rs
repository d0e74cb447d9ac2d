//! Trial balance report generation.
//!
//! - `lines` - per-account debit/credit columns and the total line
//! - `hierarchy` - nesting of account lines under account group headers
//! - `options` - currency selector
//! - `report` - the report hooks and the currency-scoped variant
//! - `export` - rendering pipeline

pub mod error;
pub mod export;
pub mod hierarchy;
pub mod lines;
pub mod options;
pub mod report;
pub mod sources;
pub mod types;


pub use error::ReportError;
pub use export::{JsonRenderer, ReportRenderer, export_currency, render_report};
pub use hierarchy::{GroupKey, HierarchyBuilder, HierarchyNode, NOT_APPLICABLE, SortPriority, merge_columns};
pub use lines::{TOTAL_LINE_ID, TrialBalanceLines};
pub use options::augment_options;
pub use report::{BaseTrialBalance, CurrencyTrialBalance, TrialBalanceReport};
pub use sources::{
    Account, AccountDirectory, AccountGroup, AccountTotals, CurrencyCatalog, CurrencyConverter,
    GeneralLedger, InMemoryBook, LedgerRecord, PeriodTotals, ReportSources, Totals,
};
pub use types::*;

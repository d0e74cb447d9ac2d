//! Core business logic for tbfx.
//!
//! Pure report logic with no I/O. Ledger data, the chart of accounts, and
//! exchange rates come in through the traits in [`reports::sources`].
//!
//! # Modules
//!
//! - `currency` - Currencies, exchange rates, conversion, and amount formatting
//! - `reports` - Trial balance lines, account hierarchy, and export

pub mod currency;
pub mod reports;

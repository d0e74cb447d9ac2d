//! Trial balance lines in a target currency.

use rust_decimal::Decimal;
use tbfx_shared::ReportConfig;
use tracing::debug;

use super::error::ReportError;
use super::hierarchy::truncate;
use super::sources::{AccountTotals, CurrencyConverter, GeneralLedger, PeriodTotals};
use super::types::{Column, ReportContext, ReportLine, ReportOptions};
use crate::currency::{AmountFormatter, Currency};

/// Identifier of the trailing total line.
pub const TOTAL_LINE_ID: &str = "grouped_accounts_total";

/// Builds one line per ledger account plus a total line.
///
/// Columns are: initial balance (debit, credit), then a (debit, credit)
/// pair per period from the oldest to the current, then the closing
/// balance (debit, credit). Ledger amounts are in the company currency and
/// each one is converted to the target currency on its own.
pub struct TrialBalanceLines<'a, S: GeneralLedger + CurrencyConverter + ?Sized> {
    sources: &'a S,
    company: &'a Currency,
    target: &'a Currency,
    config: &'a ReportConfig,
}

impl<'a, S: GeneralLedger + CurrencyConverter + ?Sized> TrialBalanceLines<'a, S> {
    /// Creates a builder converting from `company` into `target`.
    pub const fn new(
        sources: &'a S,
        company: &'a Currency,
        target: &'a Currency,
        config: &'a ReportConfig,
    ) -> Self {
        Self {
            sources,
            company,
            target,
            config,
        }
    }

    /// Queries the ledger and builds the report lines.
    pub fn build(
        &self,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError> {
        let accounts = self.sources.query(&options.periods)?;
        let formatter = AmountFormatter::new(self.target);
        let mut totals = vec![Decimal::ZERO; 2 * (options.periods.len() + 2)];
        let mut lines = Vec::with_capacity(accounts.len() + 1);

        debug!(
            accounts = accounts.len(),
            periods = options.periods.len(),
            currency = %self.target.name,
            "building trial balance lines"
        );

        for AccountTotals { account, periods } in accounts {
            if periods.len() != options.periods.len() {
                return Err(ReportError::LedgerQuery(format!(
                    "account {} has {} periods, expected {}",
                    account.id,
                    periods.len(),
                    options.periods.len()
                )));
            }
            let sums = self.account_sums(&periods)?;
            for (total, value) in totals.iter_mut().zip(&sums) {
                *total += *value;
            }

            let full_name = account.display_name();
            let name = if ctx.print_mode {
                full_name.clone()
            } else {
                truncate(&full_name, self.config.account_name_max_len)
            };
            let columns = sums
                .iter()
                .map(|value| Column::number(*value, formatter.format(*value, true)))
                .collect();

            let mut line = ReportLine::account(account.id, name).with_columns(columns);
            line.title_hover = Some(full_name);
            lines.push(line);
        }

        let mut total = ReportLine::new(TOTAL_LINE_ID, "Total").with_columns(
            totals
                .iter()
                .map(|value| Column::number(*value, formatter.format(*value, false)))
                .collect(),
        );
        total.class = Some("total".to_string());
        total.level = Some(1);
        lines.push(total);

        Ok(lines)
    }

    fn account_sums(&self, periods: &[PeriodTotals]) -> Result<Vec<Decimal>, ReportError> {
        let mut sums = Vec::with_capacity(2 * (periods.len() + 2));
        let mut balance = Decimal::ZERO;

        if periods.is_empty() {
            sums.extend(split_sign(Decimal::ZERO));
        }

        for (i, period) in periods.iter().rev().enumerate() {
            if i == 0 {
                let initial = self.convert(
                    period.initial_balance.balance + period.unaffected_earnings.balance,
                )?;
                sums.extend(split_sign(initial));
                balance += initial;
            }

            let debit =
                self.convert(period.sum.debit)? - self.convert(period.initial_balance.debit)?;
            let credit =
                self.convert(period.sum.credit)? - self.convert(period.initial_balance.credit)?;
            sums.push(debit);
            sums.push(credit);
            balance += debit - credit;
        }

        sums.extend(split_sign(balance));
        Ok(sums)
    }

    fn convert(&self, amount: Decimal) -> Result<Decimal, ReportError> {
        if self.company.id == self.target.id {
            return Ok(amount);
        }
        self.sources.convert(amount, self.company, self.target)
    }
}

/// Debit/credit pair of a signed balance; the non-applicable side is zero.
fn split_sign(value: Decimal) -> [Decimal; 2] {
    if value > Decimal::ZERO {
        [value, Decimal::ZERO]
    } else if value < Decimal::ZERO {
        [Decimal::ZERO, -value]
    } else {
        [Decimal::ZERO, Decimal::ZERO]
    }
}

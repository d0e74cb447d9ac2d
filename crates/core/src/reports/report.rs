//! Trial balance report and its currency-scoped variant.

use tbfx_shared::ReportConfig;
use tracing::info;

use super::error::ReportError;
use super::export::{ReportRenderer, export_currency, render_report};
use super::hierarchy::HierarchyBuilder;
use super::lines::TrialBalanceLines;
use super::options::augment_options;
use super::sources::ReportSources;
use super::types::{ExportFormat, ReportContext, ReportLine, ReportOptions};
use crate::currency::Currency;

/// Hooks of a trial balance report.
pub trait TrialBalanceReport {
    /// Display options, derived from the previous ones when given.
    fn options(
        &self,
        previous: Option<&ReportOptions>,
        ctx: &ReportContext,
    ) -> Result<ReportOptions, ReportError>;

    /// Flat report lines.
    fn lines(
        &self,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError>;

    /// Nests `lines` under account group headers.
    fn create_hierarchy(
        &self,
        lines: Vec<ReportLine>,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError>;

    /// Renders the report as `format`.
    fn export(
        &self,
        renderer: &dyn ReportRenderer,
        format: ExportFormat,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<u8>, ReportError> {
        render_report(self, renderer, format, options, ctx)
    }

    /// PDF export.
    fn pdf(
        &self,
        renderer: &dyn ReportRenderer,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<u8>, ReportError> {
        self.export(renderer, ExportFormat::Pdf, options, ctx)
    }

    /// Spreadsheet export.
    fn xlsx(
        &self,
        renderer: &dyn ReportRenderer,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<u8>, ReportError> {
        self.export(renderer, ExportFormat::Xlsx, options, ctx)
    }
}

/// Trial balance in the company currency.
pub struct BaseTrialBalance<'a, S: ReportSources + ?Sized> {
    sources: &'a S,
    config: &'a ReportConfig,
}

impl<'a, S: ReportSources + ?Sized> BaseTrialBalance<'a, S> {
    /// Creates the report over `sources`.
    pub const fn new(sources: &'a S, config: &'a ReportConfig) -> Self {
        Self { sources, config }
    }
}

impl<S: ReportSources + ?Sized> TrialBalanceReport for BaseTrialBalance<'_, S> {
    fn options(
        &self,
        previous: Option<&ReportOptions>,
        _ctx: &ReportContext,
    ) -> Result<ReportOptions, ReportError> {
        Ok(previous.cloned().unwrap_or_default())
    }

    fn lines(
        &self,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError> {
        let company = self.sources.company_currency()?;
        TrialBalanceLines::new(self.sources, &company, &company, self.config).build(options, ctx)
    }

    fn create_hierarchy(
        &self,
        lines: Vec<ReportLine>,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError> {
        let company = self.sources.company_currency()?;
        HierarchyBuilder::new(self.sources, &company, self.config).build(lines, options, ctx)
    }
}

/// Trial balance rendered in a currency picked per call.
///
/// Wraps another report. When the context carries a currency other than
/// the company one, lines and headers are built and formatted in that
/// currency; every other call goes to the wrapped report. Also adds the
/// currency selector to the options and exports in the selected currency.
pub struct CurrencyTrialBalance<'a, R: TrialBalanceReport, S: ReportSources + ?Sized> {
    inner: R,
    sources: &'a S,
    config: &'a ReportConfig,
}

impl<'a, R: TrialBalanceReport, S: ReportSources + ?Sized> CurrencyTrialBalance<'a, R, S> {
    /// Wraps `inner`.
    pub const fn new(inner: R, sources: &'a S, config: &'a ReportConfig) -> Self {
        Self {
            inner,
            sources,
            config,
        }
    }

    /// Company and target currency when `ctx` asks for a foreign currency.
    fn foreign_currency(
        &self,
        ctx: &ReportContext,
    ) -> Result<Option<(Currency, Currency)>, ReportError> {
        let Some(id) = ctx.currency else {
            return Ok(None);
        };
        let company = self.sources.company_currency()?;
        if company.id == id {
            return Ok(None);
        }
        let target = self.sources.currency(id)?;
        Ok(Some((company, target)))
    }
}

impl<R: TrialBalanceReport, S: ReportSources + ?Sized> TrialBalanceReport
    for CurrencyTrialBalance<'_, R, S>
{
    fn options(
        &self,
        previous: Option<&ReportOptions>,
        ctx: &ReportContext,
    ) -> Result<ReportOptions, ReportError> {
        let options = self.inner.options(previous, ctx)?;
        if !self.config.currency_filter {
            return Ok(options);
        }
        augment_options(options, self.sources, ctx)
    }

    fn lines(
        &self,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError> {
        match self.foreign_currency(ctx)? {
            Some((company, target)) => {
                TrialBalanceLines::new(self.sources, &company, &target, self.config)
                    .build(options, ctx)
            }
            None => self.inner.lines(options, ctx),
        }
    }

    fn create_hierarchy(
        &self,
        lines: Vec<ReportLine>,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError> {
        match self.foreign_currency(ctx)? {
            Some((_, target)) => {
                HierarchyBuilder::new(self.sources, &target, self.config).build(lines, options, ctx)
            }
            None => self.inner.create_hierarchy(lines, options, ctx),
        }
    }

    fn export(
        &self,
        renderer: &dyn ReportRenderer,
        format: ExportFormat,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<u8>, ReportError> {
        let company = self.sources.company_currency()?;
        match export_currency(options, &company) {
            Some(currency) => {
                info!(%format, %currency, "exporting trial balance in selected currency");
                render_report(self, renderer, format, options, &ctx.with_currency(currency))
            }
            None => {
                info!(%format, currency = %company.name, "exporting trial balance");
                render_report(self, renderer, format, options, ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tbfx_shared::types::{AccountGroupId, AccountId, CurrencyId};

    use crate::currency::ExchangeRate;
    use crate::reports::export::JsonRenderer;
    use crate::reports::sources::{
        Account, AccountGroup, InMemoryBook, LedgerRecord, PeriodTotals, Totals,
    };
    use crate::reports::types::{CellValue, LineId, PeriodOption};

    struct Fixture {
        book: InMemoryBook,
        eur: CurrencyId,
        config: ReportConfig,
    }

    fn fixture() -> Fixture {
        let usd = Currency::new("USD", "$");
        let eur = Currency::new("EUR", "€");
        let eur_id = eur.id;
        let mut book = InMemoryBook::new(usd);
        book.currencies.push(eur);
        book.rates.push(ExchangeRate::new(
            "USD".into(),
            "EUR".into(),
            dec!(0.5),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        ));

        let group = AccountGroup {
            id: AccountGroupId::new(),
            code_prefix: Some("10".into()),
            name: "Cash".into(),
            parent_id: None,
        };
        let account = Account {
            id: AccountId::new(),
            code: "101000".into(),
            name: "Bank".into(),
            group_id: Some(group.id),
        };
        book.ledger.push(LedgerRecord {
            account_id: account.id,
            periods: vec![PeriodTotals {
                sum: Totals { debit: dec!(200), credit: dec!(0), balance: dec!(200) },
                ..PeriodTotals::default()
            }],
        });
        book.groups.push(group);
        book.accounts.push(account);

        Fixture {
            book,
            eur: eur_id,
            config: ReportConfig::default(),
        }
    }

    fn options() -> ReportOptions {
        ReportOptions {
            periods: vec![PeriodOption::default()],
            ..ReportOptions::default()
        }
    }

    fn closing_debit(lines: &[ReportLine]) -> CellValue {
        lines[0].columns[lines[0].columns.len() - 2].raw_value()
    }

    #[test]
    fn test_base_report_uses_company_currency() {
        let f = fixture();
        let report = BaseTrialBalance::new(&f.book, &f.config);
        let ctx = ReportContext::default().with_currency(f.eur);
        let lines = report.lines(&options(), &ctx).unwrap();
        assert_eq!(closing_debit(&lines), CellValue::Number(dec!(200)));
    }

    #[test]
    fn test_decorator_converts_for_foreign_currency() {
        let f = fixture();
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);

        let ctx = ReportContext::default().with_currency(f.eur);
        let lines = report.lines(&options(), &ctx).unwrap();
        assert_eq!(closing_debit(&lines), CellValue::Number(dec!(100.00)));
        assert_eq!(lines[0].columns[2].name, "€ 100.00");

        let company = f.book.company_currency;
        let same = report
            .lines(&options(), &ReportContext::default().with_currency(company))
            .unwrap();
        assert_eq!(closing_debit(&same), CellValue::Number(dec!(200)));
    }

    #[test]
    fn test_decorator_hierarchy_formats_in_target_currency() {
        let f = fixture();
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);
        let ctx = ReportContext::default().with_currency(f.eur);
        let lines = report.lines(&options(), &ctx).unwrap();
        let nested = report.create_hierarchy(lines, &options(), &ctx).unwrap();

        assert_eq!(nested[0].id, LineId::hierarchy("10 Cash"));
        assert_eq!(nested[0].columns[2].name, "€ 100.00");
    }

    #[test]
    fn test_options_respect_currency_filter_flag() {
        let mut f = fixture();
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);
        let options = report.options(None, &ReportContext::default()).unwrap();
        assert!(options.currency_filter);
        assert_eq!(options.currencies.len(), 2);

        f.config.currency_filter = false;
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);
        let options = report.options(None, &ReportContext::default()).unwrap();
        assert!(!options.currency_filter);
        assert!(options.currencies.is_empty());
    }

    #[test]
    fn test_export_follows_selected_currency() {
        let f = fixture();
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);
        let ctx = ReportContext::default().with_currency(f.eur);
        let mut options = report.options(Some(&options()), &ctx).unwrap();
        options.hierarchy = true;

        let bytes = report.pdf(&JsonRenderer::default(), &options, &ReportContext::default()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["format"], "pdf");
        assert_eq!(value["currency"]["name"], "EUR");
        assert_eq!(value["lines"][0]["name"], "10 Cash");
        assert_eq!(value["lines"][0]["columns"][2]["name"], "€ 100.00");
    }

    #[test]
    fn test_export_in_company_currency_keeps_context() {
        let f = fixture();
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);
        let options = report.options(Some(&options()), &ReportContext::default()).unwrap();

        let bytes = report.xlsx(&JsonRenderer::default(), &options, &ReportContext::default()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["format"], "xlsx");
        assert_eq!(value["currency"]["name"], "USD");
        assert_eq!(value["lines"][0]["columns"][2]["name"], "$ 200.00");
    }

    #[test]
    fn test_unknown_currency_is_an_error() {
        let f = fixture();
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(&f.book, &f.config), &f.book, &f.config);
        let missing = CurrencyId::new();
        let result = report.lines(&options(), &ReportContext::default().with_currency(missing));
        assert!(matches!(result, Err(ReportError::CurrencyNotFound(id)) if id == missing));
    }

    #[test]
    fn test_total_line_survives_hierarchy() {
        let f = fixture();
        let report = BaseTrialBalance::new(&f.book, &f.config);
        let lines = report.lines(&options(), &ReportContext::default()).unwrap();
        let nested = report.create_hierarchy(lines, &options(), &ReportContext::default()).unwrap();
        let total = nested.last().unwrap();
        assert_eq!(total.name, "Total");
        assert_eq!(total.columns[2].raw_value(), CellValue::Number(dec!(200)));
        assert!(nested.iter().all(|l| l.columns.len() == 6));
    }
}

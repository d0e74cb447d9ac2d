//! Report data types.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tbfx_shared::types::{AccountId, CurrencyId};

/// Identifier of a report line, unique within one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineId {
    /// Line of a single account.
    Account(AccountId),
    /// Synthetic line (totals, hierarchy headers, sections).
    Text(String),
}

impl LineId {
    /// Identifier of the hierarchy header for a group label.
    #[must_use]
    pub fn hierarchy(label: &str) -> Self {
        Self::Text(format!("hierarchy_{label}"))
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "{id}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<AccountId> for LineId {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl From<&str> for LineId {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Raw, unformatted value of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    /// Numeric amount.
    Number(Decimal),
    /// Free text; aggregates to `"n/a"` or `""`.
    Text(String),
}

impl CellValue {
    /// Zero amount.
    pub const ZERO: Self = Self::Number(Decimal::ZERO);
}

/// A single cell of a report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Formatted value.
    pub name: String,
    /// Style tag (e.g., "number").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Raw value used for aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_format_name: Option<CellValue>,
}

impl Column {
    /// Numeric column with its formatted rendering.
    #[must_use]
    pub fn number(value: Decimal, formatted: String) -> Self {
        Self {
            name: formatted,
            class: Some("number".to_string()),
            no_format_name: Some(CellValue::Number(value)),
        }
    }

    /// Text-only column.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            name: text.into(),
            class: None,
            no_format_name: None,
        }
    }

    /// Value used when summing columns: the raw value if present, the
    /// formatted text otherwise.
    #[must_use]
    pub fn raw_value(&self) -> CellValue {
        self.no_format_name
            .clone()
            .unwrap_or_else(|| CellValue::Text(self.name.clone()))
    }
}

/// Marks what a line's caret menu refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaretOption {
    /// The line is an account line.
    Account,
}

/// One line of a rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Line identifier.
    pub id: LineId,
    /// Display name.
    pub name: String,
    /// Full name shown on hover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_hover: Option<String>,
    /// Column cells.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Nesting depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Enclosing line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LineId>,
    /// Caret menu marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caret_options: Option<CaretOption>,
    /// Account this line reports on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Whether the line is a collapsible header.
    #[serde(default)]
    pub unfoldable: bool,
    /// Whether the header starts expanded.
    #[serde(default)]
    pub unfolded: bool,
    /// Style class (e.g., "total").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Inline style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ReportLine {
    /// Creates a line with no columns and no grouping metadata.
    #[must_use]
    pub fn new(id: impl Into<LineId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title_hover: None,
            columns: Vec::new(),
            level: None,
            parent_id: None,
            caret_options: None,
            account_id: None,
            unfoldable: false,
            unfolded: false,
            class: None,
            style: None,
        }
    }

    /// Creates an account line carrying the account marker.
    #[must_use]
    pub fn account(account_id: AccountId, name: impl Into<String>) -> Self {
        let mut line = Self::new(account_id, name);
        line.caret_options = Some(CaretOption::Account);
        line.account_id = Some(account_id);
        line
    }

    /// Sets the columns.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Returns the account this line groups by, if it is an account line
    /// that actually references an account.
    #[must_use]
    pub fn grouping_account(&self) -> Option<AccountId> {
        match self.caret_options {
            Some(CaretOption::Account) => self.account_id,
            None => None,
        }
    }

    /// Raw values of every column.
    #[must_use]
    pub fn raw_values(&self) -> Vec<CellValue> {
        self.columns.iter().map(Column::raw_value).collect()
    }
}

/// One reporting period column group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOption {
    /// Header label.
    #[serde(default)]
    pub label: String,
    /// First day of the period.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Last day of the period.
    #[serde(default)]
    pub date_to: NaiveDate,
}

/// Entry of the currency selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyOption {
    /// Currency identifier.
    pub id: CurrencyId,
    /// ISO code.
    pub name: String,
    /// Whether this currency is the one selected.
    pub selected: bool,
}

/// Display options of a report render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Periods, the current one first followed by comparisons.
    pub periods: Vec<PeriodOption>,
    /// Header lines the user expanded.
    pub unfolded_lines: Vec<LineId>,
    /// Expand every header.
    pub unfold_all: bool,
    /// Group account lines by account group.
    pub hierarchy: bool,
    /// Currency selector entries.
    pub currencies: Vec<CurrencyOption>,
    /// Whether the currency selector is active.
    pub currency_filter: bool,
}

impl ReportOptions {
    /// First currency marked as selected.
    #[must_use]
    pub fn selected_currency(&self) -> Option<&CurrencyOption> {
        self.currencies.iter().find(|c| c.selected)
    }

    /// Whether the user expanded `id`.
    #[must_use]
    pub fn is_unfolded(&self, id: &LineId) -> bool {
        self.unfolded_lines.contains(id)
    }
}

/// Per-call rendering context, passed explicitly to every report hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportContext {
    /// Currency the report is rendered in; `None` for the company currency.
    pub currency: Option<CurrencyId>,
    /// Print rendering: no truncation, headers expanded.
    pub print_mode: bool,
}

impl ReportContext {
    /// Returns a copy rendering in `currency`.
    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencyId) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Returns a copy in print mode.
    #[must_use]
    pub const fn print(mut self) -> Self {
        self.print_mode = true;
        self
    }
}

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PDF document.
    Pdf,
    /// Spreadsheet.
    Xlsx,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Xlsx => f.write_str("xlsx"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(format!("Unknown export format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_value_falls_back_to_text() {
        assert_eq!(
            Column::number(dec!(5), "$ 5.00".into()).raw_value(),
            CellValue::Number(dec!(5))
        );
        assert_eq!(
            Column::text("12%").raw_value(),
            CellValue::Text("12%".into())
        );
    }

    #[test]
    fn test_grouping_account_requires_marker_and_reference() {
        let id = AccountId::new();
        assert_eq!(ReportLine::account(id, "100 Cash").grouping_account(), Some(id));

        let mut unmarked = ReportLine::new(id, "100 Cash");
        unmarked.account_id = Some(id);
        assert_eq!(unmarked.grouping_account(), None);

        let mut missing = ReportLine::account(id, "100 Cash");
        missing.account_id = None;
        assert_eq!(missing.grouping_account(), None);
    }

    #[test]
    fn test_line_id_serializes_untagged() {
        let id = AccountId::new();
        let json = serde_json::to_string(&LineId::Account(id)).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: LineId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LineId::Account(id));

        let text: LineId = serde_json::from_str("\"grouped_accounts_total\"").unwrap();
        assert_eq!(text, LineId::from("grouped_accounts_total"));
    }

    #[test]
    fn test_selected_currency() {
        let mut options = ReportOptions::default();
        assert!(options.selected_currency().is_none());
        let id = CurrencyId::new();
        options.currencies = vec![
            CurrencyOption { id: CurrencyId::new(), name: "USD".into(), selected: false },
            CurrencyOption { id, name: "EUR".into(), selected: true },
        ];
        assert_eq!(options.selected_currency().map(|c| c.id), Some(id));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}

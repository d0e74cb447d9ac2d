//! Export pipeline: lines, optional hierarchy, then rendering.

use serde::Serialize;
use tracing::debug;

use super::error::ReportError;
use super::report::TrialBalanceReport;
use super::types::{CurrencyOption, ExportFormat, ReportContext, ReportLine, ReportOptions};
use crate::currency::Currency;
use tbfx_shared::types::CurrencyId;

/// Turns report lines into an output document.
pub trait ReportRenderer {
    /// Renders `lines` as `format`.
    fn render(
        &self,
        format: ExportFormat,
        options: &ReportOptions,
        lines: &[ReportLine],
    ) -> Result<Vec<u8>, ReportError>;
}

/// Renders the export as a JSON document.
///
/// Stands in for the PDF and spreadsheet engines; the document carries the
/// requested format so callers can route it on.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    /// Pretty-print the output.
    pub pretty: bool,
}

#[derive(Serialize)]
struct RenderedReport<'a> {
    format: ExportFormat,
    currency: Option<&'a CurrencyOption>,
    lines: &'a [ReportLine],
}

impl ReportRenderer for JsonRenderer {
    fn render(
        &self,
        format: ExportFormat,
        options: &ReportOptions,
        lines: &[ReportLine],
    ) -> Result<Vec<u8>, ReportError> {
        let document = RenderedReport {
            format,
            currency: options.selected_currency(),
            lines,
        };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        };
        bytes.map_err(|e| ReportError::Render(e.to_string()))
    }
}

/// Runs the export pipeline of `report` under `ctx`.
///
/// Lines are nested into the hierarchy when `options.hierarchy` is set.
pub fn render_report<R: TrialBalanceReport + ?Sized>(
    report: &R,
    renderer: &dyn ReportRenderer,
    format: ExportFormat,
    options: &ReportOptions,
    ctx: &ReportContext,
) -> Result<Vec<u8>, ReportError> {
    let lines = report.lines(options, ctx)?;
    let lines = if options.hierarchy {
        report.create_hierarchy(lines, options, ctx)?
    } else {
        lines
    };
    debug!(%format, lines = lines.len(), "rendering report");
    renderer.render(format, options, &lines)
}

/// The selected currency to export in, if one is selected and it is not
/// the company currency.
#[must_use]
pub fn export_currency(options: &ReportOptions, company: &Currency) -> Option<CurrencyId> {
    options
        .currencies
        .iter()
        .find(|c| c.selected && c.id != company.id)
        .map(|c| c.id)
}

//! Currency selector injection into report options.

use tracing::debug;

use super::error::ReportError;
use super::sources::CurrencyCatalog;
use super::types::{CurrencyOption, ReportContext, ReportOptions};

/// Adds the currency selector to `options`.
///
/// Every catalog currency is listed; the one requested by `ctx` is
/// selected, or the company currency when `ctx` requests none. Marks the
/// currency filter as active.
pub fn augment_options<C: CurrencyCatalog + ?Sized>(
    mut options: ReportOptions,
    catalog: &C,
    ctx: &ReportContext,
) -> Result<ReportOptions, ReportError> {
    let selected = match ctx.currency {
        Some(id) => id,
        None => catalog.company_currency()?.id,
    };

    options.currencies = catalog
        .currencies()?
        .into_iter()
        .map(|currency| CurrencyOption {
            selected: currency.id == selected,
            id: currency.id,
            name: currency.name,
        })
        .collect();
    options.currency_filter = true;

    debug!(currencies = options.currencies.len(), selected = %selected, "currency selector added");
    Ok(options)
}

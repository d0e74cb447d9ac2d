//! Report error types.

use tbfx_shared::AppError;
use tbfx_shared::types::{AccountGroupId, AccountId, CurrencyId};
use thiserror::Error;

/// Errors that can occur during report generation.
///
/// These come from collaborators (chart of accounts, currency catalog,
/// ledger, renderer) and are propagated unchanged to the caller.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account group not found.
    #[error("Account group not found: {0}")]
    AccountGroupNotFound(AccountGroupId),

    /// Currency not found in the catalog.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(CurrencyId),

    /// No exchange rate for the currency pair.
    #[error("No exchange rate found for {from} to {to}")]
    NoExchangeRate {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },

    /// The general ledger query failed.
    #[error("Ledger query failed: {0}")]
    LedgerQuery(String),

    /// Rendering the export failed.
    #[error("Rendering failed: {0}")]
    Render(String),
}

impl From<ReportError> for AppError {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::AccountNotFound(_)
            | ReportError::AccountGroupNotFound(_)
            | ReportError::CurrencyNotFound(_) => Self::NotFound(error.to_string()),
            ReportError::NoExchangeRate { .. } | ReportError::LedgerQuery(_) => {
                Self::ExternalService(error.to_string())
            }
            ReportError::Render(_) => Self::Internal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entities_map_to_not_found() {
        let id = AccountId::new();
        let error: AppError = ReportError::AccountNotFound(id).into();
        assert_eq!(error.error_code(), "NOT_FOUND");
        assert_eq!(error.to_string(), format!("Not found: Account not found: {id}"));
    }

    #[test]
    fn test_rate_errors_map_to_external_service() {
        let error: AppError = ReportError::NoExchangeRate {
            from: "USD".into(),
            to: "EUR".into(),
        }
        .into();
        assert_eq!(error.error_code(), "EXTERNAL_SERVICE_ERROR");
    }
}

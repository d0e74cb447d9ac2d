//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Report rendering configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Ledger snapshot configuration.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Report rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Whether the currency selector is injected into report options.
    #[serde(default = "default_currency_filter")]
    pub currency_filter: bool,
    /// Account names longer than this are abbreviated outside print mode.
    #[serde(default = "default_account_name_max_len")]
    pub account_name_max_len: usize,
    /// Group header labels longer than this are abbreviated.
    #[serde(default = "default_group_label_max_len")]
    pub group_label_max_len: usize,
    /// Label of the synthetic bucket for accounts without a group.
    #[serde(default = "default_no_group_label")]
    pub no_group_label: String,
    /// Render in print mode (no truncation, everything unfolded).
    #[serde(default)]
    pub print_mode: bool,
}

fn default_currency_filter() -> bool {
    true
}

fn default_account_name_max_len() -> usize {
    40
}

fn default_group_label_max_len() -> usize {
    30
}

fn default_no_group_label() -> String {
    "(No Group)".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_filter: default_currency_filter(),
            account_name_max_len: default_account_name_max_len(),
            group_label_max_len: default_group_label_max_len(),
            no_group_label: default_no_group_label(),
            print_mode: false,
        }
    }
}

/// Ledger snapshot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Path of the JSON ledger snapshot.
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

fn default_snapshot_path() -> String {
    "ledger.json".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `TBFX__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration using `dir` as the config file directory.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TBFX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

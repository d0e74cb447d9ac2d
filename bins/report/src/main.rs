//! tbfx
//!
//! Renders a trial balance from a ledger snapshot, optionally in a foreign
//! currency, and writes the export to stdout.

mod snapshot;

use std::env;
use std::io::{self, Write as _};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapshot::Snapshot;
use tbfx_core::reports::{
    BaseTrialBalance, CurrencyTrialBalance, ExportFormat, JsonRenderer, ReportContext,
    ReportOptions, TrialBalanceReport,
};
use tbfx_shared::{AppConfig, AppError, AppResult};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        let code = error.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the export
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tbfx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let options = parse_cli_args(env::args().skip(1))?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    let config = match &options.config_dir {
        Some(dir) => AppConfig::load_from(dir),
        None => AppConfig::load(),
    }
    .map_err(AppError::from)
    .with_context(|| {
        format!(
            "load config from {}",
            options.config_dir.as_deref().unwrap_or("config")
        )
    })?;

    let snapshot_path = options
        .snapshot
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.snapshot.path));
    let snapshot = Snapshot::load(&snapshot_path)?;

    let mut ctx = ReportContext {
        currency: None,
        print_mode: options.print || config.report.print_mode,
    };
    if let Some(code) = &options.currency {
        ctx = ctx.with_currency(snapshot.currency_id(code)?);
    }

    let book = &snapshot.book;
    let report = CurrencyTrialBalance::new(
        BaseTrialBalance::new(book, &config.report),
        book,
        &config.report,
    );
    let previous = ReportOptions {
        periods: snapshot.periods.clone(),
        hierarchy: !options.flat,
        ..ReportOptions::default()
    };
    let report_options = report.options(Some(&previous), &ctx).map_err(AppError::from)?;

    info!(
        format = %options.format,
        periods = report_options.periods.len(),
        print_mode = ctx.print_mode,
        "rendering trial balance"
    );
    let bytes = report
        .export(&JsonRenderer { pretty: true }, options.format, &report_options, &ctx)
        .map_err(AppError::from)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes).context("write export to stdout")?;
    stdout.write_all(b"\n").context("write export to stdout")?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_dir: Option<String>,
    snapshot: Option<PathBuf>,
    currency: Option<String>,
    format: ExportFormat,
    print: bool,
    flat: bool,
    show_help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config_dir: None,
            snapshot: None,
            currency: None,
            format: ExportFormat::Pdf,
            print: false,
            flat: false,
            show_help: false,
        }
    }
}

fn parse_cli_args<I, S>(args: I) -> AppResult<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| AppError::Validation("--config requires a directory".into()))?;
                options.config_dir = Some(value.as_ref().to_string());
            }
            "--snapshot" => {
                let value = iter
                    .next()
                    .ok_or_else(|| AppError::Validation("--snapshot requires a file path".into()))?;
                options.snapshot = Some(PathBuf::from(value.as_ref()));
            }
            "--currency" => {
                let value = iter
                    .next()
                    .ok_or_else(|| AppError::Validation("--currency requires a code".into()))?;
                options.currency = Some(value.as_ref().to_string());
            }
            "--format" => {
                let value = iter
                    .next()
                    .ok_or_else(|| AppError::Validation("--format requires pdf or xlsx".into()))?;
                options.format = value.as_ref().parse().map_err(AppError::Validation)?;
            }
            "--print" => {
                options.print = true;
            }
            "--flat" => {
                options.flat = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(AppError::Validation(format!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                )));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("tbfx - trial balance export");
    println!("  --config <dir>       Config directory (default: config)");
    println!("  --snapshot <path>    Ledger snapshot, overrides [snapshot].path");
    println!("  --currency <code>    Render in this currency instead of the company one");
    println!("  --format <pdf|xlsx>  Export format (default: pdf)");
    println!("  --print              Print mode: full names, every group expanded");
    println!("  --flat               Skip the account group hierarchy");
    println!("  --help               Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let options = parse_cli_args(Vec::<String>::new()).unwrap();
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.format, ExportFormat::Pdf);
        assert_eq!(options.config_dir, None);
    }

    #[test]
    fn test_all_flags() {
        let options = parse_cli_args([
            "--config",
            "/etc/tbfx",
            "--snapshot",
            "book.json",
            "--currency",
            "EUR",
            "--format",
            "XLSX",
            "--print",
            "--flat",
        ])
        .unwrap();
        assert_eq!(
            options,
            CliOptions {
                config_dir: Some("/etc/tbfx".into()),
                snapshot: Some(PathBuf::from("book.json")),
                currency: Some("EUR".into()),
                format: ExportFormat::Xlsx,
                print: true,
                flat: true,
                show_help: false,
            }
        );
    }

    #[rstest]
    #[case(&["-h"])]
    #[case(&["--help"])]
    fn test_help(#[case] args: &[&str]) {
        assert!(parse_cli_args(args.iter()).unwrap().show_help);
    }

    #[test]
    fn test_demo_snapshot_exports_in_selected_currency() {
        let snapshot = Snapshot::parse(include_str!("../../../demos/ledger.json")).unwrap();
        let config = tbfx_shared::ReportConfig::default();
        let book = &snapshot.book;
        let report = CurrencyTrialBalance::new(BaseTrialBalance::new(book, &config), book, &config);

        let ctx = ReportContext::default().with_currency(snapshot.currency_id("EUR").unwrap());
        let previous = ReportOptions {
            periods: snapshot.periods.clone(),
            hierarchy: true,
            ..ReportOptions::default()
        };
        let options = report.options(Some(&previous), &ctx).unwrap();
        let bytes = report
            .export(&JsonRenderer::default(), ExportFormat::Pdf, &options, &ReportContext::default())
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["currency"]["name"], "EUR");
        let names: Vec<&str> = value["lines"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|line| line["name"].as_str())
            .collect();
        assert_eq!(names.first(), Some(&"1 Assets"));
        assert!(names.contains(&"(No Group)"));
        assert_eq!(names.last(), Some(&"Total"));
    }

    #[rstest]
    #[case(&["--currency"])]
    #[case(&["--format", "csv"])]
    #[case(&["--bogus"])]
    fn test_invalid_arguments(#[case] args: &[&str]) {
        let error = parse_cli_args(args.iter()).unwrap_err();
        assert_eq!(error.exit_code(), 2);
    }
}

mod report;
mod screen;

use std::path::Path;
use std::sync::Arc;

use ampscan_core::{Screener, ScreenerConfig, StaticHttpClient, TradeDate};
use serde_json::Value;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Envelope, Metadata, RunId};
use crate::output::TableView;

pub struct CommandResult {
    pub date: TradeDate,
    pub data: Value,
    pub table: TableView,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
    pub cache_hit: bool,
}

impl CommandResult {
    pub fn ok(date: TradeDate, data: Value, table: TableView) -> Self {
        Self {
            date,
            data,
            table,
            warnings: Vec::new(),
            latency_ms: 0,
            cache_hit: false,
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli, run_id: RunId) -> Result<(Envelope<Value>, TableView), CliError> {
    let config = load_config(cli)?;
    let (screener, warnings) = build_screener(cli, &config).await?;

    let result = match &cli.command {
        Command::Screen(args) => screen::run(args, &screener, &config).await?,
        Command::Report(args) => report::run(args, &screener).await?,
    }
    .with_warnings(warnings);

    let meta = Metadata::new(run_id, result.date, result.latency_ms, result.cache_hit)
        .with_warnings(result.warnings);
    Ok((
        Envelope {
            meta,
            data: result.data,
        },
        result.table,
    ))
}

/// File and environment layers, then the global CLI flags on top.
fn load_config(cli: &Cli) -> Result<ScreenerConfig, CliError> {
    let mut config = ScreenerConfig::load(cli.config.as_deref())?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.fetch.timeout_ms = timeout_ms;
    }
    if cli.insecure {
        config.fetch.accept_invalid_certs = true;
    }
    Ok(config)
}

async fn build_screener(
    cli: &Cli,
    config: &ScreenerConfig,
) -> Result<(Screener, Vec<String>), CliError> {
    let mut warnings = Vec::new();

    if let Some(path) = cli.report_file.as_deref() {
        let body = read_report_file(path).await?;
        info!(path = %path.display(), "serving report from file");
        warnings.push(format!("report read from {}", path.display()));
        let client = Arc::new(StaticHttpClient::ok(body));
        return Ok((Screener::with_client(client, config), warnings));
    }

    if config.fetch.accept_invalid_certs {
        warnings.push(String::from("TLS certificate validation disabled"));
    }
    Ok((Screener::from_config(config)?, warnings))
}

async fn read_report_file(path: &Path) -> Result<String, CliError> {
    Ok(tokio::fs::read_to_string(path).await?)
}

/// `--date` value, or today in exchange time when absent.
pub(crate) fn resolve_date(raw: Option<&str>) -> Result<TradeDate, CliError> {
    Ok(raw
        .map(TradeDate::parse)
        .transpose()?
        .unwrap_or_else(TradeDate::today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn explicit_date_accepts_both_forms() {
        let iso = resolve_date(Some("2024-10-18")).expect("iso date");
        let compact = resolve_date(Some("20241018")).expect("compact date");
        assert_eq!(iso, compact);
    }

    #[test]
    fn malformed_date_is_a_validation_error() {
        let error = resolve_date(Some("2024/10/18")).expect_err("must fail");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn cli_flags_override_config_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"fetch": {{"timeout_ms": 4000}}}}"#).expect("write config");
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from([
            "ampscan",
            "report",
            "--config",
            path.as_str(),
            "--timeout-ms",
            "1500",
            "--insecure",
        ])
        .expect("arguments should parse");

        let config = load_config(&cli).expect("config should load");
        assert_eq!(config.fetch.timeout_ms, 1500);
        assert!(config.fetch.accept_invalid_certs);
    }

    fn inverted_file_thresholds() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"filter": {{"min_volume_lots": 3000}}}}"#).expect("write config");
        file
    }

    #[test]
    fn screen_flag_can_repair_file_thresholds() {
        // Given: A file raising the minimum above the default maximum
        let file = inverted_file_thresholds();
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "ampscan",
            "screen",
            "--config",
            path.as_str(),
            "--max-volume",
            "5000",
        ])
        .expect("arguments should parse");

        // When: The layers are combined
        let config = load_config(&cli).expect("file layer alone is not validated");
        let Command::Screen(args) = &cli.command else {
            panic!("expected screen command");
        };
        let criteria = screen::criteria_from(args, config.filter);

        // Then: The final criteria span 3000..=5000 lots and are valid
        assert_eq!(criteria.min_volume_lots, 3_000);
        assert_eq!(criteria.max_volume_lots, 5_000);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn report_ignores_unused_inverted_thresholds() {
        let file = inverted_file_thresholds();
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["ampscan", "report", "--config", path.as_str()])
            .expect("arguments should parse");

        assert!(load_config(&cli).is_ok());
    }

    #[tokio::test]
    async fn inverted_final_criteria_exit_as_invalid_criteria() {
        let file = inverted_file_thresholds();
        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "ampscan",
            "screen",
            "--config",
            path.as_str(),
        ])
        .expect("arguments should parse");
        let config = load_config(&cli).expect("config loads");
        let Command::Screen(args) = &cli.command else {
            panic!("expected screen command");
        };

        let client = Arc::new(StaticHttpClient::ok(String::new()));
        let screener = Screener::with_client(client.clone(), &config);
        let error = screen::run(args, &screener, &config)
            .await
            .err()
            .expect("inverted range must fail");

        assert_eq!(error.exit_code(), 2);
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn missing_report_file_is_an_io_error() {
        let cli = Cli::try_parse_from([
            "ampscan",
            "report",
            "--report-file",
            "/nonexistent/ampscan/report.html",
        ])
        .expect("arguments should parse");

        let error = build_screener(&cli, &ScreenerConfig::default())
            .await
            .err()
            .expect("must fail");
        assert_eq!(error.exit_code(), 10);
    }
}

//! CLI argument definitions for ampscan.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `screen` | Shortlist instruments by volume band and amplitude |
//! | `report` | Show the full derived report table for a date |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--config` | none | JSON configuration file |
//! | `--insecure` | `false` | Skip TLS certificate validation |
//! | `--timeout-ms` | config | Request timeout in ms |
//! | `--report-file` | none | Read the report from a saved HTML file |
//!
//! # Examples
//!
//! ```bash
//! # Screen today's session with the default thresholds
//! ampscan screen
//!
//! # Screen a past session with a wider band, as JSON
//! ampscan screen --date 2024-10-18 --max-volume 5000 --format json --pretty
//!
//! # Inspect why rows were excluded
//! ampscan report --date 20241018 --show-dropped
//! ```

use std::path::PathBuf;

use ampscan_core::TieBreak;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Daily exchange report screener ranked by intraday amplitude.
#[derive(Debug, Parser)]
#[command(
    name = "ampscan",
    author,
    version,
    about = "Daily exchange report screener ranked by intraday amplitude",
    long_about = "ampscan fetches the exchange's daily closing report, derives each \
instrument's previous close and intraday amplitude, and shortlists instruments \
whose volume falls in a band and whose amplitude exceeds a threshold.\n\
\n\
Use 'ampscan <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// JSON configuration file; environment variables override its values.
    #[arg(long, global = true, env = "AMPSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Accept invalid server certificates (disables TLS verification).
    #[arg(long, global = true, default_value_t = false)]
    pub insecure: bool,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Read the report from a saved HTML file instead of the network.
    #[arg(long, global = true)]
    pub report_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shortlist instruments whose volume is in band and amplitude exceeds the threshold.
    ///
    /// # Examples
    ///
    ///   ampscan screen
    ///   ampscan screen --date 2024-10-18 --min-amplitude 8 --limit 5
    Screen(ScreenArgs),

    /// Show every admitted row with its derived metrics.
    ///
    /// # Examples
    ///
    ///   ampscan report --date 20241018
    ///   ampscan report --show-dropped --format json
    Report(ReportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ScreenArgs {
    /// Trading date (YYYY-MM-DD or YYYYMMDD); defaults to today in exchange time.
    #[arg(long)]
    pub date: Option<String>,

    /// Minimum volume in lots of 1000 shares (inclusive).
    #[arg(long)]
    pub min_volume: Option<u64>,

    /// Maximum volume in lots of 1000 shares (inclusive).
    #[arg(long)]
    pub max_volume: Option<u64>,

    /// Amplitude threshold in percent; rows must exceed it.
    #[arg(long)]
    pub min_amplitude: Option<f64>,

    /// Maximum number of rows returned.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Ordering among equal amplitudes.
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Trading date (YYYY-MM-DD or YYYYMMDD); defaults to today in exchange time.
    #[arg(long)]
    pub date: Option<String>,

    /// Include rows excluded during cleaning, with their reasons.
    #[arg(long, default_value_t = false)]
    pub show_dropped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TieBreakArg {
    /// Keep report table order.
    Table,
    /// Ascending instrument code.
    Code,
}

impl From<TieBreakArg> for TieBreak {
    fn from(value: TieBreakArg) -> Self {
        match value {
            TieBreakArg::Table => TieBreak::TableOrder,
            TieBreakArg::Code => TieBreak::InstrumentCode,
        }
    }
}

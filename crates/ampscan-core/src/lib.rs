//! # Ampscan Core
//!
//! Daily exchange report pipeline that shortlists instruments by intraday amplitude.
//!
//! ## Overview
//!
//! One invocation processes one trading session:
//!
//! ```text
//! TradeDate ──▶ fetch ──▶ parse ──▶ normalize ──▶ metrics ──▶ filter ──▶ ScreenView rows
//!               RawReport  RawTable  CleanRow      ReportTable  FilteredResult
//! ```
//!
//! Each stage returns either a refined structure or a [`ScreenError`] that
//! halts the pipeline. The error's [`ScreenErrorKind`] tells a caller whether
//! to try later (market closed), retry (network) or investigate (parse).
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Per-date, time-bounded report table cache |
//! | [`config`] | Layered configuration (defaults, JSON file, environment) |
//! | [`domain`] | Domain types (TradeDate, InstrumentCode, rows, tables) |
//! | [`error`] | Validation and pipeline error types |
//! | [`fetcher`] | Report retrieval |
//! | [`filter`] | Volume/amplitude screening and ranking |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metrics`] | Previous close and amplitude derivation |
//! | [`normalizer`] | Cell cleaning and row admission |
//! | [`parser`] | Report table extraction |
//! | [`pipeline`] | The composed screener |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ampscan_core::{FilterCriteria, Screener, ScreenerConfig, TradeDate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScreenerConfig::load(None)?;
//!     let screener = Screener::from_config(&config)?;
//!
//!     let date = TradeDate::parse("2024-10-18")?;
//!     let outcome = screener.fetch_and_filter(date, &FilterCriteria::default()).await?;
//!
//!     for row in outcome.result.view() {
//!         println!("{} {:.2}%", row.code, row.amplitude_percent);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! Certificate validation is on by default. Disabling it is an explicit
//! [`TlsPolicy::AcceptInvalidCerts`] decision made by whoever builds the
//! transport, and is logged when taken.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod http_client;
pub mod metrics;
pub mod normalizer;
pub mod parser;
pub mod pipeline;

pub use cache::ReportCache;

pub use config::{FetchConfig, ScreenerConfig};

pub use domain::{
    CleanRow, DropReason, DroppedRow, InstrumentCode, InstrumentRow, RawReport, RawTable,
    ReportTable, ScreenView, TradeDate,
};

pub use error::{CoreError, ScreenError, ScreenErrorKind, ValidationError};

pub use fetcher::ReportFetcher;

pub use filter::{filter, FilterCriteria, FilteredResult, TieBreak, SHARES_PER_LOT};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
    TlsPolicy,
};

pub use metrics::{build_table, compute_metrics};

pub use normalizer::{normalize, NormalizedTable};

pub use parser::parse_report;

pub use pipeline::{table_from_report, LoadedTable, ScreenOutcome, Screener};

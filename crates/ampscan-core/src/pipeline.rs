//! End-to-end screening: fetch → parse → normalize → metrics → filter.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::cache::ReportCache;
use crate::config::ScreenerConfig;
use crate::fetcher::ReportFetcher;
use crate::filter::{filter, FilterCriteria, FilteredResult};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::metrics::build_table;
use crate::normalizer::normalize;
use crate::parser::parse_report;
use crate::{RawReport, ReportTable, ScreenError, TradeDate};

/// Build a [`ReportTable`] from an already fetched document.
pub fn table_from_report(report: &RawReport) -> Result<ReportTable, ScreenError> {
    let raw = parse_report(report)?;
    let normalized = normalize(&raw)?;
    Ok(build_table(report.date, normalized))
}

/// Report table plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Arc<ReportTable>,
    pub cache_hit: bool,
    pub latency_ms: u64,
}

/// Outcome of [`Screener::fetch_and_filter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenOutcome {
    pub date: TradeDate,
    pub cache_hit: bool,
    pub latency_ms: u64,
    /// Rows admitted into the report table.
    pub table_rows: usize,
    /// Rows excluded while cleaning or deriving metrics.
    pub dropped_rows: usize,
    pub criteria: FilterCriteria,
    pub result: FilteredResult,
}

/// Screening pipeline bound to a fetcher and a report cache.
#[derive(Clone)]
pub struct Screener {
    fetcher: ReportFetcher,
    cache: ReportCache,
}

impl Screener {
    pub fn new(fetcher: ReportFetcher, cache: ReportCache) -> Self {
        Self { fetcher, cache }
    }

    /// Screener using the reqwest transport with the configured TLS policy.
    pub fn from_config(config: &ScreenerConfig) -> Result<Self, ScreenError> {
        let client = ReqwestHttpClient::new(config.fetch.tls_policy())
            .map_err(|error| ScreenError::internal(error.message().to_owned()))?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    pub fn with_client(http_client: Arc<dyn HttpClient>, config: &ScreenerConfig) -> Self {
        Self::new(
            ReportFetcher::new(http_client, config.fetch.clone()),
            ReportCache::new(config.cache_ttl()),
        )
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// Cached table for `date`, or a freshly fetched and built one.
    ///
    /// Only successfully built tables are cached; failures are returned as-is
    /// and the next call tries the upstream again.
    pub async fn load_table(&self, date: TradeDate) -> Result<LoadedTable, ScreenError> {
        let started = Instant::now();
        if let Some(table) = self.cache.get(date).await {
            info!(%date, rows = table.len(), "report table served from cache");
            return Ok(LoadedTable {
                table,
                cache_hit: true,
                latency_ms: elapsed_ms(started),
            });
        }

        let report = self.fetcher.fetch_report(date).await?;
        let table = Arc::new(table_from_report(&report)?);
        self.cache.put(Arc::clone(&table)).await;

        Ok(LoadedTable {
            table,
            cache_hit: false,
            latency_ms: elapsed_ms(started),
        })
    }

    /// Run the whole pipeline for `date` and screen the table with `criteria`.
    ///
    /// # Errors
    ///
    /// Invalid criteria are rejected before any request is made. Otherwise the
    /// first failing stage's error is returned. A table with no matching rows
    /// yields an empty result, not an error.
    pub async fn fetch_and_filter(
        &self,
        date: TradeDate,
        criteria: &FilterCriteria,
    ) -> Result<ScreenOutcome, ScreenError> {
        criteria.validate().map_err(ScreenError::invalid_criteria)?;

        async {
            let loaded = self.load_table(date).await?;
            let result = filter(&loaded.table, criteria);
            info!(
                matched = result.matched,
                returned = result.len(),
                cache_hit = loaded.cache_hit,
                "screen complete"
            );

            Ok::<_, ScreenError>(ScreenOutcome {
                date,
                cache_hit: loaded.cache_hit,
                latency_ms: loaded.latency_ms,
                table_rows: loaded.table.len(),
                dropped_rows: loaded.table.dropped.len(),
                criteria: *criteria,
                result,
            })
        }
        .instrument(info_span!("screen", %date))
        .await
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

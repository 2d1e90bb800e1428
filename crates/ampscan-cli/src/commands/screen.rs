use ampscan_core::{FilterCriteria, ScreenView, Screener, ScreenerConfig};
use serde::Serialize;

use crate::cli::ScreenArgs;
use crate::error::CliError;
use crate::output::TableView;

use super::{resolve_date, CommandResult};

#[derive(Debug, Serialize)]
struct ScreenResponseData {
    criteria: FilterCriteria,
    table_rows: usize,
    dropped_rows: usize,
    matched: usize,
    rows: Vec<ScreenView>,
}

pub async fn run(
    args: &ScreenArgs,
    screener: &Screener,
    config: &ScreenerConfig,
) -> Result<CommandResult, CliError> {
    let date = resolve_date(args.date.as_deref())?;
    let criteria = criteria_from(args, config.filter);

    let outcome = screener.fetch_and_filter(date, &criteria).await?;
    let rows = outcome.result.view();
    let table = screen_table(&rows, outcome.result.matched);

    let data = serde_json::to_value(ScreenResponseData {
        criteria: outcome.criteria,
        table_rows: outcome.table_rows,
        dropped_rows: outcome.dropped_rows,
        matched: outcome.result.matched,
        rows,
    })?;

    Ok(CommandResult::ok(outcome.date, data, table)
        .with_latency(outcome.latency_ms)
        .with_cache_hit(outcome.cache_hit))
}

/// Configured thresholds with any per-invocation overrides applied.
pub(super) fn criteria_from(args: &ScreenArgs, base: FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        min_volume_lots: args.min_volume.unwrap_or(base.min_volume_lots),
        max_volume_lots: args.max_volume.unwrap_or(base.max_volume_lots),
        min_amplitude_percent: args.min_amplitude.unwrap_or(base.min_amplitude_percent),
        max_results: args.limit.unwrap_or(base.max_results),
        tie_break: args.tie_break.map_or(base.tie_break, Into::into),
    }
}

fn screen_table(rows: &[ScreenView], matched: usize) -> TableView {
    let mut table = TableView::new(&[
        "code", "volume", "open", "high", "low", "close", "amplitude%",
    ]);
    for row in rows {
        table.push_row(vec![
            row.code.to_string(),
            row.volume.to_string(),
            format!("{:.2}", row.open),
            format!("{:.2}", row.high),
            format!("{:.2}", row.low),
            format!("{:.2}", row.close),
            format!("{:.3}", row.amplitude_percent),
        ]);
    }
    table.push_note(format!("{} of {matched} matching rows shown", rows.len()));
    table
}

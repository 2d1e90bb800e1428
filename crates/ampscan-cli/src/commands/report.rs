use ampscan_core::{DroppedRow, InstrumentRow, Screener};
use serde::Serialize;

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output::TableView;

use super::{resolve_date, CommandResult};

#[derive(Debug, Serialize)]
struct ReportResponseData<'a> {
    row_count: usize,
    dropped_count: usize,
    rows: &'a [InstrumentRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    dropped: Option<&'a [DroppedRow]>,
}

pub async fn run(args: &ReportArgs, screener: &Screener) -> Result<CommandResult, CliError> {
    let date = resolve_date(args.date.as_deref())?;
    let loaded = screener.load_table(date).await?;
    let table = &loaded.table;

    let dropped = args.show_dropped.then_some(table.dropped.as_slice());
    let data = serde_json::to_value(ReportResponseData {
        row_count: table.len(),
        dropped_count: table.dropped.len(),
        rows: &table.rows,
        dropped,
    })?;

    let mut view = TableView::new(&[
        "code", "volume", "open", "high", "low", "close", "change", "prev_close", "amplitude%",
    ]);
    for row in &table.rows {
        view.push_row(vec![
            row.code.to_string(),
            row.volume.to_string(),
            format!("{:.2}", row.open),
            format!("{:.2}", row.high),
            format!("{:.2}", row.low),
            format!("{:.2}", row.close),
            format!("{:+.2}", row.change),
            format!("{:.2}", row.previous_close),
            format!("{:.3}", row.amplitude_percent),
        ]);
    }
    view.push_note(format!(
        "{} rows admitted, {} dropped",
        table.len(),
        table.dropped.len()
    ));
    if let Some(dropped) = dropped {
        for row in dropped {
            view.push_note(format!("dropped row {} ({}): {}", row.row, row.code, row.reason));
        }
    }

    Ok(CommandResult::ok(table.date, data, view)
        .with_latency(loaded.latency_ms)
        .with_cache_hit(loaded.cache_hit))
}

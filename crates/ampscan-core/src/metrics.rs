//! Derived per-row volatility metrics.

use tracing::{debug, info};

use crate::normalizer::NormalizedTable;
use crate::{CleanRow, DropReason, DroppedRow, InstrumentRow, ReportTable, TradeDate};

/// Derive previous close and amplitude percent for one row.
///
/// `previous_close = close - change` and
/// `amplitude_percent = (high - low) / previous_close * 100`.
///
/// A previous close that is zero, negative or not finite leaves the ratio
/// undefined; such rows are rejected with
/// [`DropReason::NonPositivePreviousClose`] instead of carrying NaN or infinity.
pub fn compute_metrics(row: CleanRow) -> Result<InstrumentRow, DropReason> {
    let previous_close = row.close - row.change;
    if !previous_close.is_finite() || previous_close <= 0.0 {
        return Err(DropReason::NonPositivePreviousClose);
    }

    let amplitude_percent = (row.high - row.low) / previous_close * 100.0;
    if !amplitude_percent.is_finite() {
        return Err(DropReason::NonPositivePreviousClose);
    }

    Ok(InstrumentRow {
        code: row.code,
        volume: row.volume,
        trade_count: row.trade_count,
        turnover: row.turnover,
        open: row.open,
        high: row.high,
        low: row.low,
        close: row.close,
        change: row.change,
        previous_close,
        amplitude_percent,
    })
}

/// Apply [`compute_metrics`] to every normalized row and assemble the report table.
pub fn build_table(date: TradeDate, normalized: NormalizedTable) -> ReportTable {
    let NormalizedTable { rows, mut dropped } = normalized;
    let mut admitted = Vec::with_capacity(rows.len());

    for row in rows {
        let index = row.row;
        let code = row.code.to_string();
        match compute_metrics(row) {
            Ok(instrument) => admitted.push(instrument),
            Err(reason) => {
                debug!(row = index, code = %code, %reason, "dropping report row");
                dropped.push(DroppedRow {
                    row: index,
                    code,
                    reason,
                });
            }
        }
    }

    dropped.sort_by_key(|entry| entry.row);
    info!(%date, rows = admitted.len(), dropped = dropped.len(), "built report table");
    ReportTable::new(date, admitted, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstrumentCode;

    fn row(open: f64, high: f64, low: f64, close: f64, change: f64) -> CleanRow {
        CleanRow {
            row: 0,
            code: InstrumentCode::parse("2330").expect("code"),
            volume: 600_000,
            trade_count: None,
            turnover: None,
            open,
            high,
            low,
            close,
            change,
        }
    }

    #[test]
    fn rising_close_derives_previous_close_and_amplitude() {
        let metrics = compute_metrics(row(100.0, 110.0, 95.0, 105.0, 5.0)).expect("defined");
        assert!((metrics.previous_close - 100.0).abs() < 1e-9);
        assert!((metrics.amplitude_percent - 15.0).abs() < 1e-9);
    }

    #[test]
    fn falling_close_uses_higher_previous_close() {
        let metrics = compute_metrics(row(100.0, 110.0, 95.0, 105.0, -5.0)).expect("defined");
        assert!((metrics.previous_close - 110.0).abs() < 1e-9);
        assert!((metrics.amplitude_percent - 15.0 / 110.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_previous_close_is_excluded() {
        let error = compute_metrics(row(5.0, 5.0, 5.0, 5.0, 5.0)).expect_err("undefined ratio");
        assert_eq!(error, DropReason::NonPositivePreviousClose);
    }

    #[test]
    fn build_table_merges_metric_drops_in_row_order() {
        let mut bad = row(5.0, 5.0, 5.0, 5.0, 5.0);
        bad.row = 0;
        bad.code = InstrumentCode::parse("0050").expect("code");
        let mut good = row(100.0, 110.0, 95.0, 105.0, 5.0);
        good.row = 2;

        let normalized = NormalizedTable {
            rows: vec![bad, good],
            dropped: vec![DroppedRow {
                row: 1,
                code: String::from("1103"),
                reason: DropReason::MissingClose,
            }],
        };
        let table = build_table(TradeDate::parse("20241018").expect("date"), normalized);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.dropped.iter().map(|d| d.row).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(table.dropped[0].reason, DropReason::NonPositivePreviousClose);
    }
}

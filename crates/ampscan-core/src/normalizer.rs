//! Cell cleaning, sign resolution and row admission.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::parser::{
    COL_CHANGE, COL_CHANGE_SIGN, COL_CLOSE, COL_CODE, COL_HIGH, COL_LOW, COL_OPEN,
    COL_TRADE_COUNT, COL_TURNOVER, COL_VOLUME,
};
use crate::{CleanRow, DropReason, DroppedRow, InstrumentCode, RawTable, ScreenError};

/// Rows admitted by [`normalize`] plus the ones it rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    pub rows: Vec<CleanRow>,
    pub dropped: Vec<DroppedRow>,
}

struct Columns {
    code: usize,
    volume: usize,
    trade_count: Option<usize>,
    turnover: Option<usize>,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    sign: usize,
    change: usize,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self, ScreenError> {
        let required = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| ScreenError::parse(format!("report table has no '{name}' column")))
        };

        Ok(Self {
            code: required(COL_CODE)?,
            volume: required(COL_VOLUME)?,
            trade_count: table.column_index(COL_TRADE_COUNT),
            turnover: table.column_index(COL_TURNOVER),
            open: required(COL_OPEN)?,
            high: required(COL_HIGH)?,
            low: required(COL_LOW)?,
            close: required(COL_CLOSE)?,
            sign: required(COL_CHANGE_SIGN)?,
            change: required(COL_CHANGE)?,
        })
    }
}

/// Clean every row of `table` into numeric fields.
///
/// The name and sign-marker columns are not carried over. A row whose close
/// cannot be read is dropped; so is any row missing another numeric field,
/// an invalid code, or a code already seen earlier in the table.
pub fn normalize(table: &RawTable) -> Result<NormalizedTable, ScreenError> {
    let columns = Columns::resolve(table)?;
    let mut normalized = NormalizedTable::default();
    let mut seen = HashSet::new();

    for (index, cells) in table.rows.iter().enumerate() {
        let cell = |column: usize| cells.get(column).map(|text| clean_cell(text));
        let raw_code = cell(columns.code).unwrap_or_default();

        match clean_row(index, &columns, &cell) {
            Ok(row) if !seen.insert(row.code.clone()) => {
                normalized.dropped.push(drop_row(index, raw_code, DropReason::DuplicateCode));
            }
            Ok(row) => normalized.rows.push(row),
            Err(reason) => normalized.dropped.push(drop_row(index, raw_code, reason)),
        }
    }

    info!(
        admitted = normalized.rows.len(),
        dropped = normalized.dropped.len(),
        "normalized report rows"
    );
    Ok(normalized)
}

fn clean_row(
    index: usize,
    columns: &Columns,
    cell: &dyn Fn(usize) -> Option<String>,
) -> Result<CleanRow, DropReason> {
    let number = |column: usize| cell(column).as_deref().and_then(parse_number);
    let count = |column: usize| cell(column).as_deref().and_then(parse_count);
    let field = |value: Option<f64>, name: &str| {
        value.ok_or_else(|| DropReason::MissingField {
            field: name.to_owned(),
        })
    };

    let close = number(columns.close).ok_or(DropReason::MissingClose)?;
    let code = cell(columns.code)
        .as_deref()
        .map(InstrumentCode::parse)
        .and_then(Result::ok)
        .ok_or(DropReason::InvalidCode)?;

    let volume = count(columns.volume).ok_or_else(|| DropReason::MissingField {
        field: String::from("volume"),
    })?;
    let open = field(number(columns.open), "open")?;
    let high = field(number(columns.high), "high")?;
    let low = field(number(columns.low), "low")?;
    let magnitude = field(number(columns.change), "change")?;
    let negative = cell(columns.sign).is_some_and(|marker| marker.contains('-'));

    Ok(CleanRow {
        row: index,
        code,
        volume,
        trade_count: columns.trade_count.and_then(count),
        turnover: columns.turnover.and_then(count),
        open,
        high,
        low,
        close,
        change: if negative { -magnitude } else { magnitude },
    })
}

fn drop_row(index: usize, code: String, reason: DropReason) -> DroppedRow {
    debug!(row = index, code = %code, %reason, "dropping report row");
    DroppedRow {
        row: index,
        code,
        reason,
    }
}

/// Trim and strip thousands separators.
pub fn clean_cell(text: &str) -> String {
    text.trim().replace(',', "")
}

/// Finite decimal, or `None` for placeholders such as `--` or an empty cell.
pub fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_count(text: &str) -> Option<u64> {
    text.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 11]]) -> RawTable {
        RawTable {
            columns: [
                "證券代號",
                "證券名稱",
                "成交股數",
                "成交筆數",
                "成交金額",
                "開盤價",
                "最高價",
                "最低價",
                "收盤價",
                "漲跌(+/-)",
                "漲跌價差",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn strips_commas_and_resolves_negative_sign() {
        let normalized = normalize(&table(&[[
            "2330", "台積電", "600,000", "1,234", "63,000,000", "100", "110", "95", "105", "-",
            "5.00",
        ]]))
        .expect("columns present");

        let row = &normalized.rows[0];
        assert_eq!(row.volume, 600_000);
        assert_eq!(row.trade_count, Some(1_234));
        assert_eq!(row.turnover, Some(63_000_000));
        assert_eq!(row.change, -5.0);
    }

    #[test]
    fn positive_and_unmarked_changes_keep_magnitude() {
        let normalized = normalize(&table(&[
            ["1101", "台泥", "1,000", "1", "1", "30", "31", "29", "30.5", "+", "0.50"],
            ["1102", "亞泥", "1,000", "1", "1", "40", "41", "39", "40", "X", "0.00"],
        ]))
        .expect("columns present");

        assert_eq!(normalized.rows[0].change, 0.5);
        assert_eq!(normalized.rows[1].change, 0.0);
    }

    #[test]
    fn missing_close_is_dropped_not_kept() {
        let normalized = normalize(&table(&[[
            "1103", "嘉泥", "0", "0", "0", "--", "--", "--", "--", " ", "0.00",
        ]]))
        .expect("columns present");

        assert!(normalized.rows.is_empty());
        assert_eq!(normalized.dropped[0].reason, DropReason::MissingClose);
        assert_eq!(normalized.dropped[0].code, "1103");
    }

    #[test]
    fn records_missing_fields_invalid_codes_and_duplicates() {
        let normalized = normalize(&table(&[
            ["2330", "台積電", "600,000", "1", "1", "100", "110", "95", "105", "+", "5"],
            ["2330", "台積電", "600,000", "1", "1", "100", "110", "95", "105", "+", "5"],
            ["2317", "鴻海", "1,000", "1", "1", "--", "110", "95", "105", "+", "5"],
            ["", "空白", "1,000", "1", "1", "100", "110", "95", "105", "+", "5"],
        ]))
        .expect("columns present");

        assert_eq!(normalized.rows.len(), 1);
        let reasons = normalized
            .dropped
            .iter()
            .map(|dropped| dropped.reason.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            reasons,
            vec![
                DropReason::DuplicateCode,
                DropReason::MissingField {
                    field: String::from("open")
                },
                DropReason::InvalidCode,
            ]
        );
    }

    #[test]
    fn missing_required_column_is_parse_error() {
        let mut raw = table(&[]);
        raw.columns.retain(|column| column != "收盤價");
        let error = normalize(&raw).expect_err("must fail");
        assert_eq!(error.kind(), crate::ScreenErrorKind::Parse);
    }
}

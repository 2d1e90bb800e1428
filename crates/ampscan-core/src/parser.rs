//! Extraction of the all-sessions table from the report document.
//!
//! The report carries several summary tables before the per-instrument one.
//! Rather than trusting position, the parser picks the last table whose
//! flattened header holds every column in [`REQUIRED_COLUMNS`].

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::{RawReport, RawTable, ScreenError};

pub const COL_CODE: &str = "證券代號";
pub const COL_NAME: &str = "證券名稱";
pub const COL_VOLUME: &str = "成交股數";
pub const COL_TRADE_COUNT: &str = "成交筆數";
pub const COL_TURNOVER: &str = "成交金額";
pub const COL_OPEN: &str = "開盤價";
pub const COL_HIGH: &str = "最高價";
pub const COL_LOW: &str = "最低價";
pub const COL_CLOSE: &str = "收盤價";
pub const COL_CHANGE_SIGN: &str = "漲跌(+/-)";
pub const COL_CHANGE: &str = "漲跌價差";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_CODE,
    COL_VOLUME,
    COL_OPEN,
    COL_HIGH,
    COL_LOW,
    COL_CLOSE,
    COL_CHANGE_SIGN,
    COL_CHANGE,
];

/// Parse the report body into a [`RawTable`].
///
/// # Errors
///
/// Returns a `Parse` error when the document has no table at all, or when no
/// table carries the required columns. The message names the columns missing
/// from the closest candidate.
pub fn parse_report(report: &RawReport) -> Result<RawTable, ScreenError> {
    let document = Html::parse_document(&report.body);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("th, td")?;

    let tables = document.select(&table_selector).collect::<Vec<_>>();
    if tables.is_empty() {
        return Err(ScreenError::parse(format!(
            "no table found in report for {}",
            report.date
        )));
    }

    let mut closest: Option<(usize, Vec<&'static str>)> = None;
    for (index, table) in tables.iter().enumerate().rev() {
        let candidate = extract_table(*table, &row_selector, &cell_selector);
        let missing = missing_columns(&candidate);
        if missing.is_empty() {
            debug!(
                table = index,
                columns = candidate.columns.len(),
                rows = candidate.rows.len(),
                "selected report table"
            );
            return Ok(candidate);
        }

        let closer = closest
            .as_ref()
            .map_or(true, |(_, best)| missing.len() < best.len());
        if closer {
            closest = Some((index, missing));
        }
    }

    let (index, missing) = closest.unwrap_or_default();
    Err(ScreenError::parse(format!(
        "none of {} tables has the expected columns; closest (table {index}) is missing: {}",
        tables.len(),
        missing.join(", ")
    )))
}

fn selector(css: &str) -> Result<Selector, ScreenError> {
    Selector::parse(css)
        .map_err(|e| ScreenError::internal(format!("invalid selector '{css}': {e:?}")))
}

/// Header rows (inside `thead`, or made only of `th`) are nested; the last one
/// supplies the column names.
fn extract_table(table: ElementRef<'_>, rows: &Selector, cells: &Selector) -> RawTable {
    let mut extracted = RawTable::default();

    for row in table.select(rows) {
        let texts = row.select(cells).map(cell_text).collect::<Vec<_>>();
        if texts.is_empty() {
            continue;
        }

        if is_header_row(row, cells) {
            extracted.columns = texts;
        } else {
            extracted.rows.push(texts);
        }
    }

    let width = extracted.columns.len();
    for row in &mut extracted.rows {
        if row.len() < width {
            row.resize(width, String::new());
        }
    }

    extracted
}

fn is_header_row(row: ElementRef<'_>, cells: &Selector) -> bool {
    let in_thead = row
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "thead");

    in_thead || row.select(cells).all(|cell| cell.value().name() == "th")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn missing_columns(table: &RawTable) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| table.column_index(required).is_none())
        .collect()
}

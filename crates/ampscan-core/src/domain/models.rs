use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{InstrumentCode, TradeDate};

/// Unparsed report document for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReport {
    pub date: TradeDate,
    pub body: String,
}

impl RawReport {
    pub fn new(date: TradeDate, body: impl Into<String>) -> Self {
        Self {
            date,
            body: body.into(),
        }
    }
}

/// Report table as extracted from the document: flattened column names and cell text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

/// Why a report row was excluded from the [`ReportTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// Closing price absent or non-numeric (halted or untraded listing).
    MissingClose,
    /// A numeric field other than close is absent or non-numeric.
    MissingField { field: String },
    InvalidCode,
    /// The code already appeared earlier in the report.
    DuplicateCode,
    /// `close - change` is zero, negative or not finite, so amplitude is undefined.
    NonPositivePreviousClose,
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingClose => f.write_str("missing close"),
            Self::MissingField { field } => write!(f, "missing {field}"),
            Self::InvalidCode => f.write_str("invalid instrument code"),
            Self::DuplicateCode => f.write_str("duplicate instrument code"),
            Self::NonPositivePreviousClose => f.write_str("non-positive previous close"),
        }
    }
}

/// Row excluded during normalization or metric computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Zero-based index of the row within the report table body.
    pub row: usize,
    /// Raw code text as it appeared in the report.
    pub code: String,
    #[serde(flatten)]
    pub reason: DropReason,
}

/// Normalized numeric fields of one row, before derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub row: usize,
    pub code: InstrumentCode,
    pub volume: u64,
    pub trade_count: Option<u64>,
    pub turnover: Option<u64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Signed price change versus the previous session.
    pub change: f64,
}

/// One traded security for the session, with derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRow {
    pub code: InstrumentCode,
    /// Traded volume in shares.
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<u64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub change: f64,
    pub previous_close: f64,
    pub amplitude_percent: f64,
}

/// Cleaned per-instrument table for one date, unique by instrument code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub date: TradeDate,
    pub rows: Vec<InstrumentRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedRow>,
}

impl ReportTable {
    pub fn new(date: TradeDate, rows: Vec<InstrumentRow>, dropped: Vec<DroppedRow>) -> Self {
        Self {
            date,
            rows,
            dropped,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display projection of a screened row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenView {
    pub code: InstrumentCode,
    pub volume: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub amplitude_percent: f64,
}

impl From<&InstrumentRow> for ScreenView {
    fn from(row: &InstrumentRow) -> Self {
        Self {
            code: row.code.clone(),
            volume: row.volume,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            amplitude_percent: row.amplitude_percent,
        }
    }
}

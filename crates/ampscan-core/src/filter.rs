//! Volume/amplitude screening and ranking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{InstrumentRow, ReportTable, ScreenView, TradeDate, ValidationError};

/// Shares per lot; volume thresholds are expressed in lots.
pub const SHARES_PER_LOT: u64 = 1_000;

/// Ordering applied between rows of equal amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order rows had in the report table.
    #[default]
    TableOrder,
    /// Ascending instrument code.
    InstrumentCode,
}

/// Screening thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Inclusive lower volume bound, in thousands of shares.
    pub min_volume_lots: u64,
    /// Inclusive upper volume bound, in thousands of shares.
    pub max_volume_lots: u64,
    /// Amplitude must be strictly greater than this percentage.
    pub min_amplitude_percent: f64,
    pub max_results: usize,
    pub tie_break: TieBreak,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_volume_lots: 500,
            max_volume_lots: 2_000,
            min_amplitude_percent: 6.318,
            max_results: 13,
            tie_break: TieBreak::TableOrder,
        }
    }
}

impl FilterCriteria {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_volume_lots > self.max_volume_lots {
            return Err(ValidationError::InvertedVolumeRange {
                min: self.min_volume_lots,
                max: self.max_volume_lots,
            });
        }
        if !self.min_amplitude_percent.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "min_amplitude_percent",
            });
        }
        if self.max_results == 0 {
            return Err(ValidationError::ZeroMaxResults);
        }
        Ok(())
    }

    pub fn min_volume_shares(&self) -> u64 {
        self.min_volume_lots.saturating_mul(SHARES_PER_LOT)
    }

    pub fn max_volume_shares(&self) -> u64 {
        self.max_volume_lots.saturating_mul(SHARES_PER_LOT)
    }

    pub fn volume_in_range(&self, volume: u64) -> bool {
        (self.min_volume_shares()..=self.max_volume_shares()).contains(&volume)
    }

    pub fn amplitude_exceeds(&self, amplitude_percent: f64) -> bool {
        amplitude_percent > self.min_amplitude_percent
    }

    pub fn matches(&self, row: &InstrumentRow) -> bool {
        self.volume_in_range(row.volume) && self.amplitude_exceeds(row.amplitude_percent)
    }
}

/// Ranked rows that satisfied the criteria. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredResult {
    pub date: TradeDate,
    /// Number of rows that passed both predicates before truncation.
    pub matched: usize,
    pub rows: Vec<InstrumentRow>,
}

impl FilteredResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn view(&self) -> Vec<ScreenView> {
        self.rows.iter().map(ScreenView::from).collect()
    }
}

/// Keep rows matching both predicates, rank by amplitude descending, truncate.
///
/// The sort is stable, so with [`TieBreak::TableOrder`] equal amplitudes keep
/// their table order. An empty result is a normal outcome.
pub fn filter(table: &ReportTable, criteria: &FilterCriteria) -> FilteredResult {
    let mut rows = table
        .rows
        .iter()
        .filter(|row| criteria.matches(row))
        .cloned()
        .collect::<Vec<_>>();
    let matched = rows.len();

    rows.sort_by(|left, right| {
        let by_amplitude = right.amplitude_percent.total_cmp(&left.amplitude_percent);
        match criteria.tie_break {
            TieBreak::TableOrder => by_amplitude,
            TieBreak::InstrumentCode => by_amplitude.then_with(|| left.code.cmp(&right.code)),
        }
    });
    rows.truncate(criteria.max_results);

    debug!(
        date = %table.date,
        candidates = table.rows.len(),
        matched,
        returned = rows.len(),
        "filtered report table"
    );
    FilteredResult {
        date: table.date,
        matched,
        rows,
    }
}

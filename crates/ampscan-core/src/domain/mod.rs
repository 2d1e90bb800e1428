//! # Domain Models
//!
//! Typed values that flow through the screening pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradeDate`] | Session date, rendered as `YYYYMMDD` for the report query |
//! | [`InstrumentCode`] | Validated security identifier |
//! | [`RawReport`] | Unparsed report document |
//! | [`RawTable`] | Report table as column names plus cell text |
//! | [`CleanRow`] | Numeric fields of one row after normalization |
//! | [`InstrumentRow`] | Row with previous close and amplitude percent |
//! | [`ReportTable`] | All admitted rows for one date plus dropped-row records |
//! | [`ScreenView`] | Display projection of a screened row |
//!
//! Rows that cannot be cleaned are never kept with placeholder values; they are
//! recorded as [`DroppedRow`] with a [`DropReason`] instead.

mod code;
mod models;
mod trade_date;

pub use code::InstrumentCode;
pub use models::{
    CleanRow, DropReason, DroppedRow, InstrumentRow, RawReport, RawTable, ReportTable, ScreenView,
};
pub use trade_date::{TradeDate, EXCHANGE_OFFSET};

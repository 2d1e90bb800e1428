use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::ValidationError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const COMPACT_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

/// Offset of the exchange's local session calendar.
pub const EXCHANGE_OFFSET: UtcOffset = offset!(+8);

/// Calendar date of one trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(Date);

impl TradeDate {
    /// Today's date on the exchange calendar.
    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().to_offset(EXCHANGE_OFFSET).date())
    }

    /// Accepts `YYYY-MM-DD` or the compact `YYYYMMDD` form.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let format = if trimmed.contains('-') {
            ISO_DATE
        } else {
            COMPACT_DATE
        };

        Date::parse(trimmed, format)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTradeDate {
                value: input.to_owned(),
            })
    }

    /// Eight-digit `YYYYMMDD` form used in the report query string.
    pub fn compact(self) -> String {
        format!(
            "{:04}{:02}{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }

    pub fn iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for TradeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso())
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.iso())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_and_compact_forms() {
        let iso = TradeDate::parse("2024-10-18").expect("iso date");
        let compact = TradeDate::parse("20241018").expect("compact date");
        assert_eq!(iso, compact);
        assert_eq!(iso.compact(), "20241018");
        assert_eq!(iso.to_string(), "2024-10-18");
    }

    #[test]
    fn rejects_impossible_dates() {
        let err = TradeDate::parse("2024-02-30").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTradeDate { .. }));
        assert!(TradeDate::parse("18/10/2024").is_err());
    }

    #[test]
    fn serializes_as_iso_string() {
        let date = TradeDate::parse("20240105").expect("date");
        let json = serde_json::to_string(&date).expect("serialize");
        assert_eq!(json, "\"2024-01-05\"");
        let back: TradeDate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, date);
    }
}

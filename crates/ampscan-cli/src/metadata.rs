use std::fmt::{Display, Formatter};

use ampscan_core::TradeDate;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Run identifier (UUID v4) attached to output and log spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Command metadata emitted ahead of the data payload.
///
/// Field order is fixed to keep deterministic JSON serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub run_id: RunId,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub date: TradeDate,
    pub latency_ms: u64,
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(run_id: RunId, date: TradeDate, latency_ms: u64, cache_hit: bool) -> Self {
        Self {
            run_id,
            generated_at: OffsetDateTime::now_utc(),
            date,
            latency_ms,
            cache_hit,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Output envelope: metadata plus command-specific data.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub meta: Metadata,
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_serializes_in_fixed_order_without_empty_warnings() {
        let date = TradeDate::parse("2024-10-18").expect("date");
        let meta = Metadata::new(RunId::new_v4(), date, 42, false);

        let json = serde_json::to_string(&meta).expect("serialize");
        let run = json.find("\"run_id\"").expect("run_id");
        let generated = json.find("\"generated_at\"").expect("generated_at");
        let latency = json.find("\"latency_ms\":42").expect("latency_ms");
        assert!(run < generated && generated < latency);
        assert!(json.contains("\"date\":\"2024-10-18\""));
        assert!(!json.contains("warnings"));
    }

    #[test]
    fn run_id_is_hyphenated_uuid() {
        let id = RunId::new_v4().to_string();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
    }
}

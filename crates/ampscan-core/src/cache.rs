//! Time-bounded, per-date cache of built report tables.
//!
//! Repeated runs for the same date inside the TTL reuse the table instead of
//! hitting the exchange again. This only throttles the upstream; correctness
//! never depends on it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{ReportTable, TradeDate};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct CacheEntry {
    table: Arc<ReportTable>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| now <= expires_at)
    }
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<TradeDate, CacheEntry>,
    ttl: Duration,
}

impl CacheInner {
    fn get(&self, date: TradeDate) -> Option<Arc<ReportTable>> {
        self.map
            .get(&date)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| Arc::clone(&entry.table))
    }

    fn put(&mut self, date: TradeDate, table: Arc<ReportTable>) {
        let expires_at = Instant::now().checked_add(self.ttl);
        self.map.insert(date, CacheEntry { table, expires_at });
    }

    fn clear_expired(&mut self) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.is_live(now));
    }
}

/// Thread-safe report cache keyed by [`TradeDate`].
#[derive(Debug, Clone)]
pub struct ReportCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ReportCache {
    /// A zero `ttl` disables the cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner {
                map: HashMap::new(),
                ttl,
            })),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn get(&self, date: TradeDate) -> Option<Arc<ReportTable>> {
        self.inner.read().await.get(date)
    }

    pub async fn put(&self, table: Arc<ReportTable>) {
        let mut store = self.inner.write().await;
        if store.ttl == Duration::ZERO {
            return;
        }
        store.clear_expired();
        store.put(table.date, table);
    }

    /// Number of entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(date: &str) -> Arc<ReportTable> {
        Arc::new(ReportTable::new(
            TradeDate::parse(date).expect("date"),
            Vec::new(),
            Vec::new(),
        ))
    }

    #[tokio::test]
    async fn returns_table_for_same_date_only() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let stored = table("20241018");
        cache.put(Arc::clone(&stored)).await;

        let hit = cache
            .get(TradeDate::parse("2024-10-18").expect("date"))
            .await
            .expect("cache hit");
        assert!(Arc::ptr_eq(&hit, &stored));
        assert!(cache
            .get(TradeDate::parse("2024-10-17").expect("date"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = ReportCache::new(Duration::from_millis(100));
        cache.put(table("20241018")).await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache
            .get(TradeDate::parse("20241018").expect("date"))
            .await
            .is_none());

        cache.put(table("20241017")).await;
        assert_eq!(cache.len().await, 1, "expired entries are evicted on put");
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache = ReportCache::disabled();
        cache.put(table("20241018")).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn ttl_beyond_instant_range_never_expires() {
        let cache = ReportCache::new(Duration::from_secs(u64::MAX));
        let stored = table("20241018");
        cache.put(Arc::clone(&stored)).await;
        cache.put(table("20241017")).await;

        let hit = cache
            .get(TradeDate::parse("20241018").expect("date"))
            .await
            .expect("cache hit");
        assert!(Arc::ptr_eq(&hit, &stored));
        assert_eq!(cache.len().await, 2);
    }
}

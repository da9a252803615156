//! Cache Statistics Module
//!
//! Point-in-time snapshot of the store plus running hit/miss/eviction counters.

use std::time::Duration;

use serde::Serialize;

// == Counters ==
/// Running counters maintained by the cache between snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries removed because their TTL passed
    pub expirations: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Cache Stats ==
/// Snapshot returned by `stats()`.
///
/// `size`, `expired` and `active` come from a single pass over the store, so
/// `expired + active == size` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Physical entry count, including expired entries not yet swept
    pub size: usize,
    /// Configured capacity, None = unbounded
    pub max_size: Option<usize>,
    /// Configured default TTL, None = never expires
    pub ttl: Option<Duration>,
    /// Entries past their expiry that are still stored
    pub expired: usize,
    /// Entries that are still live
    pub active: usize,
    /// Running counters
    #[serde(flatten)]
    pub counters: CacheCounters,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.counters.hits + self.counters.misses;
        if total == 0 {
            0.0
        } else {
            self.counters.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(counters: CacheCounters) -> CacheStats {
        CacheStats {
            size: 0,
            max_size: None,
            ttl: None,
            expired: 0,
            active: 0,
            counters,
        }
    }

    #[test]
    fn test_counters_default() {
        let counters = CacheCounters::default();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
        assert_eq!(counters.expirations, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(snapshot(CacheCounters::default()).hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut counters = CacheCounters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        assert_eq!(snapshot(counters).hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = CacheCounters::default();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(snapshot(counters).hit_rate(), 0.5);
    }

    #[test]
    fn test_record_eviction_and_expirations() {
        let mut counters = CacheCounters::default();
        counters.record_eviction();
        counters.record_eviction();
        counters.record_expirations(3);
        assert_eq!(counters.evictions, 2);
        assert_eq!(counters.expirations, 3);
    }

    #[test]
    fn test_stats_serialize_flattens_counters() {
        let mut counters = CacheCounters::default();
        counters.record_hit();
        let stats = CacheStats {
            size: 2,
            max_size: Some(10),
            ttl: Some(Duration::from_secs(1)),
            expired: 1,
            active: 1,
            counters,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], 2);
        assert_eq!(json["max_size"], 10);
        assert_eq!(json["hits"], 1);
        assert_eq!(json["expired"], 1);
        assert!(json.get("counters").is_none());
    }
}

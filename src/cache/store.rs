//! Cache Store Module
//!
//! Main cache engine combining a key index with a recency list and lazy TTL expiration.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::lru::{LruList, NodeId};
use crate::cache::{CacheCounters, CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::error::Result;

/// A stored key together with its entry, kept in the recency list.
#[derive(Debug)]
struct Slot<V> {
    key: String,
    entry: CacheEntry<V>,
}

// == Expiring LRU Cache ==
/// In-memory cache with LRU eviction and lazily checked TTL expiration.
///
/// Entries are kept in recency order, least recently used first. Expired
/// entries are only removed when they are accessed, or by [`cleanup`],
/// [`count`] and the listing methods; there is no background timer.
///
/// [`cleanup`]: ExpiringLruCache::cleanup
/// [`count`]: ExpiringLruCache::count
#[derive(Debug)]
pub struct ExpiringLruCache<V> {
    /// Key to recency list node
    index: HashMap<String, NodeId>,
    /// Entries ordered from least to most recently used
    list: LruList<Slot<V>>,
    /// Hit/miss/eviction counters
    counters: CacheCounters,
    /// Maximum number of entries, None = unbounded
    max_entries: Option<NonZeroUsize>,
    /// Default TTL applied on insert, None = never expires
    default_ttl: Option<Duration>,
}

impl<V> ExpiringLruCache<V> {
    // == Constructor ==
    /// Creates a new cache.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for inserted entries; None or zero means never expire
    /// * `max_entries` - Maximum number of entries; None means unbounded
    pub fn new(default_ttl: Option<Duration>, max_entries: Option<NonZeroUsize>) -> Self {
        Self {
            index: HashMap::new(),
            list: LruList::new(),
            counters: CacheCounters::default(),
            max_entries,
            default_ttl: default_ttl.filter(|ttl| !ttl.is_zero()),
        }
    }

    /// Creates a cache whose entries never expire and that never evicts.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Creates a cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.default_ttl(), config.capacity()))
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    pub fn max_entries(&self) -> Option<NonZeroUsize> {
        self.max_entries
    }

    // == Insert ==
    /// Stores a value under `key` with the default TTL.
    ///
    /// An existing key is overwritten in place and becomes the most recently
    /// used. A new key first evicts least recently used entries until the
    /// cache is below capacity.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.default_ttl, Instant::now());

        if let Some(&id) = self.index.get(&key) {
            if let Some(slot) = self.list.get_mut(id) {
                slot.entry = entry;
            }
            self.list.move_to_back(id);
            return;
        }

        if let Some(max) = self.max_entries {
            while self.list.len() >= max.get() {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        let id = self.list.push_back(Slot {
            key: key.clone(),
            entry,
        });
        self.index.insert(key, id);
    }

    // == Contains ==
    /// Checks whether `key` holds a live entry.
    ///
    /// Counts as a use: a live entry becomes the most recently used. An
    /// expired entry is removed.
    pub fn contains_key(&mut self, key: &str) -> bool {
        match self.find_live(key, Instant::now()) {
            Some(id) => {
                self.list.move_to_back(id);
                self.counters.record_hit();
                true
            }
            None => {
                self.counters.record_miss();
                false
            }
        }
    }

    // == Remove ==
    /// Removes `key` regardless of expiry. Returns whether an entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<NodeId> = self
            .list
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();

        let count = expired.len();
        for id in expired {
            self.remove_node(id);
        }

        if count > 0 {
            self.counters.record_expirations(count);
            debug!(removed = count, "TTL cleanup removed expired entries");
        }
        count
    }

    // == Count ==
    /// Sweeps expired entries, then returns the number of live entries.
    pub fn count(&mut self) -> usize {
        self.cleanup();
        self.list.len()
    }

    /// Sweeps expired entries, then reports whether none remain.
    pub fn is_empty(&mut self) -> bool {
        self.count() == 0
    }

    /// Physical number of stored entries, expired ones included. Does not sweep.
    pub fn raw_len(&self) -> usize {
        self.list.len()
    }

    // == Listing ==
    /// Live keys, least recently used first.
    pub fn keys(&mut self) -> Vec<String> {
        self.cleanup();
        self.list.iter().map(|(_, slot)| slot.key.clone()).collect()
    }

    // == Stats ==
    /// Returns a snapshot of the store without modifying it.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let size = self.list.len();
        let expired = self
            .list
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .count();

        CacheStats {
            size,
            max_size: self.max_entries.map(NonZeroUsize::get),
            ttl: self.default_ttl,
            expired,
            active: size - expired,
            counters: self.counters,
        }
    }

    // == Refresh ==
    /// Renews the expiry of a live entry and marks it most recently used.
    ///
    /// With `ttl` given the entry expires `ttl` from now (never, if zero);
    /// otherwise the default TTL is reapplied. Returns false without effect if
    /// the key is absent or already expired.
    pub fn refresh(&mut self, key: &str, ttl: Option<Duration>) -> bool {
        let now = Instant::now();
        let Some(id) = self.find_live(key, now) else {
            return false;
        };

        let ttl = ttl.or(self.default_ttl);
        if let Some(slot) = self.list.get_mut(id) {
            slot.entry.renew(ttl, now);
        }
        self.list.move_to_back(id);
        true
    }

    // == Time To Live ==
    /// Remaining TTL of a live entry, without touching recency.
    ///
    /// # Returns
    /// - `None` if the key is absent or expired
    /// - `Some(None)` if the entry never expires
    /// - `Some(Some(remaining))` otherwise
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        let now = Instant::now();
        let slot = self.index.get(key).and_then(|&id| self.list.get(id))?;
        if slot.entry.is_expired_at(now) {
            return None;
        }
        Some(slot.entry.ttl_remaining_at(now))
    }

    /// Looks up a live entry, removing it if it has expired.
    fn find_live(&mut self, key: &str, now: Instant) -> Option<NodeId> {
        let id = *self.index.get(key)?;
        let expired = self
            .list
            .get(id)
            .map_or(true, |slot| slot.entry.is_expired_at(now));

        if expired {
            self.remove_node(id);
            self.counters.record_expirations(1);
            trace!(key, "expired entry removed on access");
            return None;
        }
        Some(id)
    }

    fn remove_node(&mut self, id: NodeId) -> Option<Slot<V>> {
        let slot = self.list.remove(id)?;
        self.index.remove(&slot.key);
        Some(slot)
    }

    /// Evicts the least recently used entry. Returns false if the cache is empty.
    fn evict_oldest(&mut self) -> bool {
        match self.list.pop_front() {
            Some(slot) => {
                self.index.remove(&slot.key);
                self.counters.record_eviction();
                debug!(key = %slot.key, "LRU eviction");
                true
            }
            None => false,
        }
    }
}

impl<V: Clone> ExpiringLruCache<V> {
    // == Get ==
    /// Retrieves a live value and marks it most recently used.
    ///
    /// Returns None if the key is absent or expired; an expired entry is removed.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.find_live(key, Instant::now()) {
            Some(id) => {
                self.list.move_to_back(id);
                self.counters.record_hit();
                self.list.get(id).map(|slot| slot.entry.value.clone())
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Get Or Insert ==
    /// Retrieves a live value, or runs `producer` on a miss and caches its result.
    ///
    /// The producer is not called on a hit. If it fails the error is returned
    /// unchanged and nothing is stored.
    pub async fn get_or_insert_with<F, Fut, E>(
        &mut self,
        key: &str,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        trace!(key, "cache miss, running fallback producer");
        match producer().await {
            Ok(value) => {
                self.insert(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                trace!(key, "fallback producer failed, nothing cached");
                Err(err)
            }
        }
    }

    /// Live values, least recently used first.
    pub fn values(&mut self) -> Vec<V> {
        self.cleanup();
        self.list
            .iter()
            .map(|(_, slot)| slot.entry.value.clone())
            .collect()
    }

    /// Live key/value pairs, least recently used first.
    pub fn entries(&mut self) -> Vec<(String, V)> {
        self.cleanup();
        self.list
            .iter()
            .map(|(_, slot)| (slot.key.clone(), slot.entry.value.clone()))
            .collect()
    }
}

impl<V> Default for ExpiringLruCache<V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

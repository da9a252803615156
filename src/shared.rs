//! Shared Cache Handle
//!
//! Cloneable async handle over a single cache, for callers that share one
//! cache between tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::trace;

use crate::cache::{CacheStats, ExpiringLruCache};
use crate::config::CacheConfig;
use crate::error::Result;

/// Cloneable handle to a cache wrapped in `Arc<RwLock<_>>`.
///
/// Each call holds the lock only for the duration of one cache operation.
/// [`get_or_insert_with`] drops it while the producer runs, so other calls
/// proceed during the wait. Concurrent misses on the same key are not
/// deduplicated: each runs its own producer and the last one to finish wins.
///
/// [`get_or_insert_with`]: SharedCache::get_or_insert_with
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<RwLock<ExpiringLruCache<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> SharedCache<V> {
    /// Wraps an existing cache.
    pub fn new(cache: ExpiringLruCache<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Builds the cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(ExpiringLruCache::from_config(config)?))
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.inner.write().await.insert(key, value);
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.inner.write().await.contains_key(key)
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.inner.write().await.remove(key)
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    pub async fn count(&self) -> usize {
        self.inner.write().await.count()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.write().await.keys()
    }

    pub async fn cleanup(&self) -> usize {
        self.inner.write().await.cleanup()
    }

    /// Snapshot under a read lock; does not sweep.
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn refresh(&self, key: &str, ttl: Option<Duration>) -> bool {
        self.inner.write().await.refresh(key, ttl)
    }

    pub async fn ttl_remaining(&self, key: &str) -> Option<Option<Duration>> {
        self.inner.read().await.ttl_remaining(key)
    }
}

impl<V: Clone> SharedCache<V> {
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.write().await.get(key)
    }

    /// Retrieves a live value, or runs `producer` on a miss and caches its result.
    ///
    /// The lock is not held while the producer runs. A failed producer stores
    /// nothing and its error is returned unchanged.
    pub async fn get_or_insert_with<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        // Guard dropped at the end of this statement
        let cached = self.inner.write().await.get(key);
        if let Some(value) = cached {
            return Ok(value);
        }

        trace!(key, "shared cache miss, running fallback producer");
        match producer().await {
            Ok(value) => {
                self.inner.write().await.insert(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                trace!(key, "fallback producer failed, nothing cached");
                Err(err)
            }
        }
    }

    pub async fn values(&self) -> Vec<V> {
        self.inner.write().await.values()
    }

    pub async fn entries(&self) -> Vec<(String, V)> {
        self.inner.write().await.entries()
    }
}

impl<V> Default for SharedCache<V> {
    fn default() -> Self {
        Self::new(ExpiringLruCache::unbounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    #[tokio::test]
    async fn test_shared_clones_see_same_cache() {
        let cache: SharedCache<String> = SharedCache::default();
        let other = cache.clone();

        cache.insert("key1", "value1".to_string()).await;

        assert_eq!(other.get("key1").await, Some("value1".to_string()));
        assert_eq!(other.count().await, 1);
    }

    #[tokio::test]
    async fn test_shared_from_config() {
        let config = CacheConfig::new().with_max_entries(2);
        let cache: SharedCache<u32> = SharedCache::from_config(&config).unwrap();

        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.insert("c", 3).await;

        assert_eq!(cache.keys().await, vec!["b", "c"]);
        assert_eq!(cache.stats().await.max_size, Some(2));
    }

    #[tokio::test]
    async fn test_shared_from_config_rejects_zero_capacity() {
        let config = CacheConfig::new().with_max_entries(0);
        assert!(SharedCache::<u32>::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_shared_remove_clear_refresh() {
        let cache = SharedCache::new(ExpiringLruCache::new(
            Some(Duration::from_secs(60)),
            NonZeroUsize::new(10),
        ));

        cache.insert("a", 1).await;
        cache.insert("b", 2).await;

        assert!(cache.refresh("a", Some(Duration::ZERO)).await);
        assert_eq!(cache.ttl_remaining("a").await, Some(None));
        assert!(cache.contains_key("b").await);
        assert!(cache.remove("b").await);
        assert_eq!(cache.entries().await, vec![("a".to_string(), 1)]);

        cache.clear().await;
        assert!(cache.values().await.is_empty());
        assert_eq!(cache.cleanup().await, 0);
    }

    #[tokio::test]
    async fn test_shared_get_or_insert_with_failure_does_not_cache() {
        let cache: SharedCache<String> = SharedCache::default();

        let result = cache
            .get_or_insert_with("key1", || async { Err::<String, _>("boom") })
            .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(cache.stats().await.size, 0);
        assert_eq!(cache.get("key1").await, None);

        let result = cache
            .get_or_insert_with("key1", || async { Ok::<_, &str>("value1".to_string()) })
            .await;
        assert_eq!(result, Ok("value1".to_string()));
        assert_eq!(cache.count().await, 1);
    }
}

//! Expiring LRU - an in-memory memoization cache
//!
//! Combines lazy TTL expiration with capacity-based LRU eviction, plus an
//! async fallback that fills the cache on a miss.
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::time::Duration;
//! use expiring_lru::ExpiringLruCache;
//!
//! let mut cache = ExpiringLruCache::new(Some(Duration::from_secs(60)), NonZeroUsize::new(2));
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.get("a");
//! cache.insert("c", 3);
//!
//! assert_eq!(cache.keys(), vec!["a", "c"]);
//!
//! let value = tokio_test::block_on(
//!     cache.get_or_insert_with("d", || async { Ok::<_, std::io::Error>(4) }),
//! );
//! assert_eq!(value.unwrap(), 4);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod shared;

pub use cache::{CacheStats, ExpiringLruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use shared::SharedCache;

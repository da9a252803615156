//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


pub(crate) use entry::CacheEntry;

// Re-export public types
pub use stats::{CacheCounters, CacheStats};
pub use store::ExpiringLruCache;

//! Configuration Module
//!
//! Construction parameters for the cache. The crate never reads environment
//! variables or files; host applications embed `CacheConfig` in their own
//! configuration and hand it over.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// Both values are fixed once a cache is built from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default TTL in milliseconds, 0 = entries never expire
    pub default_ttl_ms: u64,
    /// Maximum number of entries, None = unbounded
    pub max_entries: Option<usize>,
}

impl CacheConfig {
    /// Creates a config with no expiry and no capacity limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL applied on insert and on refresh without an explicit TTL.
    ///
    /// Rounded up to whole milliseconds, so a non-zero TTL never becomes 0 ("never").
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        let partial_ms = u128::from(ttl.subsec_nanos() % 1_000_000 != 0);
        self.default_ttl_ms = u64::try_from(ttl.as_millis() + partial_ms).unwrap_or(u64::MAX);
        self
    }

    /// Sets the maximum number of entries.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the cache cannot honour.
    ///
    /// A capacity of zero would make every insert evict itself, so it is refused.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Default TTL as a duration, None when entries never expire.
    pub fn default_ttl(&self) -> Option<Duration> {
        match self.default_ttl_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Capacity limit, None when unbounded or invalid.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.max_entries.and_then(NonZeroUsize::new)
    }
}

//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry.
///
/// Recency is not stored here; it is the entry's position in the recency list.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    /// The stored value
    pub(crate) value: V,
    /// Expiration instant, None = no expiration
    pub(crate) expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL; None or zero means the entry never expires
    /// * `now` - The instant the TTL is measured from
    pub(crate) fn new(value: V, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            expires_at: expiry_from(now, ttl),
        }
    }

    // == Renew ==
    /// Resets the expiry to `ttl` after `now`.
    pub(crate) fn renew(&mut self, ttl: Option<Duration>, now: Instant) {
        self.expires_at = expiry_from(now, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches its
    /// expiration instant, not only after it has passed it.
    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub(crate) fn ttl_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at.map(|expires| expires.saturating_duration_since(now))
    }
}

// == Utility Functions ==
/// Computes the expiration instant for a TTL measured from `now`.
///
/// A zero TTL means "never". A TTL too large to represent also never expires.
pub(crate) fn expiry_from(now: Instant, ttl: Option<Duration>) -> Option<Instant> {
    ttl.filter(|ttl| !ttl.is_zero()).and_then(|ttl| now.checked_add(ttl))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", None, Instant::now());

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_creation_zero_ttl_never_expires() {
        let entry = CacheEntry::new("test_value", Some(Duration::ZERO), Instant::now());

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_secs(60)), Instant::now());

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Some(Duration::from_millis(30)), Instant::now());

        assert!(!entry.is_expired_at(Instant::now()));

        sleep(Duration::from_millis(60));

        assert!(entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            expires_at: Some(now),
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
    }

    #[test]
    fn test_renew_extends_expiry() {
        let now = Instant::now();
        let mut entry = CacheEntry::new(1, Some(Duration::from_millis(10)), now);
        let later = now + Duration::from_millis(20);

        assert!(entry.is_expired_at(later));

        entry.renew(Some(Duration::from_secs(1)), later);
        assert!(!entry.is_expired_at(later));

        entry.renew(None, later);
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = CacheEntry::new(1, Some(Duration::from_secs(10)), now);

        assert_eq!(entry.ttl_remaining_at(now), Some(Duration::from_secs(10)));
        assert_eq!(
            entry.ttl_remaining_at(now + Duration::from_secs(4)),
            Some(Duration::from_secs(6))
        );
        assert_eq!(
            entry.ttl_remaining_at(now + Duration::from_secs(30)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new(1, None, Instant::now());
        assert!(entry.ttl_remaining_at(Instant::now()).is_none());
    }

    #[test]
    fn test_expiry_from_overflow_never_expires() {
        assert!(expiry_from(Instant::now(), Some(Duration::MAX)).is_none());
    }
}

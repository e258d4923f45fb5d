//! Process-local TTL memoization for query-shaped keys.
//!
//! Entries self-expire; nothing invalidates them on write, so a mutation can
//! be invisible to cached readers for up to the TTL window. The store is
//! injected into the services that use it, so a shared key-value backend can
//! replace it without touching callers.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use metrics::counter;

struct CacheSlot<T> {
    value: T,
    expires_at: Instant,
}

/// Keyed value store with a fixed time-to-live per entry.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    entries: DashMap<String, CacheSlot<T>>,
}

impl<T: Clone> TtlCache<T> {
    /// `name` labels the hit/miss counters for this cache instance.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live value for `key`, dropping it when expired.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();

        if let Some(slot) = self.entries.get(key) {
            if slot.expires_at > now {
                counter!("bytebrief_listing_cache_hit_total", "cache" => self.name).increment(1);
                return Some(slot.value.clone());
            }
        }

        // Expired entries are removed on the miss path rather than by a
        // sweeper; the key set is bounded by the query shapes in use.
        self.entries
            .remove_if(key, |_, slot| slot.expires_at <= now);
        counter!("bytebrief_listing_cache_miss_total", "cache" => self.name).increment(1);
        None
    }

    pub fn insert(&self, key: String, value: T) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(key, CacheSlot { value, expires_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_within_ttl() {
        let cache = TtlCache::new("test", Duration::from_secs(30));
        cache.insert("all|1".to_string(), 7u64);
        assert_eq!(cache.get("all|1"), Some(7));
    }

    #[test]
    fn expired_entries_are_refetched() {
        let cache = TtlCache::new("test", Duration::from_millis(0));
        cache.insert("all|1".to_string(), 7u64);
        assert_eq!(cache.get("all|1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let cache = TtlCache::new("test", Duration::from_secs(30));
        cache.insert("all|1".to_string(), 1u64);
        cache.insert("rust|1".to_string(), 2u64);
        assert_eq!(cache.get("all|1"), Some(1));
        assert_eq!(cache.get("rust|1"), Some(2));
        assert_eq!(cache.get("all|2"), None);
    }
}

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

// ---------------------------------------------------------------------------
// TtlCache -- thread-safe map whose entries expire after a fixed time-to-live
// ---------------------------------------------------------------------------

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// In-memory read-through cache. An entry is served for `ttl` after it was
/// inserted and treated as absent afterwards; expired entries are physically
/// removed by [`purge_expired`](Self::purge_expired).
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a clone of the live value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Insert or replace the value for `key`, restarting its TTL.
    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.purge_expired_at(Instant::now())
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn is_live(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let map = self.entries.read();
        map.get(key)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.value.clone())
    }

    fn insert_at(&self, key: K, value: V, now: Instant) {
        self.entries.write().insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let mut map = self.entries.write();
        let before = map.len();
        map.retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < self.ttl);
        let removed = before - map.len();
        if removed > 0 {
            debug!(removed, remaining = map.len(), "purged expired cache entries");
        }
        removed
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.read().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_before_expiry_miss_after() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at("MSFT", 1, t0);

        assert_eq!(cache.get_at(&"MSFT", t0), Some(1));
        assert_eq!(cache.get_at(&"MSFT", t0 + Duration::from_secs(59)), Some(1));
        assert_eq!(cache.get_at(&"MSFT", t0 + Duration::from_secs(60)), None);
        assert_eq!(cache.get_at(&"AAPL", t0), None);
    }

    #[test]
    fn insert_restarts_ttl() {
        let cache = TtlCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.insert_at("k", "old", t0);
        cache.insert_at("k", "new", t0 + Duration::from_secs(8));

        assert_eq!(cache.get_at(&"k", t0 + Duration::from_secs(15)), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn purge_removes_only_expired() {
        let cache = TtlCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.insert_at(1, 'a', t0);
        cache.insert_at(2, 'b', t0 + Duration::from_secs(5));

        assert_eq!(cache.purge_expired_at(t0 + Duration::from_secs(12)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at(&2, t0 + Duration::from_secs(12)), Some('b'));
    }

    #[test]
    fn zero_ttl_never_serves() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), None);
        assert!(!cache.is_empty());
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.purge_expired(), 0);
    }
}

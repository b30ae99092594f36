//! Time-bounded memoization for computed query results.
//!
//! [`TtlCache`] maps canonical string keys to cloned values with a
//! fixed validity window. Entries are immutable once written and
//! simply expire; the next writer replaces them. Staleness up to the
//! window length is an accepted trade-off of the read path, not a bug.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Default validity window for cached query results.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// A shared map of canonical keys to values with a fixed TTL.
///
/// Designed to be held in an `Arc` and shared across all request
/// handlers. Hits and misses are observably identical to the caller
/// except for latency.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the given validity window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return a clone of the cached value if it is still fresh.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        let (written, value) = entries.get(key)?;

        if written.elapsed() < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    /// Store a value under `key`, replacing any previous (possibly
    /// expired) entry atomically.
    ///
    /// Expired entries under *other* keys are swept out on the same
    /// write lock, so the map only ever holds keys written within the
    /// validity window — it cannot grow without bound under a stream
    /// of distinct keys.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (written, _)| written.elapsed() < self.ttl);
        entries.insert(key.into(), (Instant::now(), value));
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn miss_on_unknown_key() {
        let cache: TtlCache<i32> = TtlCache::default();
        assert_eq!(cache.get("nope").await, None);
    }

    #[tokio::test]
    async fn hit_returns_stored_value() {
        let cache = TtlCache::default();
        cache.insert("k", 42).await;
        assert_eq!(cache.get("k").await, Some(42));
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 42).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn insert_replaces_previous_entry() {
        let cache = TtlCache::default();
        cache.insert("k", 1).await;
        cache.insert("k", 2).await;
        assert_eq!(cache.get("k").await, Some(2));
    }

    #[tokio::test]
    async fn insert_sweeps_expired_entries_under_other_keys() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.insert("c", 3).await;
        assert_eq!(cache.entries.read().await.len(), 1);
    }

    #[tokio::test]
    async fn insert_keeps_fresh_entries_under_other_keys() {
        let cache = TtlCache::default();
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        assert_eq!(cache.entries.read().await.len(), 2);
        assert_eq!(cache.get("a").await, Some(1));
    }
}

//! In-memory response storage with per-entry TTL and resource tags
//!
//! Entries expire lazily: an expired entry is treated as absent and removed
//! the next time it is looked up.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

/// A stored response
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
    pub ttl: Duration,
    pub tags: BTreeSet<String>,
}

impl<V> CacheEntry<V> {
    /// Valid while `now - created_at < ttl`
    pub fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }
}

/// Shared TTL cache for idempotent read responses.
///
/// Safe to share between tasks; the lock is never held across an await.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store or overwrite an entry with a fresh timestamp
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        self.set_tagged(key, value, ttl, std::iter::empty::<String>());
    }

    /// Store or overwrite an entry tagged with the resources it represents
    pub fn set_tagged<I, S>(&self, key: &str, value: V, ttl: Duration, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl,
            tags: tags.into_iter().map(Into::into).collect(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    /// Get a live entry, evicting it if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Whether an entry (live or expired) is currently stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Remove every entry (`None`) or every entry whose key contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        match pattern {
            None => entries.clear(),
            Some(pattern) => entries.retain(|key, _| !key.contains(pattern)),
        }
        before - entries.len()
    }

    /// Remove every entry carrying `tag`
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.contains(tag));
        before - entries.len()
    }

    /// Remove everything
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let now = Instant::now();
        let valid_entries = entries.values().filter(|e| e.is_live(now)).count();

        CacheStats {
            total_entries: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
        }
    }
}

/// Statistics about cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_get_before_ttl_returns_value() {
        let cache = ResponseCache::new();
        cache.set("k1", "v1".to_string(), TTL);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k1"), Some("v1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_at_ttl_evicts() {
        let cache = ResponseCache::new();
        cache.set("k1", "v1".to_string(), TTL);

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get("k1"), None);
        assert!(!cache.contains("k1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_kept_until_lookup() {
        let cache = ResponseCache::new();
        cache.set("k1", 1, Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(cache.contains("k1"));
        assert_eq!(cache.stats().expired_entries, 1);

        assert_eq!(cache.get("k1"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_refreshes_timestamp() {
        let cache = ResponseCache::new();
        cache.set("k1", 1, TTL);
        tokio::time::advance(Duration::from_secs(50)).await;

        cache.set("k1", 2, TTL);
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(cache.get("k1"), Some(2));
    }

    #[test]
    fn test_zero_ttl_is_never_live() {
        let cache = ResponseCache::new();
        cache.set("k1", 1, Duration::ZERO);
        assert_eq!(cache.get("k1"), None);
    }

    #[test]
    fn test_invalidate_all() {
        let cache = ResponseCache::new();
        cache.set("GET:/assets", 1, TTL);
        cache.set("GET:/incidents", 2, TTL);

        assert_eq!(cache.invalidate(None), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_by_substring() {
        let cache = ResponseCache::new();
        cache.set("GET:/assets", 1, TTL);
        cache.set("GET:/assets/7", 2, TTL);
        cache.set("GET:/incidents", 3, TTL);

        assert_eq!(cache.invalidate(Some("/assets")), 2);
        assert_eq!(cache.get("GET:/incidents"), Some(3));
        assert_eq!(cache.get("GET:/assets"), None);
    }

    #[test]
    fn test_invalidate_by_tag_ignores_shared_prefix() {
        let cache = ResponseCache::new();
        cache.set_tagged("GET:/alerts", 1, TTL, ["alerts"]);
        cache.set_tagged("GET:/alerts-archive", 2, TTL, ["alerts-archive"]);

        assert_eq!(cache.invalidate_tag("alerts"), 1);
        assert_eq!(cache.get("GET:/alerts-archive"), Some(2));
    }

    #[test]
    fn test_stats() {
        let cache = ResponseCache::new();
        cache.set("k1", 1, TTL);
        cache.set("k2", 2, TTL);

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.valid_entries, 2);
        assert_eq!(stats.expired_entries, 0);
    }
}

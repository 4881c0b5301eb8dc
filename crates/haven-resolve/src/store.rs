//! Pluggable TTL key-value storage for resolved responses.
//!
//! [`TtlStore`] is the seam that lets a shared backend (e.g. Redis) replace
//! the process-local map without touching call sites. [`MemoryTtlStore`] is
//! the default/dev implementation: a mutex-guarded map with passive expiry —
//! entries are evicted when a read finds them stale, never by a background
//! sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

/// Keyed storage with per-entry time-to-live.
#[async_trait]
pub trait TtlStore<V: Clone + Send + Sync + 'static>: Send + Sync {
    /// Returns the live value for `key`, if any. Expired entries count as
    /// absent (and may be evicted on the way out).
    async fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    async fn put(&self, key: &str, value: V, ttl: Duration);

    /// Removes `key` if present.
    async fn delete(&self, key: &str);

    /// Number of live (unexpired) entries.
    async fn entry_count(&self) -> usize;
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory [`TtlStore`] backed by a `HashMap`.
pub struct MemoryTtlStore<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> MemoryTtlStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryTtlStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V: Clone + Send + Sync + 'static> TtlStore<V> for MemoryTtlStore<V> {
    async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
            // Passive eviction: stale entries are dropped at read time.
            entries.remove(key);
        }
        None
    }

    async fn put(&self, key: &str, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.insert(key.to_owned(), entry);
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    async fn entry_count(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let store = MemoryTtlStore::new();
        store.put("US:10001", 7u32, Duration::from_secs(60)).await;
        assert_eq!(store.get("US:10001").await, Some(7));
        assert_eq!(store.entry_count().await, 1);
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store: MemoryTtlStore<u32> = MemoryTtlStore::new();
        assert_eq!(store.get("US:99999").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_entry_is_expired_on_read() {
        let store = MemoryTtlStore::new();
        store.put("US:10001", 7u32, Duration::ZERO).await;
        assert_eq!(store.get("US:10001").await, None);
        assert_eq!(store.entry_count().await, 0, "stale entry evicted");
    }

    #[tokio::test]
    async fn put_replaces_previous_entry() {
        let store = MemoryTtlStore::new();
        store.put("US:10001", 1u32, Duration::from_secs(60)).await;
        store.put("US:10001", 2u32, Duration::from_secs(60)).await;
        assert_eq!(store.get("US:10001").await, Some(2));
        assert_eq!(store.entry_count().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let store = MemoryTtlStore::new();
        store.put("CA:M5V 2T6", 1u32, Duration::from_secs(60)).await;
        store.delete("CA:M5V 2T6").await;
        assert_eq!(store.get("CA:M5V 2T6").await, None);
    }

    #[tokio::test]
    async fn entry_count_ignores_expired_entries() {
        let store = MemoryTtlStore::new();
        store.put("a", 1u32, Duration::ZERO).await;
        store.put("b", 2u32, Duration::from_secs(60)).await;
        assert_eq!(store.entry_count().await, 1);
    }
}

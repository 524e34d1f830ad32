//! In-memory object store backed by moka.
//!
//! Wraps `moka::future::Cache` for async-safe, lock-free access with
//! automatic size-weighted LRU eviction. Suitable for single-process
//! deployments and tests; evicted tiles are simply rebuilt by the next
//! precache cycle.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::cache::traits::{ObjectStore, ObjectStoreError};
use crate::BoxFuture;

/// In-memory object store with a byte-size capacity bound.
///
/// Entries are weighed by their payload length, so `max_size_bytes` bounds
/// the total cached bytes rather than the entry count. An optional TTL lets
/// idle tiles age out even below the size limit.
pub struct MemoryObjectStore {
    cache: MokaCache<String, Vec<u8>>,
}

impl MemoryObjectStore {
    /// Create a store holding at most `max_size_bytes` of values.
    pub fn new(max_size_bytes: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaCache::builder()
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                // moka weighs in u32; cap oversized entries.
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes);

        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            cache: builder.build(),
        }
    }

    /// Total bytes currently held, per the entry weigher.
    ///
    /// Counts are maintained lazily; call [`MemoryObjectStore::gc`] first for
    /// an exact figure.
    pub fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    /// Number of cached entries. Lazily maintained, like
    /// [`MemoryObjectStore::size_bytes`].
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Run pending maintenance (eviction bookkeeping, counter sync).
    /// Eviction itself is automatic; this only forces the bookkeeping now.
    pub async fn gc(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<(), ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, bytes).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let existed = self.cache.contains_key(&key);
            self.cache.remove(&key).await;
            Ok(existed)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ObjectStoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.contains_key(&key)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryObjectStore::new(1024 * 1024, None);
        store.put("1/0_0_256.png", vec![1, 2, 3]).await.unwrap();

        assert_eq!(
            store.get("1/0_0_256.png").await.unwrap(),
            Some(vec![1, 2, 3])
        );
        assert!(store.contains("1/0_0_256.png").await.unwrap());

        store.gc().await;
        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.size_bytes(), 3);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryObjectStore::new(1024, None);
        assert_eq!(store.get("absent").await.unwrap(), None);
        assert!(!store.contains("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = MemoryObjectStore::new(1024, None);
        store.put("k", vec![1]).await.unwrap();
        store.put("k", vec![2, 3]).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(vec![2, 3]));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryObjectStore::new(1024, None);
        store.put("k", vec![1]).await.unwrap();

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}

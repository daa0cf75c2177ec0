//! In-process cache for public responses.
//!
//! Entries are JSON values keyed by a dotted name (`public.stats`,
//! `public.projects?region=Kayes`, ...). Mutating handlers drop the keys
//! they affect through the `forget_*` helpers.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

pub const KEY_STATS: &str = "public.stats";
pub const KEY_PROJECTS: &str = "public.projects";
pub const KEY_VILLAGES: &str = "public.villages";
pub const KEY_ABOUT: &str = "public.about";
pub const KEY_HOMEPAGE: &str = "public.homepage";
pub const KEY_SETTINGS: &str = "public.settings";
pub const KEY_CONTENT: &str = "public.content";

/// Upper bound on stored entries. Public query strings vary freely, so the
/// map is capped and the entry closest to expiry is evicted first.
pub const MAX_ENTRIES: usize = 512;

/// Key for a single published section.
pub fn content_key(section: &str) -> String {
    format!("{KEY_CONTENT}.{section}")
}

struct CacheEntry {
    expires_at: Instant,
    value: serde_json::Value,
}

/// TTL cache of serialized responses.
///
/// Thread-safe via interior `RwLock`; wrapped in `Arc` inside `AppState`.
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    /// Store `value` under `key`. Expired entries are purged first; when the
    /// map is still full the entry expiring soonest makes room.
    pub async fn put(&self, key: &str, value: serde_json::Value) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);

        if entries.len() >= self.capacity && !entries.contains_key(key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                expires_at: now + self.ttl,
                value,
            },
        );
    }

    /// Return the cached value for `key`, or run `compute`, store its
    /// serialized result and return it. Errors are never cached.
    pub async fn remember<T, F, Fut>(&self, key: &str, compute: F) -> AppResult<serde_json::Value>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(hit) = self.get(key).await {
            tracing::debug!(key, "Cache hit");
            return Ok(hit);
        }
        let value = serde_json::to_value(compute().await?)
            .map_err(|e| AppError::InternalError(format!("Cache serialization error: {e}")))?;
        self.put(key, value.clone()).await;
        Ok(value)
    }

    pub async fn forget(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Drop every key equal to `prefix` or starting with it.
    pub async fn forget_prefix(&self, prefix: &str) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(prefix));
    }

    /// After a village, projet or offer changes.
    pub async fn forget_catalog(&self) {
        for prefix in [KEY_STATS, KEY_PROJECTS, KEY_VILLAGES, KEY_HOMEPAGE, KEY_ABOUT] {
            self.forget_prefix(prefix).await;
        }
    }

    /// After site content changes.
    pub async fn forget_content(&self) {
        for prefix in [KEY_CONTENT, KEY_HOMEPAGE, KEY_ABOUT] {
            self.forget_prefix(prefix).await;
        }
    }

    /// After a site setting changes.
    pub async fn forget_settings(&self) {
        self.forget(KEY_SETTINGS).await;
        self.forget(KEY_HOMEPAGE).await;
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn remember_computes_once() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .remember(KEY_STATS, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"total_villages": 4}))
                })
                .await
                .unwrap();
            assert_eq!(value["total_villages"], 4);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.put(KEY_STATS, json!(1)).await;
        assert!(cache.get(KEY_STATS).await.is_none());
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let result = cache
            .remember::<serde_json::Value, _, _>(KEY_STATS, || async {
                Err(AppError::InternalError("boom".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn put_purges_expired_entries() {
        let cache = ResponseCache::new(Duration::ZERO);
        for i in 0..50 {
            cache.put(&format!("{KEY_VILLAGES}?region=r{i}"), json!([])).await;
        }
        assert!(cache.entry_count().await <= 1);
    }

    #[tokio::test]
    async fn entry_count_never_exceeds_capacity() {
        let cache = ResponseCache::with_capacity(Duration::from_secs(60), 8);
        for i in 0..500 {
            cache.put(&format!("{KEY_VILLAGES}?region=r{i}"), json!([])).await;
        }
        assert_eq!(cache.entry_count().await, 8);
        // The most recent key survives eviction.
        assert!(cache.get(&format!("{KEY_VILLAGES}?region=r499")).await.is_some());
    }

    #[tokio::test]
    async fn forget_prefix_drops_variants() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(KEY_PROJECTS, json!([])).await;
        cache.put("public.projects?region=Kayes", json!([])).await;
        cache.put(KEY_SETTINGS, json!({})).await;

        cache.forget_prefix(KEY_PROJECTS).await;

        assert!(cache.get(KEY_PROJECTS).await.is_none());
        assert!(cache.get("public.projects?region=Kayes").await.is_none());
        assert!(cache.get(KEY_SETTINGS).await.is_some());
    }

    #[tokio::test]
    async fn content_changes_drop_homepage_but_keep_settings() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(&content_key("hero"), json!([])).await;
        cache.put(KEY_HOMEPAGE, json!({})).await;
        cache.put(KEY_SETTINGS, json!({})).await;

        cache.forget_content().await;

        assert_eq!(cache.entry_count().await, 1);
        assert!(cache.get(KEY_SETTINGS).await.is_some());
    }

    #[tokio::test]
    async fn settings_changes_drop_homepage() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(KEY_SETTINGS, json!({})).await;
        cache.put(KEY_HOMEPAGE, json!({})).await;
        cache.put(KEY_STATS, json!({})).await;

        cache.forget_settings().await;

        assert_eq!(cache.entry_count().await, 1);
        assert!(cache.get(KEY_STATS).await.is_some());
    }
}

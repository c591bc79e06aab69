use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use crate::ports::cache::ListingCache;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process TTL cache. Expired entries are dropped lazily on read.
pub struct MemoryCache {
    inner: RwLock<LruCache<String, CacheEntry>>,
}

impl MemoryCache {
    /// `max_entries` of `None` keeps every entry until it expires; `Some(n)`
    /// evicts the least recently used entry beyond `n`.
    pub fn new(max_entries: Option<usize>) -> Self {
        let cache = match max_entries {
            None => LruCache::unbounded(),
            Some(n) => NonZeroUsize::new(n).map_or_else(
                || {
                    tracing::warn!("Cache max_entries was 0, leaving cache unbounded");
                    LruCache::unbounded()
                },
                LruCache::new,
            ),
        };
        Self {
            inner: RwLock::new(cache),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }
}

/// Roughly thirty years; stands in for TTLs too large for `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn expiry_after(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl).unwrap_or(now + FAR_FUTURE)
}

impl ListingCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut cache = self.inner.write().map_or_else(
            |_| {
                tracing::error!("Cache lock poisoned on get('{key}'), returning miss");
                None
            },
            Some,
        )?;
        let entry = cache.get(key)?;
        if Instant::now() >= entry.expires_at {
            cache.pop(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        if let Ok(mut cache) = self.inner.write() {
            cache.put(
                key.to_string(),
                CacheEntry {
                    value: value.to_string(),
                    expires_at: expiry_after(ttl),
                },
            );
        } else {
            tracing::error!("Cache lock poisoned on set('{key}'), skipping write");
        }
    }

    fn clear(&self) {
        if let Ok(mut cache) = self.inner.write() {
            cache.clear();
        } else {
            tracing::error!("Cache lock poisoned on clear, skipping");
        }
    }

    fn len(&self) -> usize {
        self.inner.read().map_or(0, |cache| cache.len())
    }
}

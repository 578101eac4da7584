use std::collections::HashMap;

use crate::foundation::core::{Breakpoint, Orientation, Rect};
use crate::foundation::math::Fnv1a64;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
/// Bounds for [`ResultCache`].
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of live entries.
    pub capacity: usize,
    /// Entries older than this many milliseconds are treated as absent.
    pub stale_after_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            stale_after_ms: 5000,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry<T> {
    value: T,
    timestamp: u64,
}

/// Bounded, time-boxed memoization of computed layout results.
///
/// True LRU: the access-order list is updated on every `get` hit and `set`,
/// so eviction removes the least-recently-accessed entry, not the
/// least-recently-inserted one. All time handling is explicit through `now`
/// (milliseconds), keeping behavior deterministic under test.
#[derive(Clone, Debug)]
pub struct ResultCache<T> {
    config: CacheConfig,
    entries: HashMap<String, CacheEntry<T>>,
    // Access order, oldest first. Capacity is small (default 50), so linear
    // repositioning is cheaper than a linked structure.
    access: Vec<String>,
}

impl<T> ResultCache<T> {
    /// Create a cache with the given bounds.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config: CacheConfig {
                capacity: config.capacity.max(1),
                stale_after_ms: config.stale_after_ms,
            },
            entries: HashMap::new(),
            access: Vec::new(),
        }
    }

    /// Fetch a fresh entry, updating its access position.
    ///
    /// A physically present entry older than the staleness window is evicted
    /// and reported absent.
    pub fn get(&mut self, key: &str, now: u64) -> Option<&T> {
        let timestamp = self.entries.get(key)?.timestamp;
        if now.saturating_sub(timestamp) >= self.config.stale_after_ms {
            self.remove(key);
            return None;
        }
        self.touch(key);
        self.entries.get(key).map(|e| &e.value)
    }

    /// Store a value, evicting the least-recently-accessed entry when full.
    pub fn set(&mut self, key: impl Into<String>, value: T, now: u64) {
        let key = key.into();
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                timestamp: now,
            },
        );
        self.touch(&key);
        while self.entries.len() > self.config.capacity {
            let Some(oldest) = self.access.first().cloned() else {
                break;
            };
            self.remove(&oldest);
        }
    }

    /// Drop one entry.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.access.retain(|k| k != key);
        self.entries.remove(key).map(|e| e.value)
    }

    /// Drop every entry. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.access.clear();
    }

    /// Number of physically present entries (stale ones included until read).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.access.iter().position(|k| k == key) {
            self.access.remove(pos);
        }
        self.access.push(key.to_string());
    }
}

/// Build a deterministic cache key from every input affecting a result.
///
/// Bounds are rounded to whole pixels so sub-pixel jitter does not fragment
/// the cache. The options value is serialized and folded through a stable
/// hash, so every option byte affects the key; options that cannot be
/// serialized poison the key with a distinct marker rather than colliding
/// with real entries.
pub fn cache_key(
    container_id: &str,
    bounds: Rect,
    breakpoint: Breakpoint,
    orientation: Orientation,
    options: &impl serde::Serialize,
) -> String {
    let opts_hash = match serde_json::to_vec(options) {
        Ok(bytes) => {
            let mut h = Fnv1a64::new_default();
            h.write_bytes(&bytes);
            format!("{:016x}", h.finish())
        }
        Err(err) => {
            tracing::warn!(%err, "cache options failed to serialize; key poisoned");
            "unserializable".to_string()
        }
    };
    format!(
        "{container_id}|{}x{}+{}+{}|{}|{}|{opts_hash}",
        bounds.width().round() as i64,
        bounds.height().round() as i64,
        bounds.x0.round() as i64,
        bounds.y0.round() as i64,
        breakpoint.as_str(),
        orientation.as_str(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/cache/lru.rs"]
mod tests;

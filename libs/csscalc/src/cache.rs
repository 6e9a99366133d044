//! Bounded result cache
//!
//! Results are memoized by a structural key over `(namespace, name, value, options)`.
//! A cached "resolved to nothing" ([`CacheItem::Null`]) is distinct from a missing entry.

use lru::LruCache;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::options::Options;

/// Default number of cached results.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

static GLOBAL_CACHE: Lazy<Arc<CalcCache>> =
    Lazy::new(|| Arc::new(CalcCache::new(DEFAULT_CACHE_CAPACITY)));

/// Process-wide cache shared by the free functions and `Resolver::default()`.
pub fn global() -> Arc<CalcCache> {
    Arc::clone(&GLOBAL_CACHE)
}

/// A cached result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheItem {
    Value(String),
    Null,
}

impl CacheItem {
    pub fn is_null(&self) -> bool {
        matches!(self, CacheItem::Null)
    }

    pub fn into_item(self) -> Option<String> {
        match self {
            CacheItem::Value(value) => Some(value),
            CacheItem::Null => None,
        }
    }
}

impl From<Option<String>> for CacheItem {
    fn from(value: Option<String>) -> Self {
        value.map_or(CacheItem::Null, CacheItem::Value)
    }
}

/// Thread-safe LRU cache of resolution results
pub struct CalcCache {
    entries: Mutex<LruCache<String, CacheItem>>,
}

impl CalcCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheItem>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<CacheItem> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<CacheItem>) {
        self.lock().put(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for CalcCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[derive(Serialize)]
struct CacheKey<'a> {
    namespace: &'a str,
    name: &'a str,
    value: &'a str,
    opt: &'a Options,
}

/// Build the cache key for a call, or `None` when the options carry a callback.
pub fn create_cache_key(namespace: &str, name: &str, value: &str, options: &Options) -> Option<String> {
    if options.has_callback() {
        return None;
    }
    serde_json::to_string(&CacheKey {
        namespace,
        name,
        value,
        opt: options,
    })
    .ok()
}

//! Route lookup caching.
//!
//! This module provides [`RouteCache`]: an LRU cache in front of the
//! linear route-table scan. It is gated behind the `cache` feature flag and
//! uses the [`lru`] crate internally.
//!
//! The cache maps an exact pathname to the [`RouteRecord`] registered for it.
//! Misses are not cached, so a route added later is always found. The router
//! clears the cache whenever a route is added or removed.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations so you can monitor
//! cache effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use page_navigator::cache::RouteCache;
//! use page_navigator::RouteRecord;
//! use std::sync::Arc;
//!
//! let mut cache = RouteCache::new();
//! cache.insert("/home".to_string(), Arc::new(RouteRecord::new("/home")));
//!
//! assert_eq!(cache.get("/home").unwrap().path, "/home");
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::route::RouteRecord;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that fell through to the table.
    pub misses: usize,
    /// Number of full cache invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of pathname → route record.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Arc<RouteRecord>>,
    stats: CacheStats,
}

impl RouteCache {
    /// Default number of cached pathnames.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity. A capacity of zero is bumped
    /// to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Clear all entries and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up the cached record for `pathname`. Updates hit/miss stats.
    pub fn get(&mut self, pathname: &str) -> Option<Arc<RouteRecord>> {
        if let Some(record) = self.entries.get(pathname) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for '{}'", pathname);
            Some(Arc::clone(record))
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for '{}'", pathname);
            None
        }
    }

    /// Cache the record found for `pathname`.
    pub fn insert(&mut self, pathname: String, record: Arc<RouteRecord>) {
        self.entries.push(pathname, record);
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached pathnames.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

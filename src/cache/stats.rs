//! Registry-wide cache statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Cumulative counters for the lifetime of a registry.
///
/// Counters only grow; `stop` on the registry does not reset them.
/// They are diagnostics, so relaxed ordering is enough.
#[derive(Debug, Default)]
pub struct CacheStats {
    repos_wrapped: AtomicU64,
    cache_instances: AtomicU64,
    metadata_served: AtomicU64,
    artifacts_served: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub repos_wrapped: u64,
    pub cache_instances: u64,
    pub metadata_served: u64,
    pub artifacts_served: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_wrap(&self) {
        self.repos_wrapped.fetch_add(1, Ordering::Relaxed);
    }

    /// Must follow the matching `record_wrap` on the same thread.
    pub(crate) fn record_cache_instance(&self) {
        self.cache_instances.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_metadata_served(&self) {
        self.metadata_served.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_artifact_served(&self) {
        self.artifacts_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Wrap requests served while caching was enabled, hits and misses.
    pub fn repos_wrapped(&self) -> u64 {
        self.repos_wrapped.load(Ordering::Relaxed)
    }

    /// Bundles ever created.
    pub fn cache_instances(&self) -> u64 {
        self.cache_instances.load(Ordering::Acquire)
    }

    pub fn metadata_served(&self) -> u64 {
        self.metadata_served.load(Ordering::Relaxed)
    }

    pub fn artifacts_served(&self) -> u64 {
        self.artifacts_served.load(Ordering::Relaxed)
    }

    /// `cache_instances` is read first so the snapshot never shows more
    /// instances than wraps.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let cache_instances = self.cache_instances();
        CacheStatsSnapshot {
            repos_wrapped: self.repos_wrapped(),
            cache_instances,
            metadata_served: self.metadata_served(),
            artifacts_served: self.artifacts_served(),
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

impl fmt::Display for CacheStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "In-memory dependency resolution cache stats: repos wrapped: {}, cache instances: {}, \
             modules served from cache: {}, artifacts served from cache: {}",
            self.repos_wrapped, self.cache_instances, self.metadata_served, self.artifacts_served
        )
    }
}

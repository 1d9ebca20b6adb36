//! Sizing for the caches inside a repository bundle.

use std::time::Duration;

/// Configuration for a cache instance.
///
/// The default is unbounded with no expiry: a bundle keeps everything it
/// learns until the registry is stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Pre-allocated capacity.
    pub initial_capacity: Option<usize>,

    /// Maximum number of entries in the cache. `None` means unbounded.
    pub max_capacity: Option<u64>,

    /// Time-to-live for cache entries.
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity: Some(max_capacity),
            ..Default::default()
        }
    }

    /// Set initial capacity (builder pattern).
    #[must_use]
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = Some(initial_capacity);
        self
    }

    /// Set max capacity for cache (builder pattern).
    #[must_use]
    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }
}

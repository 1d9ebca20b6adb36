//! Per-resolution collaborators forwarded into the caching decorator.

use super::{ComponentId, ComponentMetadata};

/// Resolution policy consulted by the caching decorator.
pub trait ResolutionStrategy: Send + Sync {
    /// Whether the component may change between lookups (snapshots,
    /// dynamic versions). Changing components bypass the in-memory cache.
    fn is_changing(&self, component: &ComponentId) -> bool;
}

/// Post-processing applied to metadata fresh from a repository, before it is cached.
pub trait MetadataProcessor: Send + Sync {
    fn process(&self, metadata: ComponentMetadata) -> ComponentMetadata;
}

/// Treats `-SNAPSHOT` versions as changing; everything else is fixed.
#[derive(Debug, Clone, Default)]
pub struct DefaultResolutionStrategy;

impl ResolutionStrategy for DefaultResolutionStrategy {
    fn is_changing(&self, component: &ComponentId) -> bool {
        component.version.ends_with("-SNAPSHOT")
    }
}

/// Leaves metadata untouched.
#[derive(Debug, Clone, Default)]
pub struct IdentityProcessor;

impl MetadataProcessor for IdentityProcessor {
    fn process(&self, metadata: ComponentMetadata) -> ComponentMetadata {
        metadata
    }
}

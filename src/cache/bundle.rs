//! In-memory caches scoped to a single repository identity.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{CacheConfig, CacheStats, TypedCache};
use crate::repository::{ArtifactId, ComponentId, ComponentMetadata};

/// Lookup state shared by every decorated repository with the same id.
///
/// Metadata entries store `None` for components the repository does not
/// have, so a miss is answered from memory on the next lookup.
pub struct RepositoryCaches {
    metadata: TypedCache<ComponentId, Option<ComponentMetadata>>,
    artifacts: TypedCache<ArtifactId, PathBuf>,
    stats: Arc<CacheStats>,
    created_at: DateTime<Utc>,
}

impl RepositoryCaches {
    pub fn new(repository_id: &str, config: &CacheConfig, stats: Arc<CacheStats>) -> Self {
        Self {
            metadata: TypedCache::new(format!("{repository_id}/metadata"), config),
            artifacts: TypedCache::new(format!("{repository_id}/artifacts"), config),
            stats,
            created_at: Utc::now(),
        }
    }

    /// Cached metadata lookup. The outer `None` is a cache miss; the inner
    /// `None` is a remembered "not in this repository".
    pub fn metadata(&self, component: &ComponentId) -> Option<Option<ComponentMetadata>> {
        let cached = self.metadata.get(component);
        if cached.is_some() {
            self.stats.record_metadata_served();
        }
        cached
    }

    pub fn store_metadata(&self, component: ComponentId, metadata: Option<ComponentMetadata>) {
        self.metadata.insert(component, metadata);
    }

    pub fn artifact(&self, artifact: &ArtifactId) -> Option<PathBuf> {
        let cached = self.artifacts.get(artifact);
        if cached.is_some() {
            self.stats.record_artifact_served();
        }
        cached
    }

    pub fn store_artifact(&self, artifact: ArtifactId, path: PathBuf) {
        self.artifacts.insert(artifact, path);
    }

    pub fn metadata_count(&self) -> u64 {
        self.metadata.entry_count()
    }

    pub fn artifact_count(&self) -> u64 {
        self.artifacts.entry_count()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Debug for RepositoryCaches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryCaches")
            .field("metadata", &self.metadata)
            .field("artifacts", &self.artifacts)
            .field("created_at", &self.created_at)
            .finish()
    }
}

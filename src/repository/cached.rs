//! Repository decorator serving lookups from in-memory caches.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::{
    ArtifactId, ComponentId, ComponentMetadata, CrossSessionCache, MetadataProcessor,
    ModuleComponentRepository, ResolutionStrategy,
};
use crate::cache::RepositoryCaches;
use crate::error::RepositoryError;

/// A repository whose lookups go through a shared [`RepositoryCaches`].
///
/// Id and name are the delegate's own, so callers cannot tell it apart
/// from the repository it wraps. Delegate errors are returned unchanged
/// and never cached.
pub struct CachedRepository {
    strategy: Arc<dyn ResolutionStrategy>,
    caches: Arc<RepositoryCaches>,
    delegate: Arc<dyn ModuleComponentRepository>,
    cross_session: Arc<dyn CrossSessionCache>,
    processor: Arc<dyn MetadataProcessor>,
}

impl CachedRepository {
    pub fn new(
        strategy: Arc<dyn ResolutionStrategy>,
        caches: Arc<RepositoryCaches>,
        delegate: Arc<dyn ModuleComponentRepository>,
        cross_session: Arc<dyn CrossSessionCache>,
        processor: Arc<dyn MetadataProcessor>,
    ) -> Self {
        Self {
            strategy,
            caches,
            delegate,
            cross_session,
            processor,
        }
    }

    /// The wrapped repository.
    pub fn delegate(&self) -> &Arc<dyn ModuleComponentRepository> {
        &self.delegate
    }

    fn fetch_metadata(&self, component: &ComponentId) -> Result<Option<ComponentMetadata>, RepositoryError> {
        let metadata = self
            .delegate
            .resolve_metadata(component)?
            .map(|metadata| self.processor.process(metadata));
        Ok(metadata)
    }
}

impl ModuleComponentRepository for CachedRepository {
    fn id(&self) -> &str {
        self.delegate.id()
    }

    fn name(&self) -> &str {
        self.delegate.name()
    }

    fn resolve_metadata(&self, component: &ComponentId) -> Result<Option<ComponentMetadata>, RepositoryError> {
        if self.strategy.is_changing(component) {
            debug!("{} is changing, bypassing in-memory cache for '{}'", component, self.name());
            return self.fetch_metadata(component);
        }

        if let Some(cached) = self.caches.metadata(component) {
            return Ok(cached);
        }

        if let Some(metadata) = self.cross_session.get(self.id(), component) {
            debug!("Found {} in cross-session cache for '{}'", component, self.name());
            self.caches.store_metadata(component.clone(), Some(metadata.clone()));
            return Ok(Some(metadata));
        }

        let metadata = self.fetch_metadata(component)?;
        if let Some(found) = &metadata {
            self.cross_session.put(self.id(), component, found);
        }
        self.caches.store_metadata(component.clone(), metadata.clone());

        Ok(metadata)
    }

    fn resolve_artifact(&self, artifact: &ArtifactId) -> Result<Option<PathBuf>, RepositoryError> {
        if let Some(path) = self.caches.artifact(artifact) {
            return Ok(Some(path));
        }

        let path = self.delegate.resolve_artifact(artifact)?;
        if let Some(found) = &path {
            self.caches.store_artifact(artifact.clone(), found.clone());
        }

        Ok(path)
    }

    fn in_memory_caches(&self) -> Option<&Arc<RepositoryCaches>> {
        Some(&self.caches)
    }
}

impl std::fmt::Debug for CachedRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedRepository")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("caches", &self.caches)
            .finish()
    }
}

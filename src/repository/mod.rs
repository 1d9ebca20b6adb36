//! Repository capability surface.
//!
//! Anything implementing [`ModuleComponentRepository`] can be handed to the
//! cache registry. The decorated repository it returns implements the same
//! trait, so resolvers never need to know whether caching is active.
//!
//! ## Modules
//!
//! - `strategy` - Resolution strategy and metadata processing collaborators
//! - `cross_session` - Cache shared across resolution sessions
//! - `cached` - The caching decorator built by the registry
//! - `local` - Manifest-backed repository

mod cached;
mod cross_session;
mod local;
mod strategy;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::RepositoryCaches;
use crate::error::RepositoryError;

pub use cached::CachedRepository;
pub use cross_session::{CrossSessionCache, SharedMetadataStore};
pub use local::{LocalRepository, ManifestComponent, RepositoryManifest};
pub use strategy::{DefaultResolutionStrategy, IdentityProcessor, MetadataProcessor, ResolutionStrategy};

/// Coordinates of a module component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    pub group: String,
    pub module: String,
    pub version: String,
}

impl ComponentId {
    pub fn new(group: impl Into<String>, module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.module, self.version)
    }
}

/// A single artifact published by a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId {
    pub component: ComponentId,
    pub name: String,
    pub extension: String,
}

impl ArtifactId {
    pub fn new(component: ComponentId, name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            component,
            name: name.into(),
            extension: extension.into(),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}.{}", self.component, self.name, self.extension)
    }
}

/// Resolved metadata of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub id: ComponentId,
    /// Release status, e.g. `release` or `integration`.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub dependencies: Vec<ComponentId>,
}

fn default_status() -> String {
    "release".to_string()
}

impl ComponentMetadata {
    pub fn new(id: ComponentId) -> Self {
        Self {
            id,
            status: default_status(),
            dependencies: Vec::new(),
        }
    }

    /// Add a dependency (builder pattern).
    #[must_use]
    pub fn with_dependency(mut self, dependency: ComponentId) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// Query surface of a module component repository.
pub trait ModuleComponentRepository: Send + Sync {
    /// Stable identity of the repository configuration. Two handles for the
    /// same configuration must return equal ids.
    fn id(&self) -> &str;

    /// Human-readable name, for diagnostics only.
    fn name(&self) -> &str;

    /// Look up a component's metadata. `Ok(None)` means the repository does
    /// not contain the component.
    fn resolve_metadata(&self, component: &ComponentId) -> Result<Option<ComponentMetadata>, RepositoryError>;

    /// Locate an artifact on disk. `Ok(None)` means it is not available here.
    fn resolve_artifact(&self, artifact: &ArtifactId) -> Result<Option<PathBuf>, RepositoryError>;

    /// The in-memory caches backing this repository, if it is a cached one.
    fn in_memory_caches(&self) -> Option<&Arc<RepositoryCaches>> {
        None
    }
}

impl fmt::Debug for dyn ModuleComponentRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleComponentRepository")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("cached", &self.in_memory_caches().is_some())
            .finish()
    }
}

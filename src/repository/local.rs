//! Repository backed by a JSON manifest.
//!
//! The manifest lists the repository's id, name, components and artifact
//! locations. Lookups are answered from memory after loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{ArtifactId, ComponentId, ComponentMetadata, ModuleComponentRepository};
use crate::error::RepositoryError;

/// On-disk manifest format.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryManifest {
    pub id: String,
    pub name: String,
    /// Directory artifact paths are resolved against.
    #[serde(default)]
    pub root: PathBuf,
    #[serde(default)]
    pub components: Vec<ManifestComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestComponent {
    #[serde(flatten)]
    pub metadata: ComponentMetadata,
    /// Artifact file names, e.g. `core-1.0.jar`.
    #[serde(default)]
    pub artifacts: Vec<String>,
}

/// Repository serving components listed in a [`RepositoryManifest`].
#[derive(Debug)]
pub struct LocalRepository {
    id: String,
    name: String,
    components: HashMap<ComponentId, ComponentMetadata>,
    artifacts: HashMap<ArtifactId, PathBuf>,
}

impl LocalRepository {
    /// Load a repository from a manifest file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let repository = Self::from_json(&raw)?;
        debug!(
            "Loaded repository '{}' from {} ({} components)",
            repository.name,
            path.display(),
            repository.components.len()
        );
        Ok(repository)
    }

    pub fn from_json(raw: &str) -> Result<Self, RepositoryError> {
        let manifest: RepositoryManifest = serde_json::from_str(raw)?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_manifest(manifest: RepositoryManifest) -> Self {
        let mut components = HashMap::with_capacity(manifest.components.len());
        let mut artifacts = HashMap::new();

        for entry in manifest.components {
            let id = entry.metadata.id.clone();
            for file in entry.artifacts {
                let (name, extension) = split_file_name(&file);
                artifacts.insert(
                    ArtifactId::new(id.clone(), name, extension),
                    manifest.root.join(&file),
                );
            }
            components.insert(id, entry.metadata);
        }

        Self {
            id: manifest.id,
            name: manifest.name,
            components,
            artifacts,
        }
    }

    /// Every component this repository contains.
    pub fn component_ids(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self.components.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Every artifact this repository contains.
    pub fn artifact_ids(&self) -> Vec<ArtifactId> {
        self.artifacts.keys().cloned().collect()
    }
}

fn split_file_name(file: &str) -> (&str, &str) {
    file.rsplit_once('.').unwrap_or((file, ""))
}

impl ModuleComponentRepository for LocalRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_metadata(&self, component: &ComponentId) -> Result<Option<ComponentMetadata>, RepositoryError> {
        Ok(self.components.get(component).cloned())
    }

    fn resolve_artifact(&self, artifact: &ArtifactId) -> Result<Option<PathBuf>, RepositoryError> {
        Ok(self.artifacts.get(artifact).cloned())
    }
}

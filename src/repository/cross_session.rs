//! Metadata cache shared across resolution sessions.
//!
//! The registry only forwards this collaborator into each decorated
//! repository; it never reads or writes it itself.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::{ComponentId, ComponentMetadata};

/// Cache that outlives a single registry `stop`.
pub trait CrossSessionCache: Send + Sync {
    fn get(&self, repository_id: &str, component: &ComponentId) -> Option<ComponentMetadata>;

    fn put(&self, repository_id: &str, component: &ComponentId, metadata: &ComponentMetadata);
}

/// In-memory cross-session store.
#[derive(Clone, Default)]
pub struct SharedMetadataStore {
    entries: Arc<DashMap<(Arc<str>, ComponentId), ComponentMetadata>>,
}

impl SharedMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CrossSessionCache for SharedMetadataStore {
    fn get(&self, repository_id: &str, component: &ComponentId) -> Option<ComponentMetadata> {
        let key = (Arc::<str>::from(repository_id), component.clone());
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    fn put(&self, repository_id: &str, component: &ComponentId, metadata: &ComponentMetadata) {
        debug!("Storing {} for repo [{}] in cross-session cache", component, repository_id);
        self.entries
            .insert((Arc::from(repository_id), component.clone()), metadata.clone());
    }
}

impl std::fmt::Debug for SharedMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMetadataStore")
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

//! Registry key for repository bundles.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::CacheError;
use crate::repository::ModuleComponentRepository;

/// Identity of a repository configuration.
///
/// Never derived from the human-readable name; only the repository's own
/// id decides whether two handles share a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryId(Arc<str>);

impl RepositoryId {
    /// Take the id of a repository, rejecting empty ones.
    pub fn of(repository: &dyn ModuleComponentRepository) -> Result<Self, CacheError> {
        let raw = repository.id();
        if raw.trim().is_empty() {
            return Err(CacheError::InvalidRepositoryId {
                name: repository.name().to_string(),
            });
        }
        Ok(Self(Arc::from(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RepositoryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

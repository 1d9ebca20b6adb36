//! Error types.

use thiserror::Error;

/// Errors raised by the cache registry itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The repository handed to the registry has no usable identity.
    #[error("Repository '{name}' has an empty id and cannot be cached")]
    InvalidRepositoryId { name: String },
}

/// Errors raised while querying a repository.
///
/// The cache layer never produces these on its own; it passes them through
/// from the wrapped repository untouched.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid repository manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Repository lookup failed: {0}")]
    Delegate(String),
}

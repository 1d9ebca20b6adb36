//! Resolvecache - In-memory repository caching for dependency resolution
//!
//! Keeps one bundle of lookup caches per repository identity for the life
//! of a resolution session, shared by every resolver that wraps the same
//! repository.
//!
//! ## Architecture
//!
//! - `cache` - Registry, bundles, toggle and statistics
//! - `repository` - Repository trait, caching decorator, collaborators
//! - `config` - Environment configuration
//! - `lifecycle` - Session shutdown
//! - `error` - Error types

pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod repository;

pub use cache::{CacheConfig, CacheStats, CacheToggle, RepositoryCacheRegistry, RepositoryCaches};
pub use error::{CacheError, RepositoryError};
pub use lifecycle::Stoppable;
pub use repository::{CachedRepository, ModuleComponentRepository};

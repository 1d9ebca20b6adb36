//! Cache module - In-memory repository caching using Moka.
//!
//! This module keeps one bundle of lookup caches per repository identity
//! for the life of a resolution session.
//!
//! ## Architecture
//!
//! The cache system follows a registry pattern:
//! - `RepositoryCacheRegistry` - Central registry mapping repository ids to bundles
//! - `RepositoryCaches` - The bundle: metadata and artifact caches for one repository
//! - `CacheToggle` - Enable/disable switch, checked on every wrap
//! - `CacheStats` - Cumulative counters, logged when the registry stops
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = RepositoryCacheRegistry::new(cross_session, CacheToggle::default(), CacheConfig::default());
//!
//! // Wrap a repository; the same id always gets the same bundle
//! let cached = registry.wrap(repo, strategy, processor)?;
//!
//! // At session end
//! registry.stop();
//! ```

mod bundle;
mod config;
mod identity;
mod registry;
mod stats;
mod toggle;
mod typed;

pub use bundle::RepositoryCaches;
pub use config::CacheConfig;
pub use identity::RepositoryId;
pub use registry::RepositoryCacheRegistry;
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use toggle::{CacheToggle, TOGGLE_VAR, ToggleHandle, parse_toggle};
pub use typed::TypedCache;

//! Cache registry - one bundle of in-memory caches per repository identity.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{Level, debug, enabled};

use super::{CacheConfig, CacheStats, CacheToggle, RepositoryCaches, RepositoryId};
use crate::error::CacheError;
use crate::lifecycle::Stoppable;
use crate::repository::{
    CachedRepository, CrossSessionCache, MetadataProcessor, ModuleComponentRepository,
    ResolutionStrategy,
};

/// Central registry handing out in-memory caches per repository.
///
/// The first wrap for a repository id creates its [`RepositoryCaches`];
/// every later wrap for the same id reuses it until [`stop`](Self::stop).
/// Creation goes through an atomic insert-if-absent, so concurrent first
/// wraps of one id never build two bundles.
///
/// ## Example
///
/// ```rust,ignore
/// let registry = RepositoryCacheRegistry::new(cross_session, CacheToggle::default(), CacheConfig::default());
///
/// let cached = registry.wrap(repo, strategy, processor)?;
/// let metadata = cached.resolve_metadata(&component)?;
///
/// registry.stop();
/// ```
pub struct RepositoryCacheRegistry {
    caches: DashMap<RepositoryId, Arc<RepositoryCaches>>,
    stats: Arc<CacheStats>,
    cross_session: Arc<dyn CrossSessionCache>,
    toggle: CacheToggle,
    config: CacheConfig,
}

impl RepositoryCacheRegistry {
    /// Create a new empty registry.
    pub fn new(cross_session: Arc<dyn CrossSessionCache>, toggle: CacheToggle, config: CacheConfig) -> Self {
        debug!("In-memory repository cache registry initialized");
        Self {
            caches: DashMap::new(),
            stats: Arc::new(CacheStats::new()),
            cross_session,
            toggle,
            config,
        }
    }

    /// Wrap a repository with in-memory caching.
    ///
    /// With caching disabled the input is returned as-is and nothing is
    /// counted. Otherwise the result is a [`CachedRepository`] over the
    /// bundle for the repository's id.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidRepositoryId`] if caching is enabled and
    /// the repository's id is empty.
    pub fn wrap(
        &self,
        repository: Arc<dyn ModuleComponentRepository>,
        strategy: Arc<dyn ResolutionStrategy>,
        processor: Arc<dyn MetadataProcessor>,
    ) -> Result<Arc<dyn ModuleComponentRepository>, CacheError> {
        if !self.toggle.is_enabled() {
            return Ok(repository);
        }

        let id = RepositoryId::of(repository.as_ref())?;
        self.stats.record_wrap();

        let caches = match self.caches.entry(id) {
            Entry::Occupied(entry) => {
                debug!(
                    "Reusing in-memory cache for repo '{}' [{}].",
                    repository.name(),
                    entry.key()
                );
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                debug!(
                    "Creating new in-memory cache for repo '{}' [{}].",
                    repository.name(),
                    entry.key()
                );
                let caches = Arc::new(RepositoryCaches::new(
                    entry.key().as_str(),
                    &self.config,
                    Arc::clone(&self.stats),
                ));
                self.stats.record_cache_instance();
                entry.insert(Arc::clone(&caches));
                caches
            }
        };

        Ok(Arc::new(CachedRepository::new(
            strategy,
            caches,
            repository,
            Arc::clone(&self.cross_session),
            processor,
        )))
    }

    /// Drop every bundle. Statistics are kept.
    pub fn stop(&self) {
        if enabled!(Level::DEBUG) {
            for entry in self.caches.iter() {
                let caches = entry.value();
                debug!(
                    "Releasing in-memory cache for repo [{}]: {} modules, {} artifacts, created {}.",
                    entry.key(),
                    caches.metadata_count(),
                    caches.artifact_count(),
                    caches.created_at().to_rfc3339()
                );
            }
        }
        self.caches.clear();
        debug!("In-memory dependency metadata cache closed. {}", self.stats);
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The bundle currently registered for `id`.
    pub fn caches_for(&self, id: &str) -> Option<Arc<RepositoryCaches>> {
        self.caches.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a bundle exists for the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.caches.contains_key(id)
    }

    /// Get the number of live bundles.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Ids of all live bundles.
    pub fn repository_ids(&self) -> Vec<RepositoryId> {
        self.caches.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Stoppable for RepositoryCacheRegistry {
    fn stop(&self) {
        RepositoryCacheRegistry::stop(self);
    }
}

impl std::fmt::Debug for RepositoryCacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryCacheRegistry")
            .field("cache_count", &self.caches.len())
            .field("repository_ids", &self.repository_ids())
            .field("toggle", &self.toggle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Barrier;
    use std::thread;

    use crate::cache::ToggleHandle;
    use crate::error::RepositoryError;
    use crate::repository::{
        ArtifactId, ComponentId, ComponentMetadata, DefaultResolutionStrategy, IdentityProcessor,
        SharedMetadataStore,
    };

    struct StubRepository {
        id: String,
        name: String,
    }

    impl ModuleComponentRepository for StubRepository {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn resolve_metadata(&self, component: &ComponentId) -> Result<Option<ComponentMetadata>, RepositoryError> {
            Ok(Some(ComponentMetadata::new(component.clone())))
        }

        fn resolve_artifact(&self, _artifact: &ArtifactId) -> Result<Option<PathBuf>, RepositoryError> {
            Ok(None)
        }
    }

    fn repo(id: &str) -> Arc<dyn ModuleComponentRepository> {
        Arc::new(StubRepository {
            id: id.to_string(),
            name: format!("{id}-name"),
        })
    }

    fn registry() -> (RepositoryCacheRegistry, ToggleHandle) {
        let (toggle, handle) = CacheToggle::switch(true);
        let registry = RepositoryCacheRegistry::new(
            Arc::new(SharedMetadataStore::new()),
            toggle,
            CacheConfig::default(),
        );
        (registry, handle)
    }

    fn wrap(registry: &RepositoryCacheRegistry, repository: &Arc<dyn ModuleComponentRepository>) -> Arc<dyn ModuleComponentRepository> {
        registry
            .wrap(
                Arc::clone(repository),
                Arc::new(DefaultResolutionStrategy),
                Arc::new(IdentityProcessor),
            )
            .unwrap()
    }

    fn bundle(repository: &Arc<dyn ModuleComponentRepository>) -> Arc<RepositoryCaches> {
        Arc::clone(repository.in_memory_caches().expect("repository should be cached"))
    }

    #[test]
    fn test_reuses_bundle_per_identity() {
        let (registry, _) = registry();
        let repo_a = repo("repoA");
        let repo_b = repo("repoB");

        let first = wrap(&registry, &repo_a);
        let second = wrap(&registry, &repo_b);
        let third = wrap(&registry, &repo_a);

        assert_eq!(registry.stats().cache_instances(), 2);
        assert_eq!(registry.stats().repos_wrapped(), 3);
        assert!(Arc::ptr_eq(&bundle(&first), &bundle(&third)));
        assert!(!Arc::ptr_eq(&bundle(&first), &bundle(&second)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_identity_not_name_is_the_key() {
        let (registry, _) = registry();
        let one: Arc<dyn ModuleComponentRepository> = Arc::new(StubRepository {
            id: "shared".to_string(),
            name: "first".to_string(),
        });
        let two: Arc<dyn ModuleComponentRepository> = Arc::new(StubRepository {
            id: "shared".to_string(),
            name: "second".to_string(),
        });

        let first = wrap(&registry, &one);
        let second = wrap(&registry, &two);

        assert!(Arc::ptr_eq(&bundle(&first), &bundle(&second)));
        assert_eq!(second.name(), "second");
        assert_eq!(registry.stats().cache_instances(), 1);
    }

    #[test]
    fn test_disabled_is_pass_through() {
        let (registry, handle) = registry();
        handle.disable();
        let repo_a = repo("repoA");

        let first = wrap(&registry, &repo_a);
        let second = wrap(&registry, &repo_a);

        assert!(Arc::ptr_eq(&first, &repo_a));
        assert!(Arc::ptr_eq(&second, &repo_a));
        assert!(first.in_memory_caches().is_none());
        assert_eq!(registry.stats().repos_wrapped(), 0);
        assert_eq!(registry.stats().cache_instances(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_toggle_is_read_per_call() {
        let (registry, handle) = registry();
        let repo_a = repo("repoA");

        wrap(&registry, &repo_a);
        handle.disable();
        let passed = wrap(&registry, &repo_a);
        handle.enable();
        wrap(&registry, &repo_a);

        assert!(Arc::ptr_eq(&passed, &repo_a));
        assert_eq!(registry.stats().repos_wrapped(), 2);
        assert_eq!(registry.stats().cache_instances(), 1);
    }

    #[test]
    fn test_stop_drops_bundles_but_keeps_stats() {
        let (registry, _) = registry();
        let repo_a = repo("repoA");

        let before = wrap(&registry, &repo_a);
        registry.stop();
        assert!(registry.is_empty());
        assert!(!registry.contains("repoA"));

        let after = wrap(&registry, &repo_a);

        assert_eq!(registry.stats().cache_instances(), 2);
        assert_eq!(registry.stats().repos_wrapped(), 2);
        assert!(!Arc::ptr_eq(&bundle(&before), &bundle(&after)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (registry, _) = registry();
        wrap(&registry, &repo("repoA"));

        registry.stop();
        registry.stop();

        assert!(registry.is_empty());
        assert_eq!(registry.stats().cache_instances(), 1);
        assert_eq!(registry.stats().repos_wrapped(), 1);
    }

    #[test]
    fn test_decorated_repository_outlives_stop() {
        let (registry, _) = registry();
        let wrapped = wrap(&registry, &repo("repoA"));
        let component = ComponentId::new("g", "m", "1");
        wrapped.resolve_metadata(&component).unwrap();

        registry.stop();

        assert!(wrapped.resolve_metadata(&component).unwrap().is_some());
        assert_eq!(registry.stats().metadata_served(), 1);
    }

    #[test]
    fn test_empty_identity_is_rejected() {
        let (registry, _) = registry();
        let blank: Arc<dyn ModuleComponentRepository> = Arc::new(StubRepository {
            id: "  ".to_string(),
            name: "blank".to_string(),
        });

        let err = registry
            .wrap(blank, Arc::new(DefaultResolutionStrategy), Arc::new(IdentityProcessor))
            .unwrap_err();

        assert_eq!(err, CacheError::InvalidRepositoryId { name: "blank".to_string() });
        assert_eq!(registry.stats().repos_wrapped(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_caches_for() {
        let (registry, _) = registry();
        let wrapped = wrap(&registry, &repo("repoA"));

        let registered = registry.caches_for("repoA").unwrap();

        assert!(Arc::ptr_eq(&registered, &bundle(&wrapped)));
        assert!(registry.caches_for("repoB").is_none());
        assert_eq!(registry.repository_ids()[0].as_str(), "repoA");
    }

    #[test]
    fn test_concurrent_first_wraps_share_one_bundle() {
        const THREADS: usize = 8;
        let (registry, _) = registry();
        let registry = Arc::new(registry);
        let barrier = Arc::new(Barrier::new(THREADS));
        let repo_a = repo("repoA");

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                let repo_a = Arc::clone(&repo_a);
                thread::spawn(move || {
                    barrier.wait();
                    bundle(&wrap(&registry, &repo_a))
                })
            })
            .collect();

        let bundles: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(bundles.iter().all(|b| Arc::ptr_eq(b, &bundles[0])));
        assert_eq!(registry.stats().cache_instances(), 1);
        assert_eq!(registry.stats().repos_wrapped(), THREADS as u64);
    }

    #[test]
    fn test_concurrent_wraps_of_distinct_ids() {
        const THREADS: usize = 8;
        const IDS: usize = 5;
        let (registry, _) = registry();
        let registry = Arc::new(registry);
        let barrier = Arc::new(Barrier::new(THREADS));
        let repos: Arc<Vec<_>> = Arc::new((0..IDS).map(|i| repo(&format!("repo{i}"))).collect());

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                let repos = Arc::clone(&repos);
                thread::spawn(move || {
                    barrier.wait();
                    (0..IDS)
                        .map(|i| {
                            let idx = (i + t) % IDS;
                            (idx, bundle(&wrap(&registry, &repos[idx])))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.len(), IDS);
        assert_eq!(registry.stats().cache_instances(), IDS as u64);
        assert_eq!(registry.stats().repos_wrapped(), (THREADS * IDS) as u64);
        for (idx, caches) in &results {
            let registered = registry.caches_for(&format!("repo{idx}")).unwrap();
            assert!(Arc::ptr_eq(&registered, caches));
        }
    }

    #[test]
    fn test_snapshot_never_shows_more_instances_than_wraps() {
        const THREADS: usize = 4;
        const WRAPS: usize = 200;
        let (registry, _) = registry();
        let registry = Arc::new(registry);

        let writers: Vec<_> = (0..THREADS)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..WRAPS {
                        wrap(&registry, &repo(&format!("repo-{t}-{i}")));
                    }
                })
            })
            .collect();

        while !writers.iter().all(|w| w.is_finished()) {
            let snapshot = registry.stats().snapshot();
            assert!(snapshot.cache_instances <= snapshot.repos_wrapped);
        }
        for writer in writers {
            writer.join().unwrap();
        }

        let snapshot = registry.stats().snapshot();
        assert_eq!(snapshot.cache_instances, (THREADS * WRAPS) as u64);
        assert_eq!(snapshot.repos_wrapped, (THREADS * WRAPS) as u64);
    }

    #[test]
    fn test_bundle_contents_visible_until_stop() {
        let (registry, _) = registry();
        let wrapped = wrap(&registry, &repo("repoA"));
        wrapped.resolve_metadata(&ComponentId::new("g", "m", "1")).unwrap();

        let caches = registry.caches_for("repoA").unwrap();
        assert_eq!(caches.metadata_count(), 1);
        assert_eq!(caches.artifact_count(), 0);
        assert!(caches.created_at() <= chrono::Utc::now());

        registry.stop();
        assert!(registry.caches_for("repoA").is_none());
    }

    #[test]
    fn test_stoppable() {
        let (registry, _) = registry();
        let registry = Arc::new(registry);
        wrap(&registry, &repo("repoA"));

        let service: Arc<dyn Stoppable> = registry.clone();
        service.stop();

        assert!(registry.is_empty());
    }
}

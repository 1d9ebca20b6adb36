//! Resolvecache - command line driver.
//!
//! Loads repository manifests, resolves every component they list through
//! the in-memory cache registry twice (two resolution runs sharing one
//! registry), prints the cache statistics and stops the registry.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use resolvecache::config::Config;
use resolvecache::repository::{
    DefaultResolutionStrategy, IdentityProcessor, LocalRepository, ModuleComponentRepository,
    SharedMetadataStore,
};
use resolvecache::{RepositoryCacheRegistry, Stoppable};

/// Resolution runs simulated per repository.
const RUNS: usize = 2;

fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "debug" for our crate so cache events show
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resolvecache=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = Config::from_env();
    info!("Configuration loaded, caching toggle read from {}", config.toggle_var);

    let manifests: Vec<PathBuf> = {
        let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
        if args.is_empty() { config.repositories.clone() } else { args }
    };
    if manifests.is_empty() {
        anyhow::bail!("No repository manifests given (pass paths or set RESOLUTION_REPOSITORIES)");
    }

    let mut repositories = Vec::with_capacity(manifests.len());
    for path in &manifests {
        let repository = LocalRepository::open(path)
            .with_context(|| format!("Failed to load repository manifest {}", path.display()))?;
        repositories.push(Arc::new(repository));
    }

    let registry = Arc::new(RepositoryCacheRegistry::new(
        Arc::new(SharedMetadataStore::new()),
        config.toggle(),
        config.cache_config(),
    ));

    let strategy = Arc::new(DefaultResolutionStrategy);
    let processor = Arc::new(IdentityProcessor);

    for run in 1..=RUNS {
        let mut resolved = 0usize;
        let mut artifacts = 0usize;

        for local in &repositories {
            let components = local.component_ids();
            let artifact_ids = local.artifact_ids();
            let repository: Arc<dyn ModuleComponentRepository> = local.clone();
            let wrapped = registry.wrap(repository, strategy.clone(), processor.clone())?;

            for component in &components {
                if wrapped.resolve_metadata(component)?.is_some() {
                    resolved += 1;
                }
            }
            for artifact in &artifact_ids {
                if wrapped.resolve_artifact(artifact)?.is_some() {
                    artifacts += 1;
                }
            }
        }

        info!("Run {}: resolved {} components and {} artifacts", run, resolved, artifacts);
    }

    println!("{}", serde_json::to_string_pretty(&registry.stats().snapshot())?);

    let service: Arc<dyn Stoppable> = registry;
    service.stop();

    Ok(())
}

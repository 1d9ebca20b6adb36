//! Configuration module.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{CacheConfig, CacheToggle, TOGGLE_VAR};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment variable holding the caching on/off switch.
    /// Read on every wrap, not here.
    pub toggle_var: String,

    /// Per-bundle entry bound. Unbounded when unset.
    pub max_capacity: Option<u64>,

    /// Repository manifests for the command line tool (comma-separated).
    pub repositories: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let toggle_var = env::var("RESOLUTION_MEMORY_CACHE_VAR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| TOGGLE_VAR.to_string());

        let max_capacity = env::var("RESOLUTION_CACHE_MAX_CAPACITY")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok());

        let repositories = parse_paths(&env::var("RESOLUTION_REPOSITORIES").unwrap_or_default());

        Self {
            toggle_var,
            max_capacity,
            repositories,
        }
    }

    /// Toggle reading [`Config::toggle_var`].
    pub fn toggle(&self) -> CacheToggle {
        CacheToggle::from_env(self.toggle_var.clone())
    }

    /// Bundle cache sizing.
    pub fn cache_config(&self) -> CacheConfig {
        match self.max_capacity {
            Some(max) => CacheConfig::with_capacity(max),
            None => CacheConfig::default(),
        }
    }
}

fn parse_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

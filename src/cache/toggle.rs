//! Enable/disable switch for in-memory repository caching.

use std::borrow::Cow;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable consulted by [`CacheToggle::from_default_env`].
pub const TOGGLE_VAR: &str = "RESOLUTION_MEMORY_CACHE";

/// Decides, per wrap call, whether caching is active.
///
/// The toggle is evaluated on every check, never at construction, so a
/// flip mid-process takes effect on the next wrap.
#[derive(Debug, Clone)]
pub enum CacheToggle {
    /// Read the named environment variable on every check.
    Env(Cow<'static, str>),
    /// Shared in-process switch, see [`ToggleHandle`].
    Switch(Arc<AtomicBool>),
}

/// Handle for flipping a [`CacheToggle::Switch`] from elsewhere.
#[derive(Debug, Clone)]
pub struct ToggleHandle(Arc<AtomicBool>);

impl CacheToggle {
    /// Toggle driven by [`TOGGLE_VAR`].
    pub fn from_default_env() -> Self {
        Self::Env(Cow::Borrowed(TOGGLE_VAR))
    }

    /// Toggle driven by an arbitrary environment variable.
    pub fn from_env(var: impl Into<Cow<'static, str>>) -> Self {
        Self::Env(var.into())
    }

    /// In-process switch with its handle.
    pub fn switch(enabled: bool) -> (Self, ToggleHandle) {
        let flag = Arc::new(AtomicBool::new(enabled));
        (Self::Switch(Arc::clone(&flag)), ToggleHandle(flag))
    }

    /// Switch that stays enabled.
    pub fn always() -> Self {
        Self::Switch(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Env(var) => parse_toggle(env::var(&**var).ok().as_deref()),
            Self::Switch(flag) => flag.load(Ordering::Relaxed),
        }
    }
}

impl Default for CacheToggle {
    fn default() -> Self {
        Self::from_default_env()
    }
}

impl ToggleHandle {
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    pub fn enable(&self) {
        self.set(true);
    }

    pub fn disable(&self) {
        self.set(false);
    }
}

/// Caching stays on unless the value is exactly `false`, ignoring case.
pub fn parse_toggle(value: Option<&str>) -> bool {
    !matches!(value, Some(v) if v.eq_ignore_ascii_case("false"))
}

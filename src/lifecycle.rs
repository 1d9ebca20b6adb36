//! Session lifecycle.

/// A service holding session-scoped state that must be released at shutdown.
///
/// Implementations are idempotent: stopping twice is harmless.
pub trait Stoppable: Send + Sync {
    fn stop(&self);
}

//! Structured cancellation for the generation pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation scope for one controller's pipeline work.
///
/// Cloned into every pipeline worker and checked at the start of each
/// element; set once on controller teardown. Cancellation is not a
/// failure: the cycle unwinds cleanly, keeping whatever was already
/// merged into the store.
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    cancelled: Arc<AtomicBool>,
}

impl CancelScope {
    /// Creates a fresh, uncancelled scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Irrevocable for this scope.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_visible_to_clones() {
        let scope = CancelScope::new();
        let clone = scope.clone();
        assert!(!clone.is_cancelled());

        scope.cancel();
        assert!(clone.is_cancelled());
    }
}

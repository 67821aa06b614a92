//! Opaque handle types for pooled resources.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for renderable handles.
static RENDERABLE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a pooled renderable resource.
///
/// The streaming core never inspects the resource behind the handle; it
/// only acquires, repositions, and releases it through the presentation
/// adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderableId(u64);

impl RenderableId {
    /// Null/invalid handle.
    pub const NULL: Self = Self(0);

    /// Creates a new unique renderable handle.
    #[must_use]
    pub fn new() -> Self {
        Self(RENDERABLE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Checks if this is a valid (non-null) handle.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for RenderableId {
    fn default() -> Self {
        Self::new()
    }
}

//! Defining contexts
//!
//! Every class is defined in exactly one context. Classes from different
//! contexts may share a qualified name without colliding.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of the context that defined a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// The system context, visible from every other context
    pub const SYSTEM: ContextId = ContextId(0);

    /// Create a new unique context ID
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ContextId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this is the system context
    pub fn is_system(&self) -> bool {
        *self == Self::SYSTEM
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_system() {
            f.write_str("system context")
        } else {
            write!(f, "context #{}", self.0)
        }
    }
}

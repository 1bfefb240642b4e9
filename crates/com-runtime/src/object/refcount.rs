//! Intrusive reference counting
//!
//! Each object carries one counter shared by every view onto it. The count
//! starts at 1 for the creator's implicit reference.

use std::sync::atomic::{self, AtomicU32, Ordering};
use tracing::error;

/// Counts above this abort the process instead of wrapping
const MAX_REFS: u32 = u32::MAX / 2;

/// Atomic reference count
#[derive(Debug)]
pub struct RefCount(AtomicU32);

impl RefCount {
    /// Create a counter holding the construction-time reference
    pub const fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    /// Add one reference, returning the new count
    pub fn add_ref(&self) -> u32 {
        // Relaxed is enough: the caller already holds a reference
        let previous = self.0.fetch_add(1, Ordering::Relaxed);
        if previous > MAX_REFS {
            error!("reference count overflow ({}), aborting", previous);
            std::process::abort();
        }
        previous + 1
    }

    /// Drop one reference, returning the new count
    ///
    /// Exactly one caller ever sees `0`, and that caller must destroy the
    /// object. The acquire fence orders every other holder's last use
    /// before destruction.
    pub fn release(&self) -> u32 {
        let previous = self.0.fetch_sub(1, Ordering::Release);
        debug_assert!(previous != 0, "release on a destroyed object");
        if previous == 1 {
            atomic::fence(Ordering::Acquire);
        }
        previous.wrapping_sub(1)
    }

    /// Current count (informational under concurrent use)
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

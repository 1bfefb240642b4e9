//! Module residency tracking
//!
//! A module holds two counters: the objects its factories produced that are
//! still alive, and the server locks taken through `LockServer`. The module
//! can be unloaded only when both are zero.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use crate::types::{ComError, Result};

/// Live-object and lock counters for one module
pub struct ModuleState {
    live_objects: AtomicUsize,
    locks: AtomicUsize,
    max_live_objects: Option<usize>,
}

impl ModuleState {
    /// Create a module with no object quota
    pub fn new() -> Self {
        Self::with_quota(None)
    }

    /// Create a module that admits at most `max_live_objects` live objects
    pub fn with_quota(max_live_objects: Option<usize>) -> Self {
        Self {
            live_objects: AtomicUsize::new(0),
            locks: AtomicUsize::new(0),
            max_live_objects,
        }
    }

    /// Reserve a live-object slot
    ///
    /// The slot is held by the returned token and given back when the token
    /// drops. Fails with `OutOfMemory` when the quota is reached.
    pub fn admit(self: &Arc<Self>) -> Result<ObjectToken> {
        let mut current = self.live_objects.load(Ordering::Relaxed);
        loop {
            if let Some(max) = self.max_live_objects {
                if current >= max {
                    warn!("object quota exhausted ({} live)", current);
                    return Err(ComError::OutOfMemory);
                }
            }
            match self.live_objects.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        Ok(ObjectToken { module: self.clone() })
    }

    /// Take a server lock, returning the new lock count
    pub fn lock(&self) -> usize {
        let locks = self.locks.fetch_add(1, Ordering::AcqRel) + 1;
        info!("server locked, locks = {}", locks);
        locks
    }

    /// Give up a server lock, returning the new lock count
    ///
    /// An unlock without a matching lock is ignored.
    pub fn unlock(&self) -> usize {
        match self
            .locks
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(previous) => {
                info!("server unlocked, locks = {}", previous - 1);
                previous - 1
            }
            Err(_) => {
                warn!("unbalanced server unlock ignored");
                0
            }
        }
    }

    /// Objects produced by this module that are still alive
    pub fn live_objects(&self) -> usize {
        self.live_objects.load(Ordering::Acquire)
    }

    /// Server locks currently held
    pub fn lock_count(&self) -> usize {
        self.locks.load(Ordering::Acquire)
    }

    /// Configured object quota
    pub fn max_live_objects(&self) -> Option<usize> {
        self.max_live_objects
    }

    /// Whether nothing keeps the module resident
    pub fn can_unload(&self) -> bool {
        self.live_objects() == 0 && self.lock_count() == 0
    }
}

impl Default for ModuleState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleState")
            .field("live_objects", &self.live_objects())
            .field("locks", &self.lock_count())
            .field("max_live_objects", &self.max_live_objects)
            .finish()
    }
}

/// A reserved live-object slot
///
/// Travels with the object it was admitted for and frees the slot on drop.
pub struct ObjectToken {
    module: Arc<ModuleState>,
}

impl Drop for ObjectToken {
    fn drop(&mut self) {
        self.module.live_objects.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for ObjectToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectToken").finish_non_exhaustive()
    }
}

//! Single-slot "dirty" notification.
//!
//! Terminal resizes can arrive at any time, but the interaction loop only
//! needs to know that at least one happened since its last poll. A
//! [`Dirty`] flag is set by any number of [`notify`](Dirty::notify) calls
//! and cleared by the next [`take`](Dirty::take). Notifications never queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to a shared dirty flag.
#[derive(Debug, Clone, Default)]
pub struct Dirty {
    flag: Arc<AtomicBool>,
}

impl Dirty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the flag. Repeated calls before a `take` collapse into one.
    pub fn notify(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Return whether the flag was set, clearing it.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    /// Whether the flag is set, without clearing it.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

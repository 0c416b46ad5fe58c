//! Per-name async locks
//!
//! Serializes mutations of the same artifact name while letting unrelated
//! names proceed in parallel. Entries are dropped once no guard or waiter
//! refers to them, so the map stays proportional to in-flight writes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slot = Arc<Mutex<()>>;

/// Lock table keyed by artifact name
#[derive(Debug, Clone, Default)]
pub struct NameLocks {
    slots: Arc<DashMap<String, Slot>>,
}

impl NameLocks {
    /// Create empty lock table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `name`, waiting behind any current holder
    pub async fn lock(&self, name: &str) -> NameGuard {
        let slot = self
            .slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.clone().lock_owned().await;
        NameGuard {
            name: name.to_string(),
            slot,
            slots: Arc::clone(&self.slots),
            held: Some(guard),
        }
    }

    /// Names currently tracked
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no name is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Held lock on one name; released on drop
#[derive(Debug)]
pub struct NameGuard {
    name: String,
    slot: Slot,
    slots: Arc<DashMap<String, Slot>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for NameGuard {
    fn drop(&mut self) {
        self.held.take();
        // The map and this guard hold the only references: nobody is waiting.
        self.slots
            .remove_if(&self.name, |_, slot| Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(slot) == 2);
    }
}

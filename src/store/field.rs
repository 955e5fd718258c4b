use std::sync::PoisonError;

use crate::sync::{AtomicUsize, Ordering, RwLock};

/// One slot of a [`FieldStore`](super::FieldStore).
///
/// The value is guarded by its own reader-writer lock. The access counters are
/// bumped while that lock is held, so a field's counters move in step with its
/// value, but they are atomics so that the store can read them without
/// locking.
pub(super) struct Field {
    value: RwLock<i64>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Field {
    pub(super) fn new() -> Self {
        Self {
            value: RwLock::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Returns the value under a shared lock, counting the access.
    pub(super) fn read(&self, total_ops: &AtomicUsize) -> i64 {
        // The guarded value is a plain integer, so a poisoned lock still
        // holds a usable value.
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        self.reads.fetch_add(1, Ordering::Relaxed);
        total_ops.fetch_add(1, Ordering::Relaxed);
        *value
    }

    /// Stores a value under an exclusive lock, counting the access.
    pub(super) fn write(&self, value: i64, total_ops: &AtomicUsize) {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        self.writes.fetch_add(1, Ordering::Relaxed);
        total_ops.fetch_add(1, Ordering::Relaxed);
        *guard = value;
    }

    /// Returns the value under a shared lock without counting the access.
    pub(super) fn peek(&self) -> i64 {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub(super) fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(super) fn lock_shared(&self) -> crate::sync::RwLockReadGuard<'_, i64> {
        self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(super) fn lock_exclusive(&self) -> crate::sync::RwLockWriteGuard<'_, i64> {
        self.value.write().unwrap_or_else(PoisonError::into_inner)
    }
}

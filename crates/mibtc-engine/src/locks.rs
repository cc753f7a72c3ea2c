//! Per-object write locks
//!
//! A scalar is locked by its instance path, a column by its row. Locks for
//! one request are taken in key order so overlapping requests cannot
//! deadlock. An entry lives only while some request holds or awaits it.

use mibtc_core::Oid;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::instances::RowKey;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    Scalar(Oid),
    Row(RowKey),
}

#[derive(Debug, Default)]
pub struct PathLocks {
    table: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handles for `keys`, in key order
    pub fn handles(&self, keys: &BTreeSet<LockKey>) -> Vec<Arc<Mutex<()>>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        keys.iter()
            .map(|key| Arc::clone(table.entry(key.clone()).or_default()))
            .collect()
    }

    /// Forget the entries for `keys` that no request still holds
    ///
    /// Callers drop their own handles first. Handles are only cloned under
    /// the table lock, so a count of one here means nobody can reach the
    /// mutex any more.
    pub fn release(&self, keys: &BTreeSet<LockKey>) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            if table.get(key).is_some_and(|m| Arc::strong_count(m) == 1) {
                table.remove(key);
            }
        }
    }

    /// Number of objects currently locked or awaited
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acquire every handle, in order
pub fn acquire(handles: &[Arc<Mutex<()>>]) -> Vec<MutexGuard<'_, ()>> {
    handles
        .iter()
        .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
        .collect()
}

// Keyswap Remap Table Store
// Atomic publication of committed tables to the hook thread

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::RemapTables;

/// Holder of the active remap tables.
///
/// Written only by the commit path, read on every hook event. A commit
/// replaces the whole table by swapping one `Arc` under a write lock, so a
/// reader sees either the old table or the new one, never a mix. Readers hold
/// the lock only for the pointer copy.
#[derive(Debug, Default)]
pub struct RemapTableStore {
    active: RwLock<Arc<RemapTables>>,
    generation: AtomicU64,
}

impl RemapTableStore {
    /// Create a store with empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store publishing `tables` (pre-processed) immediately
    pub fn with_tables(tables: RemapTables) -> Self {
        let store = Self::new();
        store.swap(tables);
        store
    }

    /// Pre-process and publish a new table, returning the previous one
    pub fn swap(&self, mut tables: RemapTables) -> Arc<RemapTables> {
        tables.pre_process();
        let count = tables.len();
        let next = Arc::new(tables);
        let previous = std::mem::replace(&mut *self.active.write(), next);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!(
            "published remap tables generation {} ({} remaps)",
            generation,
            count
        );
        previous
    }

    /// Current table. Cheap: one reference-count increment.
    pub fn snapshot(&self) -> Arc<RemapTables> {
        Arc::clone(&self.active.read())
    }

    /// Number of publishes so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use jr_core::ports::{CacheError, EntryCachePort};
use jr_core::{JournalEntry, UserId};

/// Process-local entry cache. Snapshots are lost on exit.
#[derive(Default)]
pub struct InMemoryEntryCache {
    snapshots: Mutex<HashMap<UserId, Vec<JournalEntry>>>,
}

impl InMemoryEntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshots(&self) -> MutexGuard<'_, HashMap<UserId, Vec<JournalEntry>>> {
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryCachePort for InMemoryEntryCache {
    fn load(&self, owner: &UserId) -> Option<Vec<JournalEntry>> {
        self.snapshots().get(owner).cloned()
    }

    fn save(&self, owner: &UserId, entries: &[JournalEntry]) -> Result<(), CacheError> {
        self.snapshots().insert(owner.clone(), entries.to_vec());
        Ok(())
    }

    fn clear(&self, owner: &UserId) -> Result<(), CacheError> {
        self.snapshots().remove(owner);
        Ok(())
    }
}

//! Loads further pages when the last rendered entry scrolls into view.
//!
//! The rendering layer reports the entry it uses as the sentinel (the tail of
//! the list) through [`ScrollLoader::bind`] and calls
//! [`ScrollLoader::on_sentinel_visible`] when it becomes visible. Each sentinel
//! fires at most once; the loader re-arms after a load completes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info_span, Instrument};

use jr_core::{EntryId, SyncError};

use super::entry_sync::{EntrySyncEngine, PageOutcome};

#[derive(Debug, Default)]
struct SentinelBinding {
    entry_id: Option<EntryId>,
    armed: bool,
}

pub struct ScrollLoader {
    engine: EntrySyncEngine,
    binding: Mutex<SentinelBinding>,
}

impl ScrollLoader {
    /// Create a loader bound to the engine's current tail entry.
    pub fn new(engine: EntrySyncEngine) -> Self {
        let entry_id = engine.tail_entry_id();
        Self {
            engine,
            binding: Mutex::new(SentinelBinding {
                armed: entry_id.is_some(),
                entry_id,
            }),
        }
    }

    /// Observe `entry_id` as the sentinel. Binding a different entry re-arms
    /// the loader; re-binding the same entry keeps its state.
    pub fn bind(&self, entry_id: Option<EntryId>) {
        let mut binding = self.lock_binding();
        if binding.entry_id != entry_id {
            debug!(sentinel = ?entry_id, "Sentinel re-bound");
            binding.armed = entry_id.is_some();
            binding.entry_id = entry_id;
        }
    }

    /// Bind to whatever entry is currently last in the engine's list.
    pub fn rebind_to_tail(&self) {
        self.bind(self.engine.tail_entry_id());
    }

    pub fn bound_sentinel(&self) -> Option<EntryId> {
        self.lock_binding().entry_id.clone()
    }

    pub fn is_armed(&self) -> bool {
        self.lock_binding().armed
    }

    /// The sentinel `entry_id` became visible.
    ///
    /// Requests the next page only if `entry_id` is the bound sentinel, the
    /// loader is armed, and the engine is `Idle`. Otherwise returns
    /// [`PageOutcome::Ignored`] without contacting the engine.
    pub async fn on_sentinel_visible(&self, entry_id: &EntryId) -> Result<PageOutcome, SyncError> {
        {
            let mut binding = self.lock_binding();
            if binding.entry_id.as_ref() != Some(entry_id) {
                debug!(entry_id = %entry_id, "Visibility of a stale sentinel ignored");
                return Ok(PageOutcome::Ignored);
            }
            if !binding.armed {
                debug!(entry_id = %entry_id, "Sentinel already fired");
                return Ok(PageOutcome::Ignored);
            }
            let state = self.engine.sync_state();
            if state.is_loading() || state.is_exhausted() {
                debug!(state = ?state, "Sentinel visible while engine is not idle");
                return Ok(PageOutcome::Ignored);
            }
            binding.armed = false;
        }

        let span = info_span!("usecase.scroll_loader.load_next_page", sentinel = %entry_id);
        let result = self.engine.load_next_page().instrument(span).await;

        match &result {
            Ok(PageOutcome::Applied { .. }) => {
                let tail = self.engine.tail_entry_id();
                let mut binding = self.lock_binding();
                binding.armed = tail.is_some();
                binding.entry_id = tail;
            }
            _ => self.rearm(entry_id),
        }

        result
    }

    fn rearm(&self, entry_id: &EntryId) {
        let mut binding = self.lock_binding();
        if binding.entry_id.as_ref() == Some(entry_id) {
            binding.armed = true;
        }
    }

    fn lock_binding(&self) -> MutexGuard<'_, SentinelBinding> {
        self.binding.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

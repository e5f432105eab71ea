//! Per-identity synchronization session.
//!
//! A session is created when an identity becomes active and dropped on
//! sign-out or identity switch. Every remote request carries the generation of
//! the session that issued it, so results that arrive after the session was
//! replaced can be recognized and discarded.

use super::{EntryListView, EntryPage, PageCursor, PageKind, PageRequest, SyncState};
use crate::auth::UserIdentity;
use crate::entry::{ConfirmOutcome, EntryDraft, EntryList, JournalEntry};
use crate::ids::{EntryId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionGeneration(u64);

impl SessionGeneration {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Summary of a page applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageApplied {
    pub kind: PageKind,
    pub fetched: usize,
    pub total: usize,
    pub state: SyncState,
}

#[derive(Debug, Clone)]
pub struct SyncSession {
    identity: UserIdentity,
    generation: SessionGeneration,
    entries: EntryList,
    cursor: Option<PageCursor>,
    state: SyncState,
}

impl SyncSession {
    /// Start a session from the cached snapshot of `identity` (possibly empty).
    ///
    /// Pending entries in the snapshot lost their in-flight write with the
    /// previous process and are restored as failed.
    pub fn new(identity: UserIdentity, generation: SessionGeneration, hydrated: EntryList) -> Self {
        let mut entries = hydrated;
        entries.fail_orphaned_pending();
        Self {
            identity,
            generation,
            entries,
            cursor: None,
            state: SyncState::Idle,
        }
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn owner(&self) -> &UserId {
        &self.identity.uid
    }

    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    pub fn is_current(&self, generation: SessionGeneration) -> bool {
        self.generation == generation
    }

    pub fn entries(&self) -> &EntryList {
        &self.entries
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn view(&self) -> EntryListView {
        EntryListView {
            owner: Some(self.owner().clone()),
            entries: self.entries.as_slice().to_vec(),
            state: self.state,
        }
    }

    /// Begin a first-page read. `None` while another read is in flight.
    pub fn begin_first_page(&mut self) -> Option<PageRequest> {
        self.state = self.state.start_first_page()?;
        Some(self.request(PageKind::First, None))
    }

    /// Begin a next-page read. `None` unless `Idle`.
    ///
    /// Without a cursor (the first page never succeeded) the read falls back
    /// to a first-page load so scrolling can recover a failed initial load.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        let next = self.state.start_next_page()?;
        match self.cursor.clone() {
            Some(cursor) => {
                self.state = next;
                Some(self.request(PageKind::Next, Some(cursor)))
            }
            None => self.begin_first_page(),
        }
    }

    /// Apply a fetched page.
    ///
    /// A first page replaces the list. Unconfirmed entries (pending or failed
    /// writes) absent from the page are kept, so a reload never drops a write
    /// the user has not seen succeed. They keep their `created_at` position
    /// among the fetched entries, and a next page is merged the same way,
    /// deduplicated by id.
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        page: EntryPage,
        page_size: usize,
    ) -> PageApplied {
        let fetched = page.len();
        let has_more = fetched >= page_size && page.next_cursor.is_some();

        if request.kind == PageKind::First {
            let unconfirmed: Vec<JournalEntry> = self
                .entries
                .iter()
                .filter(|entry| entry.is_pending() || entry.is_failed())
                .filter(|entry| !page.entries.iter().any(|e| e.id == entry.id))
                .cloned()
                .collect();
            self.entries.replace_with(unconfirmed);
        }
        self.entries.merge_by_time(page.entries);

        self.cursor = if has_more { page.next_cursor } else { None };
        self.state = self.state.on_page_loaded(has_more);

        PageApplied {
            kind: request.kind,
            fetched,
            total: self.entries.len(),
            state: self.state,
        }
    }

    /// A page read failed: back to `Idle`, list untouched.
    pub fn fail_page(&mut self) {
        self.state = self.state.on_page_failed();
    }

    pub fn push_provisional(&mut self, entry: JournalEntry) {
        self.entries.push_front(entry);
    }

    pub fn confirm_entry(&mut self, provisional: &EntryId, remote: EntryId) -> ConfirmOutcome {
        self.entries.confirm(provisional, remote)
    }

    pub fn fail_entry(&mut self, id: &EntryId) -> bool {
        self.entries.mark_failed(id)
    }

    /// Move a failed entry back to pending and build the write to re-issue.
    pub fn begin_retry(&mut self, id: &EntryId) -> Option<EntryDraft> {
        self.entries.mark_retrying(id).map(EntryDraft::for_entry)
    }

    fn request(&self, kind: PageKind, cursor: Option<PageCursor>) -> PageRequest {
        PageRequest {
            generation: self.generation,
            owner: self.owner().clone(),
            kind,
            cursor,
        }
    }
}

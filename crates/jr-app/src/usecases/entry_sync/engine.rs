use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};

use jr_core::entry::ConfirmOutcome;
use jr_core::ports::{ClockPort, EntryCachePort, RemoteEntriesPort, RemoteError};
use jr_core::{
    EntryDraft, EntryId, EntryList, EntryListView, EntryPage, EntryText, JournalEntry, PageKind,
    PageRequest, SessionGeneration, SyncError, SyncSession, SyncState, UserId, UserIdentity,
    PAGE_SIZE,
};

/// What a page call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was fetched and applied.
    Applied {
        kind: PageKind,
        fetched: usize,
        total: usize,
        state: SyncState,
    },
    /// Nothing was requested (no identity, read in flight, or exhausted).
    Ignored,
    /// The result arrived for a session that no longer exists.
    Discarded,
}

impl PageOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PageOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Inserted at the head and persisted; the remote write runs in the background.
    Accepted(EntryId),
    /// Empty or whitespace-only text. No side effects.
    Rejected,
    /// No identity is set.
    NoIdentity,
}

/// Owns the canonical in-memory entry list and reconciles it with the local
/// cache and the paginated remote store.
///
/// All state lives in a [`SyncSession`] created per identity. The session lock
/// is never held across an `.await`; cache writes happen under the lock so
/// they are serialized in call order.
#[derive(Clone)]
pub struct EntrySyncEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    remote: Arc<dyn RemoteEntriesPort>,
    cache: Arc<dyn EntryCachePort>,
    clock: Arc<dyn ClockPort>,
    page_size: usize,
    session: Mutex<Option<SyncSession>>,
    generations: AtomicU64,
    view_tx: watch::Sender<EntryListView>,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
}

impl EntrySyncEngine {
    pub fn new(
        remote: Arc<dyn RemoteEntriesPort>,
        cache: Arc<dyn EntryCachePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self::with_page_size(remote, cache, clock, PAGE_SIZE)
    }

    pub fn with_page_size(
        remote: Arc<dyn RemoteEntriesPort>,
        cache: Arc<dyn EntryCachePort>,
        clock: Arc<dyn ClockPort>,
        page_size: usize,
    ) -> Self {
        let (view_tx, _) = watch::channel(EntryListView::signed_out());
        Self {
            inner: Arc::new(EngineInner {
                remote,
                cache,
                clock,
                page_size: page_size.max(1),
                session: Mutex::new(None),
                generations: AtomicU64::new(0),
                view_tx,
                pending_writes: Mutex::new(Vec::new()),
            }),
        }
    }

    /// React to an authentication transition.
    ///
    /// - `None`: the session is discarded and the identity's cache entry is
    ///   cleared. No remote call is made.
    /// - a different identity: a new session is hydrated from that identity's
    ///   cache, then the first page is loaded.
    /// - the same identity again: no-op.
    pub async fn on_identity_change(
        &self,
        identity: Option<UserIdentity>,
    ) -> Result<PageOutcome, SyncError> {
        let span = info_span!(
            "usecase.entry_sync.on_identity_change",
            uid = identity.as_ref().map(|i| i.uid.as_str()).unwrap_or("<none>"),
        );

        let started = span.in_scope(|| self.inner.switch_session(identity));
        if !started {
            return Ok(PageOutcome::Ignored);
        }

        self.load_first_page().instrument(span).await
    }

    /// Apply an identity transition without loading the first page.
    ///
    /// Returns true when a new session was started; the caller is then
    /// expected to call [`load_first_page`](Self::load_first_page).
    pub fn set_identity(&self, identity: Option<UserIdentity>) -> bool {
        let span = info_span!(
            "usecase.entry_sync.set_identity",
            uid = identity.as_ref().map(|i| i.uid.as_str()).unwrap_or("<none>"),
        );
        span.in_scope(|| self.inner.switch_session(identity))
    }

    /// Replace the list with the newest page from the remote store.
    ///
    /// Ignored when no identity is set or another read is in flight. On
    /// failure the list keeps its (possibly cache-hydrated) content.
    pub async fn load_first_page(&self) -> Result<PageOutcome, SyncError> {
        let request = {
            let mut session = self.inner.lock_session();
            let Some(current) = session.as_mut() else {
                debug!("load_first_page ignored: no identity");
                return Ok(PageOutcome::Ignored);
            };
            let Some(request) = current.begin_first_page() else {
                debug!(state = ?current.state(), "load_first_page ignored: read in flight");
                return Ok(PageOutcome::Ignored);
            };
            self.inner.publish(session.as_ref());
            request
        };

        self.inner.run_page_request(request).await
    }

    /// Append the page after the current cursor.
    ///
    /// No-op unless the session is `Idle`.
    pub async fn load_next_page(&self) -> Result<PageOutcome, SyncError> {
        let request = {
            let mut session = self.inner.lock_session();
            let Some(current) = session.as_mut() else {
                debug!("load_next_page ignored: no identity");
                return Ok(PageOutcome::Ignored);
            };
            let Some(request) = current.begin_next_page() else {
                debug!(state = ?current.state(), "load_next_page ignored");
                return Ok(PageOutcome::Ignored);
            };
            self.inner.publish(session.as_ref());
            request
        };

        self.inner.run_page_request(request).await
    }

    /// Optimistically add an entry.
    ///
    /// The entry is inserted at the head and persisted to the cache before
    /// this returns; the remote write is spawned and never awaited here. Its
    /// result only updates the entry status (`Confirmed` or `Failed`).
    pub fn append_entry(&self, raw_text: &str) -> AppendOutcome {
        let text = match EntryText::parse(raw_text) {
            Ok(text) => text,
            Err(err) => {
                debug!(error = %err, "Append rejected");
                return AppendOutcome::Rejected;
            }
        };

        let (owner, generation, draft) = {
            let mut session = self.inner.lock_session();
            let Some(current) = session.as_mut() else {
                debug!("Append ignored: no identity");
                return AppendOutcome::NoIdentity;
            };

            let entry = JournalEntry::provisional(text, self.inner.clock.now());
            let draft = EntryDraft::for_entry(&entry);
            current.push_provisional(entry);
            self.inner.persist(current);

            let owner = current.owner().clone();
            let generation = current.generation();
            self.inner.publish(session.as_ref());
            (owner, generation, draft)
        };

        let id = draft.correlation_id.clone();
        info!(uid = %owner, entry_id = %id, "Entry appended optimistically");
        self.inner.spawn_remote_write(generation, owner, draft);
        AppendOutcome::Accepted(id)
    }

    /// Re-issue the remote write of a failed entry. Returns false if the entry
    /// is unknown or not in the failed state.
    pub fn retry_entry(&self, id: &EntryId) -> bool {
        let (owner, generation, draft) = {
            let mut session = self.inner.lock_session();
            let Some(current) = session.as_mut() else {
                return false;
            };
            let Some(draft) = current.begin_retry(id) else {
                debug!(entry_id = %id, "Retry ignored: entry is not failed");
                return false;
            };
            self.inner.persist(current);

            let owner = current.owner().clone();
            let generation = current.generation();
            self.inner.publish(session.as_ref());
            (owner, generation, draft)
        };

        info!(uid = %owner, entry_id = %id, "Retrying remote write");
        self.inner.spawn_remote_write(generation, owner, draft);
        true
    }

    /// Wait for every remote write spawned so far.
    pub async fn drain_pending_writes(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self
                .inner
                .pending_writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pending)
        };

        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "Remote write task did not complete");
            }
        }
    }

    pub fn view(&self) -> EntryListView {
        self.inner
            .lock_session()
            .as_ref()
            .map(SyncSession::view)
            .unwrap_or_default()
    }

    /// Receive a fresh [`EntryListView`] after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<EntryListView> {
        self.inner.view_tx.subscribe()
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.inner
            .lock_session()
            .as_ref()
            .map(|s| s.entries().as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn sync_state(&self) -> SyncState {
        self.inner
            .lock_session()
            .as_ref()
            .map(SyncSession::state)
            .unwrap_or_default()
    }

    pub fn current_identity(&self) -> Option<UserIdentity> {
        self.inner
            .lock_session()
            .as_ref()
            .map(|s| s.identity().clone())
    }

    /// Id of the last entry in the list, the scroll sentinel.
    pub fn tail_entry_id(&self) -> Option<EntryId> {
        self.inner
            .lock_session()
            .as_ref()
            .and_then(|s| s.entries().tail().map(|e| e.id.clone()))
    }
}

impl EngineInner {
    fn lock_session(&self) -> MutexGuard<'_, Option<SyncSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an identity transition to the session slot. Returns true when a
    /// new session was started and needs its first page.
    fn switch_session(&self, identity: Option<UserIdentity>) -> bool {
        let mut session = self.lock_session();
        let active = session.as_ref().map(|s| s.identity().clone());
        match (active, identity) {
            (None, None) => {
                debug!("Identity cleared while no session is active");
                false
            }
            (Some(current), None) => {
                let owner = current.uid;
                *session = None;
                if let Err(err) = self.cache.clear(&owner) {
                    warn!(uid = %owner, error = %err, "Failed to clear entry cache on sign-out");
                }
                self.publish(None);
                info!(uid = %owner, "Session discarded on sign-out");
                false
            }
            (Some(current), Some(next)) if current.same_principal(&next) => {
                debug!("Identity re-affirmed, nothing to do");
                false
            }
            (_, Some(next)) => {
                let hydrated = self
                    .cache
                    .load(&next.uid)
                    .map(EntryList::from_entries)
                    .unwrap_or_default();
                let generation = self.next_generation();
                info!(
                    generation = generation.value(),
                    cached_entries = hydrated.len(),
                    "Starting session from cached snapshot"
                );
                let started = SyncSession::new(next, generation, hydrated);
                self.publish(Some(&started));
                *session = Some(started);
                true
            }
        }
    }

    fn next_generation(&self) -> SessionGeneration {
        SessionGeneration::new(self.generations.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn publish(&self, session: Option<&SyncSession>) {
        let view = session.map(SyncSession::view).unwrap_or_default();
        self.view_tx.send_replace(view);
    }

    /// Persist the session's list. Failures are logged, not surfaced.
    fn persist(&self, session: &SyncSession) {
        if let Err(err) = self
            .cache
            .save(session.owner(), session.entries().as_slice())
        {
            warn!(uid = %session.owner(), error = %err, "Failed to persist entry cache");
        }
    }

    async fn run_page_request(&self, request: PageRequest) -> Result<PageOutcome, SyncError> {
        let span = info_span!(
            "usecase.entry_sync.fetch_page",
            uid = %request.owner,
            generation = request.generation.value(),
            kind = ?request.kind,
        );

        let result = self
            .remote
            .fetch_page(&request.owner, request.cursor.as_ref(), self.page_size)
            .instrument(span.clone())
            .await;

        let _enter = span.enter();
        self.finish_page_request(&request, result)
    }

    fn finish_page_request(
        &self,
        request: &PageRequest,
        result: Result<EntryPage, RemoteError>,
    ) -> Result<PageOutcome, SyncError> {
        let mut session = self.lock_session();
        let current = match session.as_mut() {
            Some(current) if current.is_current(request.generation) => current,
            _ => {
                warn!(
                    ok = result.is_ok(),
                    "Discarding page result for a session that no longer exists"
                );
                return Ok(PageOutcome::Discarded);
            }
        };

        match result {
            Ok(page) => {
                let applied = current.apply_page(request, page, self.page_size);
                self.persist(current);
                self.publish(session.as_ref());
                info!(
                    fetched = applied.fetched,
                    total = applied.total,
                    state = ?applied.state,
                    "Page applied"
                );
                Ok(PageOutcome::Applied {
                    kind: applied.kind,
                    fetched: applied.fetched,
                    total: applied.total,
                    state: applied.state,
                })
            }
            Err(err) => {
                current.fail_page();
                self.publish(session.as_ref());
                warn!(error = %err, "Page request failed, keeping current list");
                Err(err.into())
            }
        }
    }

    fn spawn_remote_write(
        self: &Arc<Self>,
        generation: SessionGeneration,
        owner: UserId,
        draft: EntryDraft,
    ) {
        let span = info_span!(
            "usecase.entry_sync.create_entry",
            uid = %owner,
            entry_id = %draft.correlation_id,
        );

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                let _enter = span.enter();
                error!("No async runtime for the remote write");
                self.finish_remote_write(
                    generation,
                    &draft.correlation_id,
                    Err(RemoteError::Transient("no async runtime".into())),
                );
                return;
            }
        };

        let inner = Arc::clone(self);
        let handle = runtime.spawn(
            async move {
                let result = inner.remote.create_entry(&owner, &draft).await;
                inner.finish_remote_write(generation, &draft.correlation_id, result);
            }
            .instrument(span),
        );

        let mut pending = self
            .pending_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    fn finish_remote_write(
        &self,
        generation: SessionGeneration,
        provisional: &EntryId,
        result: Result<EntryId, RemoteError>,
    ) {
        let mut session = self.lock_session();
        let current = match session.as_mut() {
            Some(current) if current.is_current(generation) => current,
            _ => {
                debug!("Remote write finished after its session ended");
                return;
            }
        };

        match result {
            Ok(remote_id) => {
                let outcome = current.confirm_entry(provisional, remote_id.clone());
                debug!(remote_id = %remote_id, outcome = ?outcome, "Remote write confirmed");
                if outcome == ConfirmOutcome::Missing {
                    return;
                }
            }
            Err(err) => {
                if matches!(err, RemoteError::PermissionDenied(_)) {
                    error!(error = %err, "Remote write denied for this identity");
                } else {
                    warn!(error = %err, "Remote write failed");
                }
                if !current.fail_entry(provisional) {
                    return;
                }
            }
        }

        self.persist(current);
        self.publish(session.as_ref());
    }
}

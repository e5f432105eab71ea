//! Shared fakes for engine integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use tokio::sync::{watch, Semaphore};
use tracing_subscriber::EnvFilter;

use jr_core::ports::{AuthError, AuthSessionPort, ClockPort, RemoteEntriesPort, RemoteError};
use jr_core::{
    AuthState, EntryDraft, EntryId, EntryPage, JournalEntry, PageCursor, UserId, UserIdentity,
};

static TRACING: Once = Once::new();

pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();
    });
}

pub fn uid(raw: &str) -> UserId {
    UserId::from(raw)
}

pub fn identity(raw: &str) -> UserIdentity {
    UserIdentity::new(raw)
}

/// `count` confirmed entries for `owner`, newest first, ids `<owner>-00`...
pub fn remote_entries(owner: &str, count: usize) -> Vec<JournalEntry> {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            JournalEntry::confirmed(
                EntryId::from(format!("{owner}-{i:02}")),
                format!("{owner} entry {i}"),
                base - ChronoDuration::minutes(i as i64),
            )
        })
        .collect()
}

pub fn ids(entries: &[JournalEntry]) -> Vec<String> {
    entries.iter().map(|e| e.id.as_str().to_string()).collect()
}

/// Poll `condition` until it holds, yielding to spawned tasks in between.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Clock that ticks one second per reading, starting after every seeded entry.
pub struct TickingClock {
    next: AtomicI64,
}

impl TickingClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        Self {
            next: AtomicI64::new(start.timestamp()),
        }
    }
}

impl ClockPort for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0).unwrap()
    }
}

/// In-memory remote store.
///
/// Cursors are the id of the last entry of a page. Reads for an owner can be
/// held with [`FakeRemote::hold_fetches`] and let through one at a time with
/// [`FakeRemote::release_fetch`].
#[derive(Default)]
pub struct FakeRemote {
    entries: Mutex<HashMap<UserId, Vec<JournalEntry>>>,
    fetch_gates: Mutex<HashMap<UserId, Arc<Semaphore>>>,
    create_gate: Mutex<Option<Arc<Semaphore>>>,
    fetch_error: Mutex<Option<RemoteError>>,
    create_error: Mutex<Option<RemoteError>>,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    created: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, owner: &str, count: usize) {
        self.entries
            .lock()
            .unwrap()
            .insert(uid(owner), remote_entries(owner, count));
    }

    pub fn stored(&self, owner: &str) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap()
            .get(&uid(owner))
            .cloned()
            .unwrap_or_default()
    }

    pub fn hold_fetches(&self, owner: &str) {
        self.fetch_gates
            .lock()
            .unwrap()
            .insert(uid(owner), Arc::new(Semaphore::new(0)));
    }

    pub fn release_fetch(&self, owner: &str) {
        if let Some(gate) = self.fetch_gates.lock().unwrap().get(&uid(owner)) {
            gate.add_permits(1);
        }
    }

    pub fn hold_creates(&self) {
        *self.create_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_creates(&self, count: usize) {
        if let Some(gate) = self.create_gate.lock().unwrap().as_ref() {
            gate.add_permits(count);
        }
    }

    pub fn fail_fetches_with(&self, err: Option<RemoteError>) {
        *self.fetch_error.lock().unwrap() = err;
    }

    pub fn fail_creates_with(&self, err: Option<RemoteError>) {
        *self.create_error.lock().unwrap() = err;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    async fn pass_gate(gate: Option<Arc<Semaphore>>) {
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl RemoteEntriesPort for FakeRemote {
    async fn fetch_page(
        &self,
        owner: &UserId,
        cursor: Option<&PageCursor>,
        page_size: usize,
    ) -> Result<EntryPage, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.fetch_gates.lock().unwrap().get(owner).cloned();
        Self::pass_gate(gate).await;

        if let Some(err) = self.fetch_error.lock().unwrap().clone() {
            return Err(err);
        }

        let all = self
            .entries
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default();
        let start = match cursor {
            Some(cursor) => all
                .iter()
                .position(|e| e.id.as_str() == cursor.as_str())
                .map(|i| i + 1)
                .unwrap_or(all.len()),
            None => 0,
        };
        let entries: Vec<JournalEntry> = all.into_iter().skip(start).take(page_size).collect();
        let next_cursor = entries.last().map(|e| PageCursor::new(e.id.as_str()));
        Ok(EntryPage::new(entries, next_cursor))
    }

    async fn create_entry(
        &self,
        owner: &UserId,
        draft: &EntryDraft,
    ) -> Result<EntryId, RemoteError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.create_gate.lock().unwrap().clone();
        Self::pass_gate(gate).await;

        if let Some(err) = self.create_error.lock().unwrap().clone() {
            return Err(err);
        }

        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let id = EntryId::from(format!("remote-{n}"));
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
            + ChronoDuration::seconds(n as i64);
        self.entries
            .lock()
            .unwrap()
            .entry(owner.clone())
            .or_default()
            .insert(0, JournalEntry::confirmed(id.clone(), draft.text.clone(), created_at));
        Ok(id)
    }
}

/// Auth session driven by the test through a watch channel.
pub struct FakeAuth {
    tx: watch::Sender<AuthState>,
    sign_outs: AtomicUsize,
}

impl FakeAuth {
    pub fn new(initial: AuthState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, state: AuthState) {
        self.tx.send_replace(state);
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthSessionPort for FakeAuth {
    fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

//! Entry synchronization engine.
//!
//! [AuthSession] ──identity──→ EntrySyncEngine ──→ [EntryCache] (hydrate / persist)
//!                                   │
//!                                   ├──→ [RemoteEntries] fetch_page (one read in flight)
//!                                   └──→ [RemoteEntries] create_entry (background, per append)

mod engine;

pub use engine::{AppendOutcome, EntrySyncEngine, PageOutcome};

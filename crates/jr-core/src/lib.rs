//! # jr-core
//!
//! Core domain models and ports for the journal entry synchronization engine.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Reconciliation rules (optimistic append, pagination, per-identity sessions)
//! live here as plain data transitions; everything that suspends or touches
//! storage goes through a port.

// Public module exports
pub mod auth;
pub mod config;
pub mod entry;
pub mod ids;
pub mod ports;
pub mod sync;

// Re-export commonly used types at the crate root
pub use auth::{AuthState, UserIdentity};
pub use config::AppConfig;
pub use entry::{EntryDraft, EntryError, EntryList, EntryStatus, EntryText, JournalEntry};
pub use ids::{EntryId, UserId};
pub use sync::{
    EntryListView, EntryPage, PageCursor, PageKind, PageRequest, SessionGeneration, SyncError,
    SyncSession, SyncState, PAGE_SIZE,
};

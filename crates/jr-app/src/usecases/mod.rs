//! Business logic use cases
//!
//! [AuthSessionPort]
//!        ↓
//! IdentityObserver      → starts / discards per-identity sessions
//!        ↓
//! EntrySyncEngine       → hydrate, paginate, optimistic append
//!        ↑
//! ScrollLoader          → next page when the tail sentinel becomes visible

pub mod entry_sync;
pub mod identity_observer;
pub mod scroll_loader;

pub use entry_sync::{AppendOutcome, EntrySyncEngine, PageOutcome};
pub use identity_observer::IdentityObserver;
pub use scroll_loader::ScrollLoader;

//! Port interfaces for the application layer
//!
//! Ports define the contract between the synchronization engine and the
//! infrastructure implementations (remote store, local cache, auth provider).
//! This follows Hexagonal Architecture principles, allowing the core logic to
//! remain independent of external dependencies.

pub mod auth_session;
mod clock;
pub mod entry_cache;
pub mod identity_cache;
pub mod remote_entries;

pub use auth_session::{AuthError, AuthSessionPort};
pub use clock::ClockPort;
pub use entry_cache::{CacheError, EntryCachePort};
pub use identity_cache::IdentityCachePort;
pub use remote_entries::{RemoteEntriesPort, RemoteError};

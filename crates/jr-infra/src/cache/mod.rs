//! Local cache adapters.
//!
//! - [`FileEntryCache`]: one JSON snapshot per identity, written atomically
//! - [`InMemoryEntryCache`]: process-local, for tests and ephemeral runs
//! - [`FileIdentityCache`]: the last signed-in identity

mod file_entry_cache;
mod identity_file;
mod memory;

pub use file_entry_cache::FileEntryCache;
pub use identity_file::FileIdentityCache;
pub use memory::InMemoryEntryCache;

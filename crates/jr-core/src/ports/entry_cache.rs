use thiserror::Error;

use crate::entry::JournalEntry;
use crate::ids::UserId;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(String),
}

/// Durable per-identity snapshot of the entry list.
///
/// Calls are synchronous: a save has completed when it returns, so the cache
/// reflects the latest optimistic state even if the process exits right after.
pub trait EntryCachePort: Send + Sync {
    /// Snapshot for `owner`. Missing or malformed data yields `None`, never an error.
    fn load(&self, owner: &UserId) -> Option<Vec<JournalEntry>>;

    fn save(&self, owner: &UserId, entries: &[JournalEntry]) -> Result<(), CacheError>;

    fn clear(&self, owner: &UserId) -> Result<(), CacheError>;
}

use async_trait::async_trait;
use thiserror::Error;

use crate::entry::EntryDraft;
use crate::ids::{EntryId, UserId};
use crate::sync::{EntryPage, PageCursor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Network failure, timeout, throttling or server error.
    #[error("transient remote error: {0}")]
    Transient(String),

    /// The store refused the identity.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl RemoteError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Transient(_))
    }
}

/// Paginated remote entry store, scoped to one owner per call.
///
/// Contract: pages are ordered by `created_at` descending and the adapter
/// never reorders them. Retries and timeouts for transient failures are the
/// adapter's own policy.
#[async_trait]
pub trait RemoteEntriesPort: Send + Sync {
    /// Entries where `ownerId == owner`, newest first, starting after `cursor`.
    async fn fetch_page(
        &self,
        owner: &UserId,
        cursor: Option<&PageCursor>,
        page_size: usize,
    ) -> Result<EntryPage, RemoteError>;

    /// Create a document `{text, createdAt: server time, ownerId: owner}`.
    /// Returns the remote id of the created entry.
    async fn create_entry(&self, owner: &UserId, draft: &EntryDraft)
        -> Result<EntryId, RemoteError>;
}

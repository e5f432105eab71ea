use thiserror::Error;

use crate::ports::RemoteError;

/// Errors the engine surfaces to its caller.
///
/// Validation and cache corruption are recovered inside the engine and never
/// show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Network or timeout failure. Recoverable by a user-initiated retry.
    #[error("remote store unavailable: {0}")]
    Transient(String),

    /// The identity is no longer authorized. Ends the session.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl SyncError {
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, SyncError::PermissionDenied(_))
    }
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Transient(msg) => SyncError::Transient(msg),
            RemoteError::PermissionDenied(msg) => SyncError::PermissionDenied(msg),
        }
    }
}

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::auth::AuthState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth provider error: {0}")]
    Provider(String),
}

/// Observable authentication session.
///
/// Every transition is published on the watch channel; observers must treat
/// repeated emissions of the same identity as no-ops.
#[async_trait]
pub trait AuthSessionPort: Send + Sync {
    fn state(&self) -> AuthState;

    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// End the session, e.g. after the remote store denied the identity.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

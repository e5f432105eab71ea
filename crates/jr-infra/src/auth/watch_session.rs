//! Auth session backed by a `tokio::sync::watch` channel.
//!
//! The external identity provider drives the transitions
//! (`begin_sign_in`, `complete_sign_in`, `fail_sign_in`, `sign_out`); the
//! session remembers the last signed-in identity so the next start can report
//! it while sign-in is still pending.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use jr_core::ports::{AuthError, AuthSessionPort, IdentityCachePort};
use jr_core::{AuthState, UserIdentity};

pub struct WatchAuthSession {
    identity_cache: Arc<dyn IdentityCachePort>,
    tx: watch::Sender<AuthState>,
}

impl WatchAuthSession {
    /// Start signed out.
    pub fn new(identity_cache: Arc<dyn IdentityCachePort>) -> Self {
        let (tx, _) = watch::channel(AuthState::SignedOut);
        Self { identity_cache, tx }
    }

    /// Enter `Pending`, carrying the identity remembered from the last run.
    pub fn begin_sign_in(&self) {
        let cached = self.identity_cache.load();
        info!(cached = cached.is_some(), "Sign-in pending");
        self.tx.send_replace(AuthState::Pending { cached });
    }

    /// The provider confirmed `identity`.
    pub fn complete_sign_in(&self, identity: UserIdentity) {
        if let Err(err) = self.identity_cache.save(&identity) {
            warn!(error = %err, "Failed to remember signed-in identity");
        }
        info!(uid = %identity.uid, "Signed in");
        self.tx.send_replace(AuthState::SignedIn(identity));
    }

    /// The provider could not sign anyone in.
    pub fn fail_sign_in(&self) {
        info!("Sign-in failed");
        self.forget();
    }

    fn forget(&self) {
        if let Err(err) = self.identity_cache.clear() {
            warn!(error = %err, "Failed to clear remembered identity");
        }
        self.tx.send_replace(AuthState::SignedOut);
    }
}

#[async_trait]
impl AuthSessionPort for WatchAuthSession {
    fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        info!("Signing out");
        self.forget();
        Ok(())
    }
}

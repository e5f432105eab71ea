//! Bridges the authentication session to the entry synchronization engine.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};

use jr_core::ports::AuthSessionPort;
use jr_core::{AuthState, SyncError};

use super::entry_sync::{EntrySyncEngine, PageOutcome};

/// Forwards every auth transition to [`EntrySyncEngine`] and ends the auth
/// session when the remote store denies the current identity.
#[derive(Clone)]
pub struct IdentityObserver {
    auth: Arc<dyn AuthSessionPort>,
    engine: EntrySyncEngine,
}

impl IdentityObserver {
    pub fn new(auth: Arc<dyn AuthSessionPort>, engine: EntrySyncEngine) -> Self {
        Self { auth, engine }
    }

    /// Apply the auth state as it is right now and wait for the first page.
    pub async fn sync_current(&self) -> Result<PageOutcome, SyncError> {
        let state = self.auth.state();
        self.apply(&state).await
    }

    /// Apply one auth state: switch the engine's session and, if a new session
    /// started, load its first page.
    pub async fn apply(&self, state: &AuthState) -> Result<PageOutcome, SyncError> {
        let identity = state.identity().cloned();
        let result = self.engine.on_identity_change(identity).await;
        self.handle_result(result).await
    }

    /// Follow the auth session until its sender is dropped.
    ///
    /// The session switch is applied inline so transitions stay ordered; the
    /// first-page load runs in its own task so a slow fetch never delays a
    /// later sign-out.
    pub async fn run(self) {
        let mut rx = self.auth.subscribe();
        loop {
            let identity = rx.borrow_and_update().identity().cloned();
            if self.engine.set_identity(identity) {
                let observer = self.clone();
                tokio::spawn(
                    async move {
                        let result = observer.engine.load_first_page().await;
                        if let Err(err) = observer.handle_result(result).await {
                            warn!(error = %err, "First page load failed");
                        }
                    }
                    .in_current_span(),
                );
            }

            if rx.changed().await.is_err() {
                debug!("Auth session closed, identity observer stopping");
                break;
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run().instrument(info_span!("usecase.identity_observer.run")))
    }

    async fn handle_result(
        &self,
        result: Result<PageOutcome, SyncError>,
    ) -> Result<PageOutcome, SyncError> {
        if let Err(err) = &result {
            if err.is_fatal_for_session() {
                info!(error = %err, "Identity rejected by the remote store, signing out");
                if let Err(sign_out_err) = self.auth.sign_out().await {
                    error!(error = %sign_out_err, "Failed to sign out after permission denial");
                }
                self.engine
                    .set_identity(self.auth.state().identity().cloned());
            }
        }
        result
    }
}

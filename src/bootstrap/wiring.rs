//! Dependency wiring: builds the adapters and use cases for one run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, info_span, Instrument};

use jr_app::{AppPaths, EntrySyncEngine, IdentityObserver, PageOutcome, ScrollLoader};
use jr_core::config::{AccountConfig, AppConfig};
use jr_core::ports::{AuthSessionPort, IdentityCachePort};
use jr_core::{SyncError, UserIdentity};
use jr_infra::auth::WatchAuthSession;
use jr_infra::cache::{FileEntryCache, FileIdentityCache};
use jr_infra::fs::app_data_dir;
use jr_infra::remote::{FirestoreConfig, FirestoreEntriesClient};
use jr_infra::SystemClock;

/// `storage.data_dir` from the config, or the platform data directory.
pub fn resolve_data_root(config: &AppConfig) -> anyhow::Result<PathBuf> {
    if config.data_dir.as_os_str().is_empty() {
        app_data_dir()
    } else {
        Ok(config.data_dir.clone())
    }
}

/// Identity reported by the external sign-in provider, if any.
pub fn identity_from_account(account: &AccountConfig) -> Option<UserIdentity> {
    if account.uid.trim().is_empty() {
        return None;
    }
    let mut identity = UserIdentity::new(account.uid.trim());
    identity.display_name = Some(account.display_name.clone()).filter(|s| !s.is_empty());
    identity.email = Some(account.email.clone()).filter(|s| !s.is_empty());
    Some(identity)
}

pub struct AppRuntime {
    pub paths: AppPaths,
    pub auth: Arc<WatchAuthSession>,
    pub engine: EntrySyncEngine,
    pub observer: IdentityObserver,
    identity_cache: Arc<FileIdentityCache>,
    account: AccountConfig,
}

impl AppRuntime {
    pub fn build(config: &AppConfig, data_root: &Path) -> anyhow::Result<Self> {
        let paths = AppPaths::from_data_root(data_root);

        let identity_cache = Arc::new(FileIdentityCache::new(&paths.identity_path));
        let auth = Arc::new(WatchAuthSession::new(identity_cache.clone()));

        let remote = FirestoreEntriesClient::new(FirestoreConfig::from_remote(&config.remote))
            .context("Failed to create remote entry client")?;
        remote.set_id_token(Some(config.account.id_token.clone()));

        let cache = Arc::new(FileEntryCache::new(&paths.entry_cache_dir));
        let engine = EntrySyncEngine::new(Arc::new(remote), cache, Arc::new(SystemClock));
        let observer = IdentityObserver::new(auth.clone(), engine.clone());

        Ok(Self {
            paths,
            auth,
            engine,
            observer,
            identity_cache,
            account: config.account.clone(),
        })
    }

    pub fn scroll_loader(&self) -> ScrollLoader {
        ScrollLoader::new(self.engine.clone())
    }

    /// Identity remembered from the last run. Reads the identity cache only;
    /// the auth session is left as it is.
    pub fn remembered_identity(&self) -> Option<UserIdentity> {
        self.identity_cache.load()
    }

    /// Run the sign-in sequence and load the first page.
    ///
    /// While sign-in is pending the list hydrates from the remembered identity;
    /// the configured account then completes (or fails) the sign-in.
    pub async fn start(&self) -> Result<PageOutcome, SyncError> {
        async {
            self.auth.begin_sign_in();
            let pending = self.observer.sync_current().await;
            if matches!(&pending, Err(err) if err.is_fatal_for_session()) {
                return pending;
            }

            match identity_from_account(&self.account) {
                Some(identity) => self.auth.complete_sign_in(identity),
                None => {
                    info!("No account configured");
                    self.auth.fail_sign_in();
                }
            }

            match self.observer.sync_current().await? {
                PageOutcome::Ignored => pending,
                outcome => Ok(outcome),
            }
        }
        .instrument(info_span!("bootstrap.start"))
        .await
    }

    /// End the session: forget the identity and its cached entries.
    pub async fn sign_out(&self) -> anyhow::Result<Option<UserIdentity>> {
        let remembered = self.remembered_identity();
        self.engine.set_identity(remembered.clone());
        self.auth.sign_out().await?;
        self.engine.set_identity(None);
        Ok(remembered)
    }
}

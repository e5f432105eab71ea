//! Firestore REST client for the journal entry collection.
//!
//! Reads use `documents:runQuery` ordered by `createdAt desc, __name__ desc`;
//! writes use `documents:commit` with a client-chosen document id so that a
//! retried write can never create a second document.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use jr_core::config::RemoteConfig;
use jr_core::ports::{RemoteEntriesPort, RemoteError};
use jr_core::{EntryDraft, EntryId, EntryPage, PageCursor, UserId};

use super::wire::{self, ErrorEnvelope, RunQueryItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// API root including the version, e.g. `https://firestore.googleapis.com/v1`.
    pub base_url: String,
    pub project_id: String,
    pub collection: String,
    pub timeout: Duration,
    /// Extra attempts after the first for transient failures.
    pub retry_attempts: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub retry_backoff: Duration,
}

impl FirestoreConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://firestore.googleapis.com/v1";
    pub const DEFAULT_COLLECTION: &'static str = "entries";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

    /// Resolve the configured values, filling defaults for empty ones.
    pub fn from_remote(remote: &RemoteConfig) -> Self {
        let base_url = if remote.base_url.is_empty() {
            Self::DEFAULT_BASE_URL.to_string()
        } else {
            remote.base_url.trim_end_matches('/').to_string()
        };
        let collection = if remote.collection.is_empty() {
            Self::DEFAULT_COLLECTION.to_string()
        } else {
            remote.collection.clone()
        };
        let timeout = match remote.timeout_secs {
            0 => Self::DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        let retry_backoff = match remote.retry_backoff_ms {
            0 => Self::DEFAULT_RETRY_BACKOFF,
            ms => Duration::from_millis(ms),
        };

        Self {
            base_url,
            project_id: remote.project_id.clone(),
            collection,
            timeout,
            retry_attempts: remote.retry_attempts,
            retry_backoff,
        }
    }
}

struct Failure {
    error: RemoteError,
    retryable: bool,
}

pub struct FirestoreEntriesClient {
    client: Client,
    config: FirestoreConfig,
    id_token: RwLock<Option<String>>,
}

impl FirestoreEntriesClient {
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .context("build firestore http client failed")?;

        Ok(Self {
            client,
            config,
            id_token: RwLock::new(None),
        })
    }

    /// Bearer token sent with every request. `None` sends unauthenticated requests.
    pub fn set_id_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        *self.id_token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn id_token(&self) -> Option<String> {
        self.id_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn database_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.config.project_id
        )
    }

    fn document_name(&self, id: &EntryId) -> String {
        format!("{}/{}/{}", self.database_root(), self.config.collection, id)
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}:{}", self.config.base_url, self.database_root(), method)
    }

    /// POST `body` to `url`, retrying transient failures with exponential
    /// backoff. Statuses in `accepted` are returned as-is.
    async fn send_with_retry(
        &self,
        op: &'static str,
        url: &str,
        body: &Value,
        accepted: &[StatusCode],
    ) -> Result<Response, RemoteError> {
        let mut attempt: u32 = 0;
        loop {
            let mut request = self.client.post(url).json(body);
            if let Some(token) = self.id_token() {
                request = request.bearer_auth(token);
            }

            let outcome = match request.send().await {
                Ok(response) if response.status().is_success() => Ok(response),
                Ok(response) if accepted.contains(&response.status()) => Ok(response),
                Ok(response) => Err(failure_from_response(response).await),
                Err(err) => Err(failure_from_transport(&err)),
            };

            match outcome {
                Ok(response) => return Ok(response),
                Err(failure) if failure.retryable && attempt < self.config.retry_attempts => {
                    let delay = self.config.retry_backoff.saturating_mul(1 << attempt.min(16));
                    warn!(
                        op,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error,
                        "Transient firestore failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

async fn failure_from_response(response: Response) -> Failure {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| format!("{} {}", e.error.status, e.error.message).trim().to_string())
        .unwrap_or_else(|_| body.chars().take(200).collect());
    let message = format!("HTTP {}: {}", status.as_u16(), detail);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Failure {
            error: RemoteError::PermissionDenied(message),
            retryable: false,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => Failure {
            error: RemoteError::Transient(message),
            retryable: true,
        },
        status if status.is_server_error() => Failure {
            error: RemoteError::Transient(message),
            retryable: true,
        },
        _ => Failure {
            error: RemoteError::Transient(message),
            retryable: false,
        },
    }
}

fn failure_from_transport(err: &reqwest::Error) -> Failure {
    Failure {
        error: RemoteError::Transient(err.to_string()),
        retryable: err.is_timeout() || err.is_connect() || err.is_request(),
    }
}

#[async_trait]
impl RemoteEntriesPort for FirestoreEntriesClient {
    async fn fetch_page(
        &self,
        owner: &UserId,
        cursor: Option<&PageCursor>,
        page_size: usize,
    ) -> Result<EntryPage, RemoteError> {
        let start_after = match cursor {
            Some(cursor) => Some(wire::decode_cursor(cursor).ok_or_else(|| {
                RemoteError::Transient(format!("malformed page cursor: {}", cursor.as_str()))
            })?),
            None => None,
        };
        let body = wire::run_query_body(&self.config.collection, owner, start_after, page_size);

        let response = self
            .send_with_retry("run_query", &self.url("runQuery"), &body, &[])
            .await?;
        let items: Vec<RunQueryItem> = response
            .json()
            .await
            .map_err(|e| RemoteError::Transient(format!("decode runQuery response: {e}")))?;

        let documents: Vec<_> = items.into_iter().filter_map(|item| item.document).collect();
        let next_cursor = documents.last().and_then(|doc| doc.cursor());
        let fetched = documents.len();
        let entries: Vec<_> = documents
            .into_iter()
            .filter_map(|doc| {
                let name = doc.name.clone();
                let entry = doc.into_entry();
                if entry.is_none() {
                    warn!(document = %name, "Skipping malformed entry document");
                }
                entry
            })
            .collect();

        debug!(
            uid = %owner,
            fetched,
            shown = entries.len(),
            has_cursor = next_cursor.is_some(),
            "Fetched entry page"
        );
        Ok(EntryPage::new(entries, next_cursor))
    }

    async fn create_entry(
        &self,
        owner: &UserId,
        draft: &EntryDraft,
    ) -> Result<EntryId, RemoteError> {
        let id = draft.correlation_id.clone();
        let body = wire::commit_create_body(&self.document_name(&id), owner, draft);

        let response = self
            .send_with_retry("commit", &self.url("commit"), &body, &[StatusCode::CONFLICT])
            .await?;

        if response.status() == StatusCode::CONFLICT {
            info!(entry_id = %id, "Entry already exists remotely, treating as created");
        } else {
            debug!(entry_id = %id, "Entry created remotely");
        }
        Ok(id)
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use jr_core::ports::{CacheError, EntryCachePort};
use jr_core::{JournalEntry, UserId};

use crate::fs::atomic_write;

const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedEntryList {
    version: u32,
    owner: UserId,
    entries: Vec<JournalEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CachedEntryListRef<'a> {
    version: u32,
    owner: &'a UserId,
    entries: &'a [JournalEntry],
}

/// Entry list snapshots stored as `<dir>/<hex(uid)>.json`.
///
/// The file records its owner; a snapshot whose owner does not match the
/// requested identity is never returned.
pub struct FileEntryCache {
    dir: PathBuf,
}

impl FileEntryCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, owner: &UserId) -> PathBuf {
        self.dir
            .join(format!("{}.json", hex::encode(owner.as_str().as_bytes())))
    }

    fn read_snapshot(&self, owner: &UserId) -> Result<Option<Vec<JournalEntry>>> {
        let path = self.path_for(owner);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("read entry cache failed: {}", path.display()))?;
        let snapshot: CachedEntryList = serde_json::from_str(&content)
            .with_context(|| format!("parse entry cache failed: {}", path.display()))?;

        if snapshot.version != CACHE_FORMAT_VERSION {
            bail!("unsupported entry cache version {}", snapshot.version);
        }
        if &snapshot.owner != owner {
            bail!("entry cache belongs to another identity");
        }
        if snapshot.entries.iter().any(|e| e.text.trim().is_empty()) {
            bail!("entry cache contains an empty entry");
        }

        Ok(Some(snapshot.entries))
    }
}

impl EntryCachePort for FileEntryCache {
    fn load(&self, owner: &UserId) -> Option<Vec<JournalEntry>> {
        match self.read_snapshot(owner) {
            Ok(entries) => {
                debug!(uid = %owner, found = entries.is_some(), "Entry cache loaded");
                entries
            }
            Err(err) => {
                warn!(uid = %owner, error = %format!("{err:#}"), "Ignoring unreadable entry cache");
                None
            }
        }
    }

    fn save(&self, owner: &UserId, entries: &[JournalEntry]) -> Result<(), CacheError> {
        let snapshot = CachedEntryListRef {
            version: CACHE_FORMAT_VERSION,
            owner,
            entries,
        };
        let json =
            serde_json::to_vec(&snapshot).map_err(|e| CacheError::Serialize(e.to_string()))?;

        atomic_write(&self.path_for(owner), &json)
            .map_err(|e| CacheError::Io(std::io::Error::other(format!("{e:#}"))))
    }

    fn clear(&self, owner: &UserId) -> Result<(), CacheError> {
        match std::fs::remove_file(self.path_for(owner)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::Io(err)),
        }
    }
}

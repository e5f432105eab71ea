use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use jr_core::ports::{CacheError, IdentityCachePort};
use jr_core::UserIdentity;

use crate::fs::atomic_write;

/// Last signed-in identity as `{uid, displayName, email, photoURL}` JSON.
pub struct FileIdentityCache {
    path: PathBuf,
}

impl FileIdentityCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Option<UserIdentity>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read identity cache failed: {}", self.path.display()))?;
        let identity: UserIdentity = serde_json::from_str(&content)
            .with_context(|| format!("parse identity cache failed: {}", self.path.display()))?;
        if identity.uid.as_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(identity))
    }
}

impl IdentityCachePort for FileIdentityCache {
    fn load(&self) -> Option<UserIdentity> {
        self.read().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "Ignoring unreadable identity cache");
            None
        })
    }

    fn save(&self, identity: &UserIdentity) -> Result<(), CacheError> {
        let json =
            serde_json::to_vec(identity).map_err(|e| CacheError::Serialize(e.to_string()))?;
        atomic_write(&self.path, &json)
            .map_err(|e| CacheError::Io(std::io::Error::other(format!("{e:#}"))))
    }

    fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips_with_profile_fields() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileIdentityCache::new(dir.path().join("identity.json"));
        let mut identity = UserIdentity::new("u1");
        identity.display_name = Some("Ada".into());
        identity.photo_url = Some("https://example.com/a.png".into());

        cache.save(&identity).unwrap();

        assert_eq!(cache.load(), Some(identity));
        let raw = std::fs::read_to_string(dir.path().join("identity.json")).unwrap();
        assert!(raw.contains("\"photoURL\""));
    }

    #[test]
    fn malformed_or_missing_identity_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileIdentityCache::new(dir.path().join("identity.json"));
        assert_eq!(cache.load(), None);

        std::fs::write(dir.path().join("identity.json"), "[]").unwrap();
        assert_eq!(cache.load(), None);

        cache.clear().unwrap();
        assert!(!dir.path().join("identity.json").exists());
    }
}

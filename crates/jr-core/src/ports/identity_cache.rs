use crate::auth::UserIdentity;
use crate::ports::CacheError;

/// Remembers the last signed-in identity across restarts.
pub trait IdentityCachePort: Send + Sync {
    fn load(&self) -> Option<UserIdentity>;
    fn save(&self, identity: &UserIdentity) -> Result<(), CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
}

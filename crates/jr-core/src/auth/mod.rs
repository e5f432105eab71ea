//! Authentication session model.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Minimal profile of the signed-in principal.
///
/// Two identities are the same principal iff their `uid`s match; profile
/// fields are informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub uid: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl UserIdentity {
    pub fn new(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    pub fn same_principal(&self, other: &UserIdentity) -> bool {
        self.uid == other.uid
    }
}

/// Authentication lifecycle.
///
/// ```text
/// SignedOut ──→ Pending ──→ SignedIn ──→ SignedOut
///                  │
///                  └──→ SignedOut
/// ```
///
/// `Pending` may carry the identity remembered from the previous run so the
/// entry list can hydrate from the local cache before sign-in completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    Pending { cached: Option<UserIdentity> },
    SignedIn(UserIdentity),
}

impl AuthState {
    /// Identity that gates data access in this state, if any.
    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            AuthState::SignedIn(identity) => Some(identity),
            AuthState::Pending { cached } => cached.as_ref(),
            AuthState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_state_exposes_cached_identity() {
        let cached = UserIdentity::new("u1");
        let state = AuthState::Pending {
            cached: Some(cached.clone()),
        };

        assert_eq!(state.identity(), Some(&cached));
        assert!(!state.is_signed_in());
        assert_eq!(AuthState::Pending { cached: None }.identity(), None);
        assert_eq!(AuthState::SignedOut.identity(), None);
    }

    #[test]
    fn same_principal_ignores_profile_fields() {
        let a = UserIdentity::new("u1");
        let mut b = UserIdentity::new("u1");
        b.display_name = Some("Ada".into());

        assert!(a.same_principal(&b));
        assert!(!a.same_principal(&UserIdentity::new("u2")));
    }

    #[test]
    fn identity_uses_cached_profile_field_names() {
        let json = r#"{"uid":"u1","displayName":"Ada","email":"ada@example.com","photoURL":null}"#;
        let identity: UserIdentity = serde_json::from_str(json).unwrap();

        assert_eq!(identity.uid, UserId::from("u1"));
        assert_eq!(identity.display_name.as_deref(), Some("Ada"));
        assert_eq!(identity.photo_url, None);
    }
}

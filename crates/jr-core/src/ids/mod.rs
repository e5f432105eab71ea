//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Identifier of a journal entry.
///
/// Either the remote document id, or a locally generated provisional id for an
/// entry that has not been confirmed yet. Callers must treat both as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

/// Authenticated user principal (`uid`). Scopes cache keys and remote queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl_id!(EntryId, UserId);

impl EntryId {
    /// Generate a locally-unique provisional id.
    ///
    /// The id doubles as the correlation id sent alongside the remote write, so
    /// it only uses characters every document store accepts in a key.
    pub fn provisional() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_ids_are_unique_and_key_safe() {
        let a = EntryId::provisional();
        let b = EntryId::provisional();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let uid = UserId::from("user-1");
        assert_eq!(serde_json::to_string(&uid).unwrap(), "\"user-1\"");

        let back: EntryId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, EntryId::from("abc"));
    }
}

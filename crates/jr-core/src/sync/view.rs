use serde::Serialize;

use super::SyncState;
use crate::entry::JournalEntry;
use crate::ids::UserId;

/// Read-only snapshot of the entry list handed to renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListView {
    pub owner: Option<UserId>,
    pub entries: Vec<JournalEntry>,
    pub state: SyncState,
}

impl EntryListView {
    pub fn signed_out() -> Self {
        Self::default()
    }
}

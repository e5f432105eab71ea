use serde::{Deserialize, Serialize};

use super::session::SessionGeneration;
use crate::entry::JournalEntry;
use crate::ids::UserId;

/// Opaque remote-store token marking where the next page starts.
///
/// Only the remote adapter that produced it knows how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPage {
    pub entries: Vec<JournalEntry>,
    /// Cursor after the last entry; `None` when the page is empty.
    pub next_cursor: Option<PageCursor>,
}

impl EntryPage {
    pub fn new(entries: Vec<JournalEntry>, next_cursor: Option<PageCursor>) -> Self {
        Self {
            entries,
            next_cursor,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Replaces the list.
    First,
    /// Merged after the entries already loaded.
    Next,
}

/// A page read captured at request time, with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: SessionGeneration,
    pub owner: UserId,
    pub kind: PageKind,
    pub cursor: Option<PageCursor>,
}

//! Journal entry domain model.

mod list;

pub use list::{ConfirmOutcome, EntryList};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::EntryId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// Submission was empty or whitespace-only. Never reaches the remote layer.
    #[error("entry text is empty after trimming")]
    EmptyText,
}

/// Validated entry body: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryText(String);

impl EntryText {
    pub fn parse(raw: &str) -> Result<Self, EntryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EntryError::EmptyText);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Remote durability of an entry.
///
/// ```text
/// Pending ──→ Confirmed
///    │
///    └──→ Failed ──(retry)──→ Pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Inserted optimistically, remote write in flight.
    Pending,
    /// Known to exist in the remote store.
    #[default]
    Confirmed,
    /// Remote write failed; kept locally until retried or replaced by a reload.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: EntryId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: EntryStatus,
}

/// Remote write request for an optimistic entry.
///
/// `correlation_id` is the provisional entry id; the store echoes back the
/// authoritative id and the engine matches on the correlation id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub correlation_id: EntryId,
    pub text: String,
}

impl EntryDraft {
    pub fn for_entry(entry: &JournalEntry) -> Self {
        Self {
            correlation_id: entry.id.clone(),
            text: entry.text.clone(),
        }
    }
}

impl JournalEntry {
    /// An entry as reported by the remote store.
    pub fn confirmed(id: EntryId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
            status: EntryStatus::Confirmed,
        }
    }

    /// A locally created entry awaiting remote confirmation.
    pub fn provisional(text: EntryText, created_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::provisional(),
            text: text.into_inner(),
            created_at,
            status: EntryStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    pub fn is_failed(&self) -> bool {
        self.status == EntryStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let text = EntryText::parse("  hello world \n").unwrap();
        assert_eq!(text.as_str(), "hello world");
    }

    #[test]
    fn parse_rejects_whitespace_only() {
        assert_eq!(EntryText::parse(""), Err(EntryError::EmptyText));
        assert_eq!(EntryText::parse(" \t\r\n "), Err(EntryError::EmptyText));
    }

    #[test]
    fn parse_keeps_inner_newlines() {
        let text = EntryText::parse("\nline one\nline two\n").unwrap();
        assert_eq!(text.as_str(), "line one\nline two");
    }

    #[test]
    fn provisional_entry_is_pending() {
        let at = Utc.with_ymd_and_hms(2026, 10, 17, 15, 7, 0).unwrap();
        let entry = JournalEntry::provisional(EntryText::parse("hi").unwrap(), at);

        assert!(entry.is_pending());
        assert_eq!(entry.text, "hi");
        assert_eq!(entry.created_at, at);
    }

    #[test]
    fn status_defaults_to_confirmed_when_absent() {
        let json = r#"{"id":"a","text":"t","createdAt":"2026-10-17T15:07:00Z"}"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.status, EntryStatus::Confirmed);
        assert_eq!(
            entry.created_at,
            Utc.with_ymd_and_hms(2026, 10, 17, 15, 7, 0).unwrap()
        );
    }
}

//! Firestore REST request and response shapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use jr_core::{EntryDraft, EntryId, JournalEntry, PageCursor, UserId};

pub(crate) const FIELD_TEXT: &str = "text";
pub(crate) const FIELD_CREATED_AT: &str = "createdAt";
pub(crate) const FIELD_OWNER: &str = "userId";

/// One element of the `runQuery` response stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryItem {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
    #[serde(default)]
    pub create_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldValue {
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub timestamp_value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl Document {
    /// Last path segment of the document name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Raw `createdAt` timestamp, falling back to the document create time.
    pub fn created_at_raw(&self) -> Option<&str> {
        self.fields
            .get(FIELD_CREATED_AT)
            .and_then(|v| v.timestamp_value.as_deref())
            .or(self.create_time.as_deref())
    }

    /// Cursor positioned right after this document in query order.
    pub fn cursor(&self) -> Option<PageCursor> {
        self.created_at_raw()
            .map(|ts| PageCursor::new(format!("{ts}|{}", self.name)))
    }

    /// `None` for documents that cannot be shown (no text, no timestamp).
    pub fn into_entry(self) -> Option<JournalEntry> {
        let created_at = self
            .created_at_raw()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))?;
        let id = EntryId::from(self.id());
        let text = self
            .fields
            .get(FIELD_TEXT)
            .and_then(|v| v.string_value.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())?
            .to_string();
        Some(JournalEntry::confirmed(id, text, created_at))
    }
}

/// Split a cursor produced by [`Document::cursor`].
pub(crate) fn decode_cursor(cursor: &PageCursor) -> Option<(&str, &str)> {
    cursor
        .as_str()
        .split_once('|')
        .filter(|(ts, name)| !ts.is_empty() && !name.is_empty())
}

pub(crate) fn run_query_body(
    collection: &str,
    owner: &UserId,
    start_after: Option<(&str, &str)>,
    limit: usize,
) -> Value {
    let mut query = json!({
        "from": [{ "collectionId": collection }],
        "where": {
            "fieldFilter": {
                "field": { "fieldPath": FIELD_OWNER },
                "op": "EQUAL",
                "value": { "stringValue": owner.as_str() }
            }
        },
        "orderBy": [
            { "field": { "fieldPath": FIELD_CREATED_AT }, "direction": "DESCENDING" },
            { "field": { "fieldPath": "__name__" }, "direction": "DESCENDING" }
        ],
        "limit": limit
    });

    if let Some((timestamp, name)) = start_after {
        query["startAt"] = json!({
            "values": [
                { "timestampValue": timestamp },
                { "referenceValue": name }
            ],
            "before": false
        });
    }

    json!({ "structuredQuery": query })
}

pub(crate) fn commit_create_body(document_name: &str, owner: &UserId, draft: &EntryDraft) -> Value {
    json!({
        "writes": [{
            "update": {
                "name": document_name,
                "fields": {
                    FIELD_TEXT: { "stringValue": draft.text },
                    FIELD_OWNER: { "stringValue": owner.as_str() }
                }
            },
            "currentDocument": { "exists": false },
            "updateTransforms": [{
                "fieldPath": FIELD_CREATED_AT,
                "setToServerValue": "REQUEST_TIME"
            }]
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn document_maps_to_confirmed_entry() {
        let doc = document(
            r#"{
                "name": "projects/p/databases/(default)/documents/entries/abc",
                "fields": {
                    "text": { "stringValue": "hello" },
                    "createdAt": { "timestampValue": "2026-10-17T15:07:00.123456Z" },
                    "userId": { "stringValue": "u1" }
                }
            }"#,
        );

        assert_eq!(
            doc.cursor(),
            Some(PageCursor::new(
                "2026-10-17T15:07:00.123456Z|projects/p/databases/(default)/documents/entries/abc"
            ))
        );
        let entry = doc.into_entry().unwrap();
        assert_eq!(entry.id.as_str(), "abc");
        assert_eq!(entry.text, "hello");
        assert_eq!(entry.created_at.to_rfc3339(), "2026-10-17T15:07:00.123456+00:00");
    }

    #[test]
    fn document_without_text_is_skipped() {
        let doc = document(
            r#"{
                "name": "projects/p/databases/(default)/documents/entries/abc",
                "fields": { "createdAt": { "timestampValue": "2026-10-17T15:07:00Z" } }
            }"#,
        );
        assert!(doc.into_entry().is_none());
    }

    #[test]
    fn cursor_round_trips_through_decode() {
        let cursor = PageCursor::new("2026-10-17T15:07:00Z|projects/p/x/entries/abc");
        assert_eq!(
            decode_cursor(&cursor),
            Some(("2026-10-17T15:07:00Z", "projects/p/x/entries/abc"))
        );
        assert_eq!(decode_cursor(&PageCursor::new("garbage")), None);
    }

    #[test]
    fn run_query_body_includes_start_after_cursor() {
        let body = run_query_body(
            "entries",
            &UserId::from("u1"),
            Some(("2026-10-17T15:07:00Z", "projects/p/x/entries/abc")),
            10,
        );
        let query = &body["structuredQuery"];

        assert_eq!(query["where"]["fieldFilter"]["value"]["stringValue"], "u1");
        assert_eq!(query["limit"], 10);
        assert_eq!(query["startAt"]["before"], false);
        assert_eq!(
            query["startAt"]["values"][1]["referenceValue"],
            "projects/p/x/entries/abc"
        );

        let first = run_query_body("entries", &UserId::from("u1"), None, 10);
        assert!(first["structuredQuery"].get("startAt").is_none());
    }
}

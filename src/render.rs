//! Plain-text rendering of entries for the terminal.

use std::fmt::Display;
use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Local, TimeZone};

use jr_core::{EntryListView, EntryStatus, JournalEntry, SyncState, UserIdentity};

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// `3:07 PM Saturday October 17th, 2026`
pub fn format_entry_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let day = at.day();
    format!(
        "{} {} {}{}, {}",
        at.format("%-I:%M %p"),
        at.format("%A %B"),
        day,
        ordinal_suffix(day),
        at.year()
    )
}

fn status_marker(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Confirmed => "",
        EntryStatus::Pending => " [sending]",
        EntryStatus::Failed => " [not uploaded]",
    }
}

pub fn render_entry(entry: &JournalEntry) -> String {
    format!(
        "{}{}\n  {}",
        format_entry_timestamp(&entry.created_at.with_timezone(&Local)),
        status_marker(entry.status),
        entry.text
    )
}

pub fn render_view(view: &EntryListView) -> String {
    let mut out = String::new();
    if view.entries.is_empty() {
        out.push_str("No entries yet.\n");
    }
    for entry in &view.entries {
        let _ = writeln!(out, "{}\n", render_entry(entry));
    }
    if view.state == SyncState::Idle && !view.entries.is_empty() {
        out.push_str("(more entries available: use --pages)\n");
    }
    out
}

pub fn render_identity(identity: Option<&UserIdentity>) -> String {
    match identity {
        None => "(none)".to_string(),
        Some(identity) => {
            let mut line = identity.uid.to_string();
            if let Some(name) = &identity.display_name {
                let _ = write!(line, " ({name})");
            }
            if let Some(email) = &identity.email {
                let _ = write!(line, " <{email}>");
            }
            line
        }
    }
}

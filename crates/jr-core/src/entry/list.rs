use std::collections::HashSet;

use super::{EntryStatus, JournalEntry};
use crate::ids::EntryId;

/// Ordered, id-unique list of entries, newest first.
///
/// Apart from unconfirmed local entries, the list is always a prefix of the
/// remote ordering. Entries with equal `created_at` keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<JournalEntry>,
}

/// Result of reconciling a provisional entry with its remote id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Provisional id rewritten in place.
    Confirmed,
    /// The authoritative copy was already listed; the provisional copy was dropped.
    Merged,
    /// No entry with the provisional id (replaced by a reload meanwhile).
    Missing,
}

impl EntryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list, keeping the first occurrence of each id.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        let mut list = Self::new();
        list.extend_tail(entries);
        list
    }

    pub fn as_slice(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JournalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn head(&self) -> Option<&JournalEntry> {
        self.entries.first()
    }

    pub fn tail(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    pub fn get(&self, id: &EntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    /// Insert an optimistic entry at the head.
    pub fn push_front(&mut self, entry: JournalEntry) {
        self.entries.retain(|existing| existing.id != entry.id);
        self.entries.insert(0, entry);
    }

    /// Append entries at the tail, skipping ids already present.
    /// Returns how many were actually appended.
    pub fn extend_tail(&mut self, entries: Vec<JournalEntry>) -> usize {
        let mut seen: HashSet<EntryId> = self.entries.iter().map(|e| e.id.clone()).collect();
        let before = self.entries.len();
        for entry in entries {
            if seen.insert(entry.id.clone()) {
                self.entries.push(entry);
            }
        }
        self.entries.len() - before
    }

    /// Insert entries at their `created_at` position, skipping ids already
    /// present. Each entry goes after every listed entry at least as new, so
    /// equal timestamps keep insertion order. Returns how many were inserted.
    pub fn merge_by_time(&mut self, entries: Vec<JournalEntry>) -> usize {
        let mut seen: HashSet<EntryId> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut inserted = 0;
        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                continue;
            }
            let at = self
                .entries
                .iter()
                .rposition(|existing| existing.created_at >= entry.created_at)
                .map_or(0, |index| index + 1);
            self.entries.insert(at, entry);
            inserted += 1;
        }
        inserted
    }

    /// Replace the whole list with an authoritative page.
    pub fn replace_with(&mut self, entries: Vec<JournalEntry>) {
        self.entries.clear();
        self.extend_tail(entries);
    }

    pub fn confirm(&mut self, provisional: &EntryId, remote: EntryId) -> ConfirmOutcome {
        let Some(index) = self.position(provisional) else {
            return ConfirmOutcome::Missing;
        };

        if &remote != provisional && self.contains(&remote) {
            self.entries.remove(index);
            return ConfirmOutcome::Merged;
        }

        let entry = &mut self.entries[index];
        entry.id = remote;
        entry.status = EntryStatus::Confirmed;
        ConfirmOutcome::Confirmed
    }

    /// Mark a pending entry as failed. Returns false if it is not pending any more.
    pub fn mark_failed(&mut self, id: &EntryId) -> bool {
        self.set_status(id, EntryStatus::Pending, EntryStatus::Failed)
    }

    /// Move a failed entry back to pending for a retry.
    pub fn mark_retrying(&mut self, id: &EntryId) -> Option<&JournalEntry> {
        if !self.set_status(id, EntryStatus::Failed, EntryStatus::Pending) {
            return None;
        }
        self.get(id)
    }

    /// Pending entries restored without their in-flight write become failed.
    pub fn fail_orphaned_pending(&mut self) -> usize {
        let mut count = 0;
        for entry in self.entries.iter_mut().filter(|e| e.is_pending()) {
            entry.status = EntryStatus::Failed;
            count += 1;
        }
        count
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    fn set_status(&mut self, id: &EntryId, from: EntryStatus, to: EntryStatus) -> bool {
        match self.entries.iter_mut().find(|entry| &entry.id == id) {
            Some(entry) if entry.status == from => {
                entry.status = to;
                true
            }
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a JournalEntry;
    type IntoIter = std::slice::Iter<'a, JournalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

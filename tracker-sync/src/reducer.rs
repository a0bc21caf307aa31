//! Pure state transitions over the entry collection.
//!
//! Each reducer takes the current collection and returns the next one, or
//! `None` when the operation does not apply (unknown entry or milestone).
//! Untouched entries are carried over as-is.

use std::collections::HashSet;
use tracker_model::Entry;

/// Flips one milestone and recomputes that entry's progress.
pub fn toggle_milestone(entries: &[Entry], entry_id: &str, milestone_id: &str) -> Option<Vec<Entry>> {
    let index = entries.iter().position(|e| e.id == entry_id)?;
    let toggled = entries[index].toggled(milestone_id)?;
    let mut next = entries.to_vec();
    next[index] = toggled;
    Some(next)
}

/// Prepends `entry`. An existing entry with the same id is dropped, so the
/// newcomer replaces it and moves to the front.
pub fn add_entry(entries: &[Entry], entry: Entry) -> Vec<Entry> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    next.extend(entries.iter().filter(|e| e.id != entry.id).cloned());
    next.insert(0, entry);
    next
}

/// Sets an entry's progress, clamped into `[0, 1]`.
pub fn set_progress(entries: &[Entry], entry_id: &str, progress: f64) -> Option<Vec<Entry>> {
    let index = entries.iter().position(|e| e.id == entry_id)?;
    let mut next = entries.to_vec();
    next[index] = entries[index].with_progress(progress);
    Some(next)
}

/// Drops every entry whose id already appeared earlier in the list.
pub fn dedupe_by_id(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect()
}

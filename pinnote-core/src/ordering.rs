//! Pinned-first ordering.
//!
//! The visible sequence of notes keeps every pinned note ahead of every
//! unpinned one. Within each partition, fetch/insertion order is preserved.

use crate::model::Note;
use std::collections::HashSet;

/// Stable sort putting pinned notes first.
pub fn sort_pinned_first(notes: &mut [Note]) {
    notes.sort_by_key(|note| !note.pinned);
}

/// Whether `notes` satisfies the pinned-first ordering.
pub fn is_pinned_first(notes: &[Note]) -> bool {
    notes
        .windows(2)
        .all(|pair| pair[0].pinned || !pair[1].pinned)
}

/// Index at which a note with the given `pinned` flag can be inserted
/// without breaking the ordering: after the last pinned note when pinned,
/// at the end otherwise.
pub fn insertion_index(notes: &[Note], pinned: bool) -> usize {
    if pinned {
        notes.partition_point(|note| note.pinned)
    } else {
        notes.len()
    }
}

/// Drops every note whose id already appeared earlier in the list.
pub fn dedup_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(notes.len());
    notes
        .into_iter()
        .filter(|note| seen.insert(note.id.clone()))
        .collect()
}

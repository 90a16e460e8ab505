//! Note persistence for the API service.
//!
//! The service keeps its notes in memory. Handlers only see the
//! `NoteRepository` trait, so another backend can be swapped in without
//! touching the routes.

use std::sync::RwLock;

use pinnote_core::{Note, NoteDraft, NoteFields, NoteId, NoteUpdate};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a note repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Note repository lock poisoned")]
    LockPoisoned,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Durable copy of the notes, in insertion order.
pub trait NoteRepository: Send + Sync {
    /// Stores a new note built from `draft` and returns it with its id.
    fn insert(&self, draft: NoteDraft) -> RepositoryResult<Note>;

    /// All notes in insertion order.
    fn list(&self) -> RepositoryResult<Vec<Note>>;

    /// Merges `update` into the note with `id`. Returns whether it existed.
    fn update(&self, id: &NoteId, update: &NoteUpdate) -> RepositoryResult<bool>;

    /// Removes the note with `id`. Returns whether it existed.
    fn delete(&self, id: &NoteId) -> RepositoryResult<bool>;
}

/// `RwLock`-guarded in-memory repository.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<Vec<Note>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `notes`.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: RwLock::new(notes),
        }
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn insert(&self, draft: NoteDraft) -> RepositoryResult<Note> {
        let fields = NoteFields::new(
            draft.title.unwrap_or_default(),
            draft.tagline.unwrap_or_default(),
            draft.body.unwrap_or_default(),
        );
        let note = Note::new(
            Uuid::now_v7().to_string(),
            fields,
            draft.pinned.unwrap_or(false),
        );

        let mut notes = self
            .notes
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        notes.push(note.clone());
        Ok(note)
    }

    fn list(&self) -> RepositoryResult<Vec<Note>> {
        let notes = self
            .notes
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(notes.clone())
    }

    fn update(&self, id: &NoteId, update: &NoteUpdate) -> RepositoryResult<bool> {
        let mut notes = self
            .notes
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        match notes.iter_mut().find(|note| &note.id == id) {
            Some(note) => {
                note.apply_update(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &NoteId) -> RepositoryResult<bool> {
        let mut notes = self
            .notes
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let before = notes.len();
        notes.retain(|note| &note.id != id);
        Ok(notes.len() != before)
    }
}

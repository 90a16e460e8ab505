//! Client-side note cache.
//!
//! `NoteCache` mirrors the notes fetched from a `NoteStoreApi` and routes
//! every mutation through it. The visible list always keeps pinned notes
//! ahead of unpinned ones after `refresh` and `update_pinned`.
//!
//! State lives in a `watch` channel. Each operation awaits the store exactly
//! once, and every local change is a single `send_modify` step taken either
//! before or after that await, never across it.

use std::sync::Arc;

use pinnote_core::{
    dedup_by_id, insertion_index, sort_pinned_first, Note, NoteDraft, NoteFields, NoteId,
    NoteStoreApi, NoteUpdate, StatusMessage, StoreError, StoreResult,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::notifications::{Notification, Notifier};

/// What happens to an optimistic change when the store rejects it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimisticPolicy {
    /// Leave the local change in place.
    #[default]
    KeepLocal,
    /// Undo the local change.
    Rollback,
}

/// Observable cache contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
    pub notes: Vec<Note>,
    /// True while a full refresh is in flight.
    pub loading: bool,
}

/// Cloneable handle to a note cache. Clones share state.
///
/// Subscriptions close once the last handle is dropped.
#[derive(Clone)]
pub struct NoteCache {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<CacheState>,
    api: Arc<dyn NoteStoreApi>,
    notifier: Arc<dyn Notifier>,
    policy: OptimisticPolicy,
}

impl NoteCache {
    /// An empty cache. Nothing is fetched until `refresh` is called.
    pub fn new(
        api: Arc<dyn NoteStoreApi>,
        notifier: Arc<dyn Notifier>,
        policy: OptimisticPolicy,
    ) -> Self {
        let (state, _) = watch::channel(CacheState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                api,
                notifier,
                policy,
            }),
        }
    }

    /// A cache that has run its initial refresh.
    ///
    /// A failed initial refresh has already been reported; the cache is
    /// returned empty.
    pub async fn start(
        api: Arc<dyn NoteStoreApi>,
        notifier: Arc<dyn Notifier>,
        policy: OptimisticPolicy,
    ) -> Self {
        let cache = Self::new(api, notifier, policy);
        if let Err(err) = cache.refresh().await {
            tracing::warn!(error = %err, "Initial note refresh failed");
        }
        cache
    }

    pub fn policy(&self) -> OptimisticPolicy {
        self.inner.policy
    }

    // ========================================================================
    // READ VIEWS
    // ========================================================================

    pub fn snapshot(&self) -> CacheState {
        self.inner.state.borrow().clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.inner.state.borrow().notes.clone()
    }

    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.inner
            .state
            .borrow()
            .notes
            .iter()
            .find(|note| &note.id == id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.inner.state.subscribe()
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Replaces the cache with the store's full list, pinned first.
    ///
    /// On failure the current notes stay visible.
    pub async fn refresh(&self) -> StoreResult<()> {
        self.modify(|state| state.loading = true);

        match self.inner.api.list().await {
            Ok(list) => {
                let mut notes = dedup_by_id(list.data);
                sort_pinned_first(&mut notes);
                tracing::debug!(count = notes.len(), "Notes refreshed");
                self.modify(|state| {
                    state.notes = notes;
                    state.loading = false;
                });
                Ok(())
            }
            Err(err) => {
                self.modify(|state| state.loading = false);
                self.report("refresh", &err);
                Err(err)
            }
        }
    }

    /// Creates a note and inserts the stored copy.
    pub async fn add(
        &self,
        title: impl Into<String>,
        tagline: impl Into<String>,
        body: impl Into<String>,
    ) -> StoreResult<Note> {
        let draft = NoteDraft::from(NoteFields::new(title, tagline, body));

        match self.inner.api.create(&draft).await {
            Ok(note) => {
                tracing::debug!(note_id = %note.id, "Note added");
                let inserted = note.clone();
                self.modify(move |state| {
                    state.notes.retain(|n| n.id != inserted.id);
                    let index = insertion_index(&state.notes, inserted.pinned);
                    state.notes.insert(index, inserted);
                });
                Ok(note)
            }
            Err(err) => {
                self.report("add", &err);
                Err(err)
            }
        }
    }

    /// Writes new text for `id`, then updates the entry in place.
    pub async fn update(
        &self,
        id: &NoteId,
        title: impl Into<String>,
        tagline: impl Into<String>,
        body: impl Into<String>,
    ) -> StoreResult<StatusMessage> {
        let fields = NoteFields::new(title, tagline, body);
        let update = NoteUpdate::from(fields.clone());

        match self.inner.api.update(id, &update).await {
            Ok(message) => {
                tracing::debug!(note_id = %id, "Note updated");
                self.modify(|state| {
                    if let Some(note) = state.notes.iter_mut().find(|n| &n.id == id) {
                        note.set_fields(fields);
                    }
                });
                Ok(message)
            }
            Err(err) => {
                self.report("update", &err);
                Err(err)
            }
        }
    }

    /// Removes `id` immediately, then deletes it from the store.
    pub async fn delete(&self, id: &NoteId) -> StoreResult<StatusMessage> {
        let mut removed = None;
        self.modify(|state| {
            if let Some(index) = state.notes.iter().position(|n| &n.id == id) {
                removed = Some((index, state.notes.remove(index)));
            }
        });

        match self.inner.api.delete(id).await {
            Ok(message) => {
                tracing::debug!(note_id = %id, "Note deleted");
                Ok(message)
            }
            Err(err) => {
                if let (OptimisticPolicy::Rollback, Some((index, note))) =
                    (self.inner.policy, removed)
                {
                    self.restore(index, note);
                }
                self.report("delete", &err);
                Err(err)
            }
        }
    }

    /// Writes every field of `note` to the store. Local state is untouched.
    pub async fn set_pinned(&self, note: &Note) -> StoreResult<StatusMessage> {
        match self.inner.api.update(&note.id, &NoteUpdate::from(note)).await {
            Ok(message) => {
                tracing::debug!(note_id = %note.id, pinned = note.pinned, "Note pin written");
                Ok(message)
            }
            Err(err) => {
                self.report("set_pinned", &err);
                Err(err)
            }
        }
    }

    /// Replaces the matching entry with `note` and re-sorts immediately,
    /// then writes it through with `set_pinned`.
    pub async fn update_pinned(&self, note: Note) -> StoreResult<StatusMessage> {
        let mut previous = None;
        self.modify(|state| {
            if let Some(index) = state.notes.iter().position(|n| n.id == note.id) {
                let old = std::mem::replace(&mut state.notes[index], note.clone());
                previous = Some((index, old));
            }
            sort_pinned_first(&mut state.notes);
        });

        let result = self.set_pinned(&note).await;
        if result.is_err() {
            if let (OptimisticPolicy::Rollback, Some((index, old))) = (self.inner.policy, previous) {
                self.modify(|state| state.notes.retain(|n| n.id != old.id));
                self.restore(index, old);
            }
        }
        result
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn modify(&self, change: impl FnOnce(&mut CacheState)) {
        self.inner.state.send_modify(change);
    }

    /// Puts `note` back at `index` unless its id reappeared meanwhile.
    fn restore(&self, index: usize, note: Note) {
        tracing::debug!(note_id = %note.id, index, "Rolling back optimistic change");
        self.modify(|state| {
            if state.notes.iter().any(|n| n.id == note.id) {
                return;
            }
            let index = index.min(state.notes.len());
            state.notes.insert(index, note);
            sort_pinned_first(&mut state.notes);
        });
    }

    fn report(&self, operation: &'static str, err: &StoreError) {
        tracing::warn!(operation, error = %err, "Note store request failed");
        for message in err.messages() {
            self.inner.notifier.notify(Notification::error(message));
        }
    }
}

impl std::fmt::Debug for NoteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteCache")
            .field("state", &*self.inner.state.borrow())
            .field("policy", &self.inner.policy)
            .finish()
    }
}

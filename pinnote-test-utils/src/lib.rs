//! pinnote Test Utilities
//!
//! Shared test infrastructure for the pinnote workspace:
//! - `MockNoteStore`, a scriptable in-memory `NoteStoreApi`
//! - Proptest generators for notes
//! - Test fixtures for common scenarios

pub use pinnote_core::{
    Note, NoteDraft, NoteFields, NoteId, NoteList, NoteStoreApi, NoteUpdate, StatusMessage,
    StoreError, StoreResult,
};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// MOCK NOTE STORE
// ============================================================================

/// The four store operations, used to target failures and gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Create,
    List,
    Update,
    Delete,
}

/// One recorded request against the mock store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create(NoteDraft),
    List,
    Update(NoteId, NoteUpdate),
    Delete(NoteId),
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::Create(_) => StoreOp::Create,
            StoreCall::List => StoreOp::List,
            StoreCall::Update(..) => StoreOp::Update,
            StoreCall::Delete(_) => StoreOp::Delete,
        }
    }
}

/// Holds a single request in flight until released.
///
/// `entered` resolves once the request has reached the store; the request
/// then waits until `release` is called.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    /// Waits until the gated request has arrived.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the gated request resolve.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Debug, Default)]
struct MockState {
    notes: Vec<Note>,
    failures: HashMap<StoreOp, VecDeque<StoreError>>,
    gates: HashMap<StoreOp, VecDeque<Gate>>,
    calls: Vec<StoreCall>,
    queued_ids: VecDeque<NoteId>,
    queued_notes: VecDeque<Note>,
    next_id: u64,
}

/// In-memory note store that behaves like the REST service.
///
/// Created notes get ids `note-1`, `note-2`, ... unless ids were queued with
/// `queue_id`, or the whole note was queued with `queue_note`. Update rejects
/// missing text fields with a 400, just like the service. Cloning shares the
/// underlying state.
#[derive(Debug, Clone, Default)]
pub struct MockNoteStore {
    state: Arc<Mutex<MockState>>,
}

impl MockNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `notes` in the given order. Duplicated ids are kept.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let store = Self::new();
        lock(&store.state).notes = notes;
        store
    }

    /// Id assigned to the next created note.
    pub fn queue_id(&self, id: impl Into<NoteId>) {
        lock(&self.state).queued_ids.push_back(id.into());
    }

    /// Note returned (and stored) by the next create, whatever the draft says.
    pub fn queue_note(&self, note: Note) {
        lock(&self.state).queued_notes.push_back(note);
    }

    /// Makes the next `op` request fail with `error`. Failures queue up.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        lock(&self.state)
            .failures
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Holds the next `op` request until the returned gate is released.
    pub fn hold_next(&self, op: StoreOp) -> Gate {
        let gate = Gate::default();
        lock(&self.state)
            .gates
            .entry(op)
            .or_default()
            .push_back(gate.clone());
        gate
    }

    /// Current durable contents.
    pub fn notes(&self) -> Vec<Note> {
        lock(&self.state).notes.clone()
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of requests received for `op`.
    pub fn call_count(&self, op: StoreOp) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// Records the call and returns the gate and failure queued for it.
    fn begin(&self, call: StoreCall) -> (Option<Gate>, Option<StoreError>) {
        let op = call.op();
        let mut state = lock(&self.state);
        state.calls.push(call);
        let gate = state.gates.get_mut(&op).and_then(VecDeque::pop_front);
        let failure = state.failures.get_mut(&op).and_then(VecDeque::pop_front);
        (gate, failure)
    }

    async fn enter(&self, call: StoreCall) -> StoreResult<()> {
        let (gate, failure) = self.begin(call);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NoteStoreApi for MockNoteStore {
    async fn create(&self, draft: &NoteDraft) -> StoreResult<Note> {
        self.enter(StoreCall::Create(draft.clone())).await?;

        let mut state = lock(&self.state);
        if let Some(note) = state.queued_notes.pop_front() {
            state.notes.push(note.clone());
            return Ok(note);
        }
        let id = match state.queued_ids.pop_front() {
            Some(id) => id,
            None => {
                state.next_id += 1;
                NoteId::new(format!("note-{}", state.next_id))
            }
        };
        let note = Note::new(
            id,
            NoteFields::new(
                draft.title.clone().unwrap_or_default(),
                draft.tagline.clone().unwrap_or_default(),
                draft.body.clone().unwrap_or_default(),
            ),
            draft.pinned.unwrap_or(false),
        );
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn list(&self) -> StoreResult<NoteList> {
        self.enter(StoreCall::List).await?;
        Ok(NoteList::new(self.notes()))
    }

    async fn update(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<StatusMessage> {
        self.enter(StoreCall::Update(id.clone(), update.clone())).await?;
        if update.missing_required_fields() {
            return Err(fixtures::rejected(400, fixtures::REQUIRED_FIELDS));
        }

        let mut state = lock(&self.state);
        if let Some(note) = state.notes.iter_mut().find(|note| &note.id == id) {
            note.apply_update(update);
        }
        Ok(StatusMessage::new("Note updated successfully"))
    }

    async fn delete(&self, id: &NoteId) -> StoreResult<StatusMessage> {
        self.enter(StoreCall::Delete(id.clone())).await?;
        lock(&self.state).notes.retain(|note| &note.id != id);
        Ok(StatusMessage::new("Note deleted successfully"))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for note types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a short opaque NoteId.
    pub fn arb_note_id() -> impl Strategy<Value = NoteId> {
        "[a-z0-9]{1,8}".prop_map(NoteId::new)
    }

    /// Generate non-empty text suitable for a required note field.
    pub fn arb_note_text() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,15}"
    }

    pub fn arb_note_fields() -> impl Strategy<Value = NoteFields> {
        (arb_note_text(), arb_note_text(), arb_note_text())
            .prop_map(|(title, tagline, body)| NoteFields::new(title, tagline, body))
    }

    pub fn arb_note() -> impl Strategy<Value = Note> {
        (arb_note_id(), arb_note_fields(), any::<bool>())
            .prop_map(|(id, fields, pinned)| Note::new(id, fields, pinned))
    }

    /// Generate up to `max` notes with pairwise distinct ids.
    pub fn arb_notes(max: usize) -> impl Strategy<Value = Vec<Note>> {
        prop::collection::hash_set(arb_note_id(), 0..=max).prop_flat_map(|ids| {
            let ids: Vec<NoteId> = ids.into_iter().collect();
            let len = ids.len();
            prop::collection::vec((arb_note_fields(), any::<bool>()), len).prop_map(
                move |rest| {
                    ids.iter()
                        .cloned()
                        .zip(rest)
                        .map(|(id, (fields, pinned))| Note::new(id, fields, pinned))
                        .collect()
                },
            )
        })
    }

    /// Generate a store failure of any kind.
    pub fn arb_store_error() -> impl Strategy<Value = StoreError> {
        prop_oneof![
            (400u16..600, arb_note_text()).prop_map(|(status, message)| {
                StoreError::Rejected {
                    status,
                    messages: vec![message],
                }
            }),
            arb_note_text().prop_map(StoreError::Transport),
            arb_note_text().prop_map(StoreError::Decode),
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built notes and errors for common scenarios.

    use super::*;

    pub const REQUIRED_FIELDS: &str = "Please fill all the required fields";

    /// A note with placeholder text.
    pub fn note(id: &str, pinned: bool) -> Note {
        Note::new(
            id,
            NoteFields::new(format!("Title {}", id), "Tagline", "Body"),
            pinned,
        )
    }

    /// `a` unpinned followed by `b` pinned, in fetch order.
    pub fn unsorted_pair() -> Vec<Note> {
        vec![note("a", false), note("b", true)]
    }

    /// A rejection carrying a single message.
    pub fn rejected(status: u16, message: &str) -> StoreError {
        StoreError::Rejected {
            status,
            messages: vec![message.to_string()],
        }
    }

    /// A transport failure.
    pub fn unreachable() -> StoreError {
        StoreError::Transport("connection refused".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[tokio::test]
    async fn mock_assigns_ids_and_defaults() {
        let store = MockNoteStore::new();
        store.queue_id("x");

        let first = store.create(&NoteDraft::default()).await.unwrap();
        let second = store.create(&NoteDraft::default()).await.unwrap();

        assert_eq!(first.id.as_str(), "x");
        assert_eq!(second.id.as_str(), "note-1");
        assert!(!first.pinned);
        assert_eq!(store.notes().len(), 2);
    }

    #[tokio::test]
    async fn mock_returns_queued_note_over_draft() {
        let store = MockNoteStore::new();
        store.queue_note(note("n", true));

        let created = store.create(&NoteDraft::default()).await.unwrap();

        assert_eq!(created, note("n", true));
        assert_eq!(store.notes(), vec![note("n", true)]);
        let next = store.create(&NoteDraft::default()).await.unwrap();
        assert_eq!(next.id.as_str(), "note-1");
    }

    #[tokio::test]
    async fn mock_update_requires_text_fields() {
        let store = MockNoteStore::with_notes(vec![note("a", false)]);
        let err = store
            .update(&NoteId::from("a"), &NoteUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.messages(), vec![REQUIRED_FIELDS]);
    }

    #[tokio::test]
    async fn mock_failures_are_consumed_in_order() {
        let store = MockNoteStore::new();
        store.fail_next(StoreOp::List, unreachable());

        assert!(store.list().await.is_err());
        assert!(store.list().await.is_ok());
        assert_eq!(store.call_count(StoreOp::List), 2);
    }

    #[tokio::test]
    async fn gate_holds_request_until_released() {
        let store = MockNoteStore::with_notes(vec![note("a", false)]);
        let gate = store.hold_next(StoreOp::Delete);

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.delete(&NoteId::from("a")).await })
        };

        gate.entered().await;
        assert_eq!(store.notes().len(), 1);
        gate.release();

        assert!(task.await.unwrap().is_ok());
        assert!(store.notes().is_empty());
    }
}

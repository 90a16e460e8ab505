//! pinnote Core - Note Types
//!
//! Data structures shared by the note store service and the client cache:
//! - `Note` and its request/response shapes
//! - Pinned-first ordering rules
//! - The `NoteStoreApi` seam and its error taxonomy

pub mod model;
pub mod ordering;
pub mod store;

pub use model::{Note, NoteDraft, NoteFields, NoteId, NoteList, NoteUpdate, StatusMessage};
pub use ordering::{dedup_by_id, insertion_index, is_pinned_first, sort_pinned_first};
pub use store::{ErrorEnvelope, NoteStoreApi, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

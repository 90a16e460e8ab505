//! Note REST API Routes
//!
//! Axum handlers for the four note operations. Every handler goes through
//! the `NoteRepository` held in `NoteState`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;

use pinnote_core::{Note, NoteDraft, NoteId, NoteList, NoteUpdate, StatusMessage};

use crate::{
    error::{ApiError, ApiResult},
    repository::NoteRepository,
};

pub const NOTE_UPDATED: &str = "Note updated successfully";
pub const NOTE_DELETED: &str = "Note deleted successfully";

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for note routes.
#[derive(Clone)]
pub struct NoteState {
    pub repo: Arc<dyn NoteRepository>,
}

impl NoteState {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /addnotes - Create a new note
///
/// No field validation: absent fields are stored empty.
#[utoipa::path(
    post,
    path = "/addnotes",
    tag = "Notes",
    request_body = NoteDraft,
    responses(
        (status = 201, description = "Note created successfully", body = Note),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 500, description = "Internal error", body = ApiError),
    )
)]
pub async fn create_note(
    State(state): State<Arc<NoteState>>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(draft) = payload?;
    let note = state.repo.insert(draft)?;
    tracing::debug!(note_id = %note.id, pinned = note.pinned, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /fetchnotes - List every note in insertion order
#[utoipa::path(
    get,
    path = "/fetchnotes",
    tag = "Notes",
    responses(
        (status = 200, description = "All notes", body = NoteList),
        (status = 500, description = "Internal error", body = ApiError),
    )
)]
pub async fn list_notes(State(state): State<Arc<NoteState>>) -> ApiResult<Json<NoteList>> {
    let notes = state.repo.list()?;
    Ok(Json(NoteList::new(notes)))
}

/// PUT /updatenotes/:id - Update a note
///
/// Title, tagline and body are required. An unknown id is not an error.
#[utoipa::path(
    put,
    path = "/updatenotes/{id}",
    tag = "Notes",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = NoteUpdate,
    responses(
        (status = 200, description = "Note updated", body = StatusMessage),
        (status = 400, description = "Missing required fields", body = ApiError),
        (status = 500, description = "Internal error", body = ApiError),
    )
)]
pub async fn update_note(
    State(state): State<Arc<NoteState>>,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> ApiResult<Json<StatusMessage>> {
    let Json(update) = payload?;
    if update.missing_required_fields() {
        return Err(ApiError::required_fields());
    }

    let id = NoteId::from(id);
    let found = state.repo.update(&id, &update)?;
    if !found {
        tracing::debug!(note_id = %id, "Update for unknown note");
    }

    Ok(Json(StatusMessage::new(NOTE_UPDATED)))
}

/// DELETE /deletenotes/:id - Delete a note
#[utoipa::path(
    delete,
    path = "/deletenotes/{id}",
    tag = "Notes",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = StatusMessage),
        (status = 500, description = "Internal error", body = ApiError),
    )
)]
pub async fn delete_note(
    State(state): State<Arc<NoteState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusMessage>> {
    let id = NoteId::from(id);
    let found = state.repo.delete(&id)?;
    tracing::debug!(note_id = %id, found, "Note delete");

    Ok(Json(StatusMessage::new(NOTE_DELETED)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the note routes router.
pub fn create_router(repo: Arc<dyn NoteRepository>) -> Router {
    let state = Arc::new(NoteState::new(repo));

    Router::new()
        .route("/addnotes", post(create_note))
        .route("/fetchnotes", get(list_notes))
        .route("/updatenotes/:id", put(update_note))
        .route("/deletenotes/:id", delete(delete_note))
        .with_state(state)
}

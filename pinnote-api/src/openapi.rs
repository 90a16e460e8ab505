//! OpenAPI Specification for the pinnote API
//!
//! Generated by utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::note;

use pinnote_core::{Note, NoteDraft, NoteId, NoteList, NoteUpdate, StatusMessage};

/// OpenAPI document for the note store service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pinnote API",
        version = "0.1.0",
        description = "Note store with pinned notes"
    ),
    servers(
        (url = "http://localhost:5555", description = "Local Development")
    ),
    tags(
        (name = "Notes", description = "Create, list, update and delete notes")
    ),
    paths(
        note::create_note,
        note::list_notes,
        note::update_note,
        note::delete_note,
    ),
    components(schemas(
        Note,
        NoteId,
        NoteDraft,
        NoteUpdate,
        NoteList,
        StatusMessage,
        ApiError,
        ErrorCode,
    ))
)]
pub struct ApiDoc;

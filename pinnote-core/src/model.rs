//! Note entity and its wire shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque note identifier, assigned by the note store at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A persisted note.
///
/// The identifier travels as `_id` on the wire; `id` is accepted when decoding.
/// Text fields the store never received decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Note {
    #[serde(rename = "_id", alias = "id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub pinned: bool,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, fields: NoteFields, pinned: bool) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            tagline: fields.tagline,
            body: fields.body,
            pinned,
        }
    }

    /// Replaces the text fields, leaving `id` and `pinned` untouched.
    pub fn set_fields(&mut self, fields: NoteFields) {
        self.title = fields.title;
        self.tagline = fields.tagline;
        self.body = fields.body;
    }

    /// Merges every field present in `update` into this note.
    pub fn apply_update(&mut self, update: &NoteUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(tagline) = &update.tagline {
            self.tagline = tagline.clone();
        }
        if let Some(body) = &update.body {
            self.body = body.clone();
        }
        if let Some(pinned) = update.pinned {
            self.pinned = pinned;
        }
    }

    /// Copy of this note with `pinned` set.
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}

/// The editable text of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NoteFields {
    pub title: String,
    pub tagline: String,
    pub body: String,
}

impl NoteFields {
    pub fn new(
        title: impl Into<String>,
        tagline: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            tagline: tagline.into(),
            body: body.into(),
        }
    }
}

/// Request body for creating a note. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NoteDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl From<NoteFields> for NoteDraft {
    fn from(fields: NoteFields) -> Self {
        Self {
            title: Some(fields.title),
            tagline: Some(fields.tagline),
            body: Some(fields.body),
            pinned: None,
        }
    }
}

/// Request body for updating a note: any subset of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl NoteUpdate {
    /// True when title, tagline or body is absent or empty.
    ///
    /// Whitespace-only values count as present.
    pub fn missing_required_fields(&self) -> bool {
        [&self.title, &self.tagline, &self.body]
            .iter()
            .any(|field| field.as_deref().map_or(true, str::is_empty))
    }
}

impl From<NoteFields> for NoteUpdate {
    fn from(fields: NoteFields) -> Self {
        Self {
            title: Some(fields.title),
            tagline: Some(fields.tagline),
            body: Some(fields.body),
            pinned: None,
        }
    }
}

impl From<&Note> for NoteUpdate {
    fn from(note: &Note) -> Self {
        Self {
            title: Some(note.title.clone()),
            tagline: Some(note.tagline.clone()),
            body: Some(note.body.clone()),
            pinned: Some(note.pinned),
        }
    }
}

/// Response body of the list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NoteList {
    pub count: usize,
    pub data: Vec<Note>,
}

impl NoteList {
    pub fn new(data: Vec<Note>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Response body of update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

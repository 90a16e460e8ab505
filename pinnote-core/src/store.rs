//! The note store seam.
//!
//! `NoteStoreApi` is what the client cache talks to. The REST client
//! implements it over HTTP; tests substitute an in-memory mock.

use crate::model::{Note, NoteDraft, NoteId, NoteList, NoteUpdate, StatusMessage};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single note store request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("Note store rejected the request ({status}): {}", .messages.join("; "))]
    Rejected { status: u16, messages: Vec<String> },

    /// The request never produced a response (connection, timeout).
    #[error("Note store unreachable: {0}")]
    Transport(String),

    /// A success response whose body could not be decoded.
    #[error("Unexpected response from note store: {0}")]
    Decode(String),
}

impl StoreError {
    /// Builds a `Rejected` error from a raw error response body.
    pub fn rejected(status: u16, body: &str) -> Self {
        Self::Rejected {
            status,
            messages: ErrorEnvelope::messages_from(status, body),
        }
    }

    /// User-facing messages, one per underlying error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Rejected { messages, .. } if !messages.is_empty() => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Tolerant decoder for error response bodies.
///
/// Accepts `{"message": ..}`, `{"error": ..}` and `{"errors": [{"msg": ..}]}`
/// shapes, alone or mixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorItem {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Messages carried by the envelope, list entries first.
    pub fn into_messages(self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .errors
            .into_iter()
            .filter_map(|item| item.msg.or(item.message))
            .collect();
        messages.extend(self.error);
        messages.extend(self.message);
        messages.retain(|m| !m.is_empty());
        messages
    }

    /// Decodes `body`, falling back to `HTTP <status>: <body>` when it carries
    /// no recognizable message.
    pub fn messages_from(status: u16, body: &str) -> Vec<String> {
        let messages = serde_json::from_str::<ErrorEnvelope>(body)
            .map(ErrorEnvelope::into_messages)
            .unwrap_or_default();
        if !messages.is_empty() {
            return messages;
        }
        let body = body.trim();
        if body.is_empty() {
            vec![format!("HTTP {}", status)]
        } else {
            vec![format!("HTTP {}: {}", status, body)]
        }
    }
}

/// Remote service of record for notes.
///
/// Every method is a single request: it suspends once and resolves with
/// either the decoded success body or a `StoreError`.
#[async_trait]
pub trait NoteStoreApi: Send + Sync {
    /// `POST /addnotes`
    async fn create(&self, draft: &NoteDraft) -> StoreResult<Note>;

    /// `GET /fetchnotes`
    async fn list(&self) -> StoreResult<NoteList>;

    /// `PUT /updatenotes/{id}`
    async fn update(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<StatusMessage>;

    /// `DELETE /deletenotes/{id}`
    async fn delete(&self, id: &NoteId) -> StoreResult<StatusMessage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_reads_message() {
        let messages = ErrorEnvelope::messages_from(400, r#"{"message":"Please fill all the required fields"}"#);
        assert_eq!(messages, vec!["Please fill all the required fields"]);
    }

    #[test]
    fn envelope_reads_singular_error() {
        let messages = ErrorEnvelope::messages_from(500, r#"{"error":"boom"}"#);
        assert_eq!(messages, vec!["boom"]);
    }

    #[test]
    fn envelope_reads_error_list() {
        let body = r#"{"errors":[{"msg":"title is required"},{"msg":"body is required"}]}"#;
        let messages = ErrorEnvelope::messages_from(422, body);
        assert_eq!(messages, vec!["title is required", "body is required"]);
    }

    #[test]
    fn envelope_with_code_and_message() {
        let body = r#"{"code":"VALIDATION_FAILED","message":"bad"}"#;
        assert_eq!(ErrorEnvelope::messages_from(400, body), vec!["bad"]);
    }

    #[test]
    fn envelope_falls_back_to_status_and_text() {
        assert_eq!(
            ErrorEnvelope::messages_from(502, "Bad Gateway"),
            vec!["HTTP 502: Bad Gateway"]
        );
        assert_eq!(ErrorEnvelope::messages_from(503, ""), vec!["HTTP 503"]);
        assert_eq!(ErrorEnvelope::messages_from(500, "{}"), vec!["HTTP 500: {}"]);
    }

    #[test]
    fn store_error_messages() {
        let err = StoreError::rejected(400, r#"{"errors":[{"msg":"a"},{"msg":"b"}]}"#);
        assert_eq!(err.messages(), vec!["a", "b"]);
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("a; b"));

        let err = StoreError::Transport("connection refused".to_string());
        assert_eq!(err.messages().len(), 1);
        assert!(err.messages()[0].contains("connection refused"));
        assert_eq!(err.status(), None);
    }
}

//! Error types for the pinnote client.

use crate::config::ConfigError;
use pinnote_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Note {0} is not in the cache")]
    UnknownNote(String),
}

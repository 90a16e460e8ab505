//! pinnote API - Note Store Service
//!
//! Axum-based REST service exposing create, list, update and delete over
//! notes held in a `NoteRepository`.

pub mod config;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use repository::{InMemoryNoteRepository, NoteRepository, RepositoryError};
pub use routes::create_api_router;

//! pinnote client
//!
//! - `NoteCache`: optimistic, pinned-first mirror of the note store
//! - `RestClient`: `NoteStoreApi` over HTTP
//! - Notification sinks, configuration and errors

pub mod api_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod notifications;

pub use api_client::RestClient;
pub use cache::{CacheState, NoteCache, OptimisticPolicy};
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use notifications::{Notification, NotificationLevel, NotificationLog, Notifier};

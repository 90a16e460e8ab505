//! Tracing setup for the API server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_FILTER: &str = "pinnote_api=debug,tower_http=debug,info";

/// Install the global subscriber: `RUST_LOG` if set, `DEFAULT_FILTER` otherwise.
///
/// `json` selects JSON lines over the human-readable format.
pub fn init_tracing(json: bool) -> ApiResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| ApiError::internal_error(format!("Failed to initialize tracing: {}", e)))
}

//! pinnote API Server Entry Point

use std::sync::Arc;

use pinnote_api::{
    create_api_router, telemetry::init_tracing, ApiError, ApiResult, InMemoryNoteRepository,
    ServerConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let json_logs = std::env::var("PINNOTE_LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    init_tracing(json_logs)?;

    let config = ServerConfig::from_env()?;
    let repo = Arc::new(InMemoryNoteRepository::new());
    let app = create_api_router(repo, &config);

    let addr = config.bind_addr()?;
    tracing::info!(%addr, "Starting pinnote API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

//! REST API Routes Module
//!
//! Includes:
//! - Note CRUD routes
//! - OpenAPI document at /openapi.json
//! - CORS support for browser-based clients

pub mod note;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::repository::NoteRepository;

pub use note::create_router as note_router;

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", config.cors_origins);
        let origins: Vec<axum::http::HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(e) => {
                    tracing::warn!(origin = %o, error = %e, "CORS: ignoring invalid origin");
                    None
                }
            })
            .collect();
        cors.allow_origin(origins)
    }
}

/// Create the complete API router.
///
/// - Note routes at the root (`/addnotes`, `/fetchnotes`, ...)
/// - OpenAPI spec at /openapi.json
/// - CORS and request tracing on every route
pub fn create_api_router(repo: Arc<dyn NoteRepository>, config: &ServerConfig) -> Router {
    Router::new()
        .merge(note_router(repo))
        .route("/openapi.json", get(openapi_json))
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

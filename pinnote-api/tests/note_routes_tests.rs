//! Router tests for the note routes.
//!
//! Requests are driven through the full router with `oneshot`, so CORS,
//! tracing and JSON rejection handling are all in the path.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pinnote_api::{create_api_router, InMemoryNoteRepository, ServerConfig};
use pinnote_core::{Note, NoteFields, NoteList};
use proptest::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(notes: Vec<Note>) -> Router {
    let repo = Arc::new(InMemoryNoteRepository::with_notes(notes));
    create_api_router(repo, &ServerConfig::default())
}

fn app() -> Router {
    app_with(Vec::new())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn seeded() -> Vec<Note> {
    vec![
        Note::new("a", NoteFields::new("Alpha", "first", "one"), false),
        Note::new("b", NoteFields::new("Beta", "second", "two"), true),
    ]
}

#[tokio::test]
async fn create_returns_201_with_server_id() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/addnotes",
        Some(json!({"title": "T", "tagline": "Tag", "body": "B"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["_id"].as_str().unwrap().is_empty());
    assert_eq!(body["title"], "T");
    assert_eq!(body["pinned"], false);
}

#[tokio::test]
async fn create_without_fields_stores_empty_strings() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/addnotes", Some(json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "");
    assert_eq!(body["tagline"], "");
    assert_eq!(body["body"], "");
    assert_eq!(body["pinned"], false);
}

#[tokio::test]
async fn create_with_malformed_json_uses_error_envelope() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/addnotes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn fetch_returns_count_and_data_in_insertion_order() {
    let app = app_with(seeded());
    let (status, body) = send(&app, Method::GET, "/fetchnotes", None).await;

    assert_eq!(status, StatusCode::OK);
    let list: NoteList = serde_json::from_value(body).unwrap();
    assert_eq!(list.count, 2);
    let ids: Vec<&str> = list.data.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn update_with_empty_title_is_rejected() {
    let app = app_with(seeded());
    let (status, body) = send(
        &app,
        Method::PUT,
        "/updatenotes/a",
        Some(json!({"title": "", "tagline": "t", "body": "b"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["message"], "Please fill all the required fields");

    let (_, body) = send(&app, Method::GET, "/fetchnotes", None).await;
    assert_eq!(body["data"][0]["title"], "Alpha");
}

#[tokio::test]
async fn update_with_missing_body_is_rejected() {
    let app = app_with(seeded());
    let (status, _) = send(
        &app,
        Method::PUT,
        "/updatenotes/a",
        Some(json!({"title": "New", "tagline": "t"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_merges_fields_including_pinned() {
    let app = app_with(seeded());
    let (status, body) = send(
        &app,
        Method::PUT,
        "/updatenotes/a",
        Some(json!({"title": "New", "tagline": "t", "body": "b", "pinned": true})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note updated successfully");

    let (_, body) = send(&app, Method::GET, "/fetchnotes", None).await;
    assert_eq!(body["data"][0]["title"], "New");
    assert_eq!(body["data"][0]["pinned"], true);
}

#[tokio::test]
async fn update_of_unknown_id_still_succeeds() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/updatenotes/ghost",
        Some(json!({"title": "T", "tagline": "t", "body": "b"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note updated successfully");
}

#[tokio::test]
async fn delete_removes_note_and_is_idempotent() {
    let app = app_with(seeded());
    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, "/deletenotes/a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Note deleted successfully");
    }

    let (_, body) = send(&app, Method::GET, "/fetchnotes", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["_id"], "b");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/fetchnotes").is_some());
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/fetchnotes")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_skips_invalid_origins_and_keeps_valid_ones() {
    let config = ServerConfig {
        cors_origins: vec!["not a valid\norigin".to_string(), "http://localhost:3000".to_string()],
        ..ServerConfig::default()
    };
    let app = create_api_router(Arc::new(InMemoryNoteRepository::new()), &config);
    let request = Request::builder()
        .method(Method::GET)
        .uri("/fetchnotes")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_update_accepts_only_complete_text(
        title in prop::option::of("[a-z ]{0,6}"),
        tagline in prop::option::of("[a-z ]{0,6}"),
        body in prop::option::of("[a-z ]{0,6}"),
    ) {
        let complete = [&title, &tagline, &body]
            .iter()
            .all(|f| f.as_deref().map_or(false, |s| !s.is_empty()));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let status = runtime.block_on(async {
            let app = app_with(seeded());
            let mut payload = serde_json::Map::new();
            if let Some(t) = &title { payload.insert("title".into(), json!(t)); }
            if let Some(t) = &tagline { payload.insert("tagline".into(), json!(t)); }
            if let Some(b) = &body { payload.insert("body".into(), json!(b)); }
            send(&app, Method::PUT, "/updatenotes/a", Some(Value::Object(payload))).await.0
        });

        if complete {
            prop_assert_eq!(status, StatusCode::OK);
        } else {
            prop_assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}

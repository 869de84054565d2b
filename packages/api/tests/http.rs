//! Router-level tests against the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use notely_api::auth::{HasherConfig, PasswordHasher, TokenIssuer};
use notely_api::{router, AppState, AuthService, NoteService};
use serde_json::{json, Value};
use store::MemoryStore;
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let hasher = PasswordHasher::new(&HasherConfig {
        m_cost: 8,
        t_cost: 1,
        p_cost: 1,
    })
    .unwrap();
    let tokens = TokenIssuer::new(b"integration-secret", Duration::days(30));

    let auth = AuthService::new(store.clone(), hasher, tokens);
    let notes = NoteService::new(store);
    router(AppState::new(auth, notes))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn signup(app: &Router, name: &str, email: &str, password: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (body["token"].as_str().unwrap().to_string(), body["user"].clone())
}

async fn create_note(app: &Router, token: &str, title: &str, content: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/notes",
        Some(token),
        Some(json!({ "title": title, "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn test_full_note_lifecycle() {
    let app = app();
    let (_, user) = signup(&app, "Ana", "ana@x.com", "pw123").await;
    assert_eq!(user["name"], "Ana");
    assert!(user.get("passwordHash").is_none());

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["id"], user["id"]);
    let token = login["token"].as_str().unwrap();

    let note = create_note(&app, token, "Groceries", "Milk, eggs").await;
    assert_eq!(note["user"], user["id"]);

    let (status, list) = send(&app, Method::GET, "/api/v1/notes", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().contains(&note));

    let uri = format!("/api/v1/notes/{}", note["id"].as_str().unwrap());
    let (status, deleted) = send(&app, Method::DELETE, &uri, Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "id": note["id"] }));

    let (_, list) = send(&app, Method::GET, "/api/v1/notes", Some(token), None).await;
    assert!(!list.as_array().unwrap().contains(&note));

    let (status, _) = send(&app, Method::GET, &uri, Some(token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_me() {
    let app = app();
    let (token, user) = signup(&app, "Ana", "ana@x.com", "pw123").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], user);

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_duplicate_signup_is_bad_request() {
    let app = app();
    signup(&app, "Ana", "ana@x.com", "pw123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "name": "Ana", "email": "ana@x.com", "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn test_signup_missing_fields_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "email": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_login_is_unauthorized() {
    let app = app();
    signup(&app, "Ana", "ana@x.com", "pw123").await;

    for (email, password) in [("ana@x.com", "wrong"), ("nobody@x.com", "pw123")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_notes_require_valid_token() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/v1/notes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/notes", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A token from a server with a different secret.
    let foreign = TokenIssuer::new(b"someone-else", Duration::days(1))
        .issue(uuid::Uuid::new_v4())
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/v1/notes", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/notes")
        .header(AUTHORIZATION, "Basic YW5hOnB3MTIz")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_users_note_is_untouchable() {
    let app = app();
    let (ana, _) = signup(&app, "Ana", "ana@x.com", "pw123").await;
    let (bob, _) = signup(&app, "Bob", "bob@x.com", "pw456").await;

    let note = create_note(&app, &ana, "Private", "Secret").await;
    let uri = format!("/api/v1/notes/{}", note["id"].as_str().unwrap());

    let (_, list) = send(&app, Method::GET, "/api/v1/notes", Some(&bob), None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&bob),
        Some(json!({ "title": "Hacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not authorized");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, fetched) = send(&app, Method::GET, &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, note);
}

#[tokio::test]
async fn test_update_note() {
    let app = app();
    let (token, _) = signup(&app, "Ana", "ana@x.com", "pw123").await;
    let note = create_note(&app, &token, "Old title", "Body").await;
    let uri = format!("/api/v1/notes/{}", note["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "title": "New title" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "New title");
    assert_eq!(updated["content"], "Body");
    assert_eq!(updated["createdAt"], note["createdAt"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "title": "x".repeat(51) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_long_title_is_rejected() {
    let app = app();
    let (token, _) = signup(&app, "Ana", "ana@x.com", "pw123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/notes",
        Some(&token),
        Some(json!({ "title": "x".repeat(51), "content": "Body" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title cannot be more than 50 characters");

    let (_, list) = send(&app, Method::GET, "/api/v1/notes", Some(&token), None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_or_malformed_note_id_is_not_found() {
    let app = app();
    let (token, _) = signup(&app, "Ana", "ana@x.com", "pw123").await;

    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let uri = format!("/api/v1/notes/{}", id);
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Note not found");
    }
}

#[tokio::test]
async fn test_list_with_search_and_sort() {
    let app = app();
    let (token, _) = signup(&app, "Ana", "ana@x.com", "pw123").await;
    create_note(&app, &token, "Groceries", "Milk, eggs").await;
    create_note(&app, &token, "Travel", "Lisbon").await;

    let (status, list) = send(
        &app,
        Method::GET,
        "/api/v1/notes?q=MILK&sort=oldest",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Groceries");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/notes?sort=sideways",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v2/whatever", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Route not found" }));
}

#[tokio::test]
async fn test_wrong_method_is_unknown_route() {
    let app = app();
    for (method, uri) in [
        (Method::PATCH, "/api/v1/notes"),
        (Method::DELETE, "/api/v1/notes"),
        (Method::GET, "/api/v1/auth/signup"),
    ] {
        let (status, body) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Route not found" }));
    }
}

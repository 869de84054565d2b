//! # HTTP routes
//!
//! Thin axum handlers over [`AuthService`] and [`NoteService`]. Protected
//! routes take an [`AuthUser`], which reads `Authorization: Bearer <token>`
//! and verifies it before the handler runs.
//!
//! Body and query rejections are answered as [`ApiError::Validation`], so
//! every error leaves the server as `{"message": ...}`. A note id that is not
//! a UUID cannot name an existing note and is answered with 404.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use store::{Note, UserInfo};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{AuthResponse, AuthService, LoginRequest, SignupRequest};
use crate::error::ApiError;
use crate::notes::{DeletedNote, NewNote, NotePatch, NoteQuery, NoteService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub notes: NoteService,
}

impl AppState {
    pub fn new(auth: AuthService, notes: NoteService) -> Self {
        Self { auth, notes }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/notes", get(list_notes).post(create_note))
        .route(
            "/api/v1/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The id of the user a valid bearer token was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::InvalidToken)?;

        state.auth.authenticate(token).map(AuthUser)
    }
}

#[derive(serde::Serialize)]
struct MeResponse {
    user: UserInfo,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

fn note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = body(payload)?;
    Ok(Json(state.auth.signup(request).await?))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = body(payload)?;
    Ok(Json(state.auth.login(request).await?))
}

async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state.auth.current_user(user_id).await?;
    Ok(Json(MeResponse { user }))
}

async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<NoteQuery>, QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let notes = if query.is_empty() {
        state.notes.list(user_id).await?
    } else {
        state.notes.search(user_id, &query).await?
    };
    Ok(Json(notes))
}

async fn get_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.get(user_id, note_id(&id)?).await?))
}

async fn create_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let new_note = body(payload)?;
    Ok(Json(state.notes.create(user_id, new_note).await?))
}

async fn update_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<NotePatch>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = note_id(&id)?;
    let patch = body(payload)?;
    Ok(Json(state.notes.update(user_id, id, patch).await?))
}

async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedNote>, ApiError> {
    Ok(Json(state.notes.delete(user_id, note_id(&id)?).await?))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}

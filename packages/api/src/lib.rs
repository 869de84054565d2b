//! # API crate: auth, notes and the HTTP surface of Notely
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing, HS256 session tokens, and the [`AuthService`] (signup, login, token authentication) |
//! | [`notes`] | The [`NoteService`]: per-user CRUD with ownership checks, plus optional search/sort |
//! | [`error`] | [`ApiError`], the tagged error kind every service returns, and its HTTP status mapping |
//! | [`routes`] | The axum [`router`] and the bearer-token extractor |
//!
//! ## Endpoints
//!
//! - **Auth**: `POST /api/v1/auth/signup`, `POST /api/v1/auth/login`, `GET /api/v1/auth/me`
//! - **Notes**: `GET|POST /api/v1/notes`, `GET|PUT|DELETE /api/v1/notes/{id}`
//!
//! Services receive their store handles, hasher and token issuer through their
//! constructors; the binary builds them from its settings.

pub mod auth;
pub mod error;
pub mod notes;
pub mod routes;

pub use auth::{AuthService, HasherConfig, PasswordHasher, TokenIssuer};
pub use error::ApiError;
pub use notes::NoteService;
pub use routes::{router, AppState, AuthUser};

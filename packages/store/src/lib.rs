//! # Store crate: persistence for users and notes
//!
//! Everything the services need from a database goes through the two traits
//! defined here, so the same service code runs against Postgres in production
//! and against an in-memory map in tests and local development.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`UserStore`] | Credential store: insert a user, look one up by id or email. |
//! | [`NoteStore`] | Note records: insert, fetch by id, list by owner, update, delete. |
//! | [`MemoryStore`] | `Arc<Mutex<HashMap>>` implementation of both traits. |
//! | [`PgStore`] | SQLx/Postgres implementation of both traits (feature `postgres`). |
//! | [`models`] | [`User`], [`UserInfo`] and [`Note`] records. |
//!
//! Every operation is a single-record read or write. Lookups by id never filter
//! on the owner: ownership decisions belong to the caller.

use async_trait::async_trait;
use uuid::Uuid;

pub mod error;
pub mod models;

mod memory;
pub use memory::MemoryStore;

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

pub use error::StoreError;
pub use models::{Note, User, UserInfo};

/// Persisted user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Look up a user by their normalized (trimmed, lowercased) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Persisted notes, each owned by exactly one user.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn insert_note(&self, note: &Note) -> Result<(), StoreError>;

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError>;

    /// All notes owned by `user_id`, in whatever order the backend returns them.
    async fn list_notes(&self, user_id: Uuid) -> Result<Vec<Note>, StoreError>;

    /// Overwrite title and content of an existing note.
    ///
    /// Returns the stored note, or `None` if it no longer exists.
    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, StoreError>;

    /// Remove a note. Returns `false` if there was nothing to remove.
    async fn delete_note(&self, id: Uuid) -> Result<bool, StoreError>;
}

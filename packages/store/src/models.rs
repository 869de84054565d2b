//! # Records for users and notes
//!
//! ## [`User`]
//!
//! The complete `users` row: id, display name, email, Argon2 PHC hash and
//! creation time. It is never updated after signup. [`User::to_info`] projects
//! it into [`UserInfo`], the client-safe form that omits the password hash.
//!
//! ## [`Note`]
//!
//! A `notes` row. The owner (`user_id`) and `created_at` are fixed when the
//! note is created; only `title` and `content` change afterwards. Serialized
//! with camelCase keys and the owner under `user`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full user record, including the password hash.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user record with a new id and the current time.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A note owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a fresh note for `user_id` with a new id and the current time.
    pub fn new(user_id: Uuid, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            user_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

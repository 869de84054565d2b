//! # Note service: per-user CRUD with ownership checks
//!
//! Every operation takes the id of the authenticated caller. Reads and writes
//! of a single note always load it by id first and then compare its owner to
//! the caller, so a missing note ([`ApiError::NotFound`]) and somebody else's
//! note ([`ApiError::Forbidden`]) stay distinguishable.
//!
//! Titles are trimmed and limited to [`MAX_TITLE_CHARS`] characters; content
//! must not be blank. The same rules apply to create and update.

mod query;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use store::{Note, NoteStore};
use uuid::Uuid;

use crate::error::ApiError;

pub use query::{NoteQuery, SortOrder};

pub const MAX_TITLE_CHARS: usize = 50;

/// Body of `POST /api/v1/notes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `PUT /api/v1/notes/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Response of `DELETE /api/v1/notes/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletedNote {
    pub id: Uuid,
}

fn validate_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Please add a title"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(format!(
            "Title cannot be more than {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("Please add content"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// All notes owned by `user_id`, in store order.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Note>, ApiError> {
        Ok(self.notes.list_notes(user_id).await?)
    }

    /// The caller's notes, filtered and ordered by `query`.
    pub async fn search(&self, user_id: Uuid, query: &NoteQuery) -> Result<Vec<Note>, ApiError> {
        let notes = self.list(user_id).await?;
        Ok(query.apply(notes))
    }

    pub async fn get(&self, user_id: Uuid, note_id: Uuid) -> Result<Note, ApiError> {
        self.load_owned(user_id, note_id).await
    }

    pub async fn create(&self, user_id: Uuid, new_note: NewNote) -> Result<Note, ApiError> {
        let title = validate_title(&new_note.title)?;
        validate_content(&new_note.content)?;

        let note = Note::new(user_id, title, new_note.content);
        self.notes.insert_note(&note).await?;
        tracing::debug!(note_id = %note.id, user_id = %user_id, "note created");
        Ok(note)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        patch: NotePatch,
    ) -> Result<Note, ApiError> {
        let existing = self.load_owned(user_id, note_id).await?;

        let title = match patch.title.as_deref() {
            Some(title) => validate_title(title)?,
            None => existing.title,
        };
        let content = match patch.content {
            Some(content) => {
                validate_content(&content)?;
                content
            }
            None => existing.content,
        };

        // Deleted between the ownership check and the write.
        self.notes
            .update_note(note_id, &title, &content)
            .await?
            .ok_or(ApiError::NotFound)
    }

    pub async fn delete(&self, user_id: Uuid, note_id: Uuid) -> Result<DeletedNote, ApiError> {
        self.load_owned(user_id, note_id).await?;

        if !self.notes.delete_note(note_id).await? {
            return Err(ApiError::NotFound);
        }
        tracing::debug!(note_id = %note_id, user_id = %user_id, "note deleted");
        Ok(DeletedNote { id: note_id })
    }

    async fn load_owned(&self, user_id: Uuid, note_id: Uuid) -> Result<Note, ApiError> {
        let note = self
            .notes
            .find_note(note_id)
            .await?
            .ok_or(ApiError::NotFound)?;

        if !note.is_owned_by(user_id) {
            tracing::warn!(note_id = %note_id, user_id = %user_id, "note access denied");
            return Err(ApiError::Forbidden);
        }
        Ok(note)
    }
}

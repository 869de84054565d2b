//! Optional search and ordering for note listings.
//!
//! Applied to the caller's own notes only; the result is always a subset of
//! its input, possibly reordered.

use serde::Deserialize;
use store::Note;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Query string of `GET /api/v1/notes`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NoteQuery {
    /// Case-insensitive substring matched against title and content.
    pub q: Option<String>,
    pub sort: Option<SortOrder>,
}

impl NoteQuery {
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none() && self.sort.is_none()
    }

    fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn apply(&self, mut notes: Vec<Note>) -> Vec<Note> {
        if let Some(term) = self.search_term() {
            notes.retain(|note| {
                note.title.to_lowercase().contains(&term)
                    || note.content.to_lowercase().contains(&term)
            });
        }

        match self.sort {
            Some(SortOrder::Newest) => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Some(SortOrder::Oldest) => notes.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            None => {}
        }
        notes
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Note, User};
use crate::{NoteStore, UserStore};

/// In-memory store for testing and local development.
///
/// Clones share the same underlying maps.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    notes: Arc<Mutex<HashMap<Uuid, Note>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A panic while holding the lock cannot leave a record half-written, so a
// poisoned map is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = lock(&self.users);
        if users.values().any(|u| u.email == user.email) || users.contains_key(&user.id) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users).get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn insert_note(&self, note: &Note) -> Result<(), StoreError> {
        let mut notes = lock(&self.notes);
        if notes.contains_key(&note.id) {
            return Err(StoreError::Conflict);
        }
        notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        Ok(lock(&self.notes).get(&id).cloned())
    }

    async fn list_notes(&self, user_id: Uuid) -> Result<Vec<Note>, StoreError> {
        Ok(lock(&self.notes)
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, StoreError> {
        let mut notes = lock(&self.notes);
        let Some(note) = notes.get_mut(&id) else {
            return Ok(None);
        };
        note.title = title.to_string();
        note.content = content.to_string();
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(lock(&self.notes).remove(&id).is_some())
    }
}

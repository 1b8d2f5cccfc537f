//! Session store: class sessions in creation order.

use serde::{Deserialize, Serialize};

use roomhub_core::error::AppError;
use roomhub_core::result::AppResult;
use roomhub_core::types::id::{ClassId, RoomId};
use roomhub_entity::class::ClassSession;

/// Holds every class session, oldest first.
///
/// Insertion order is preserved so conflict reports list clashing
/// sessions in the order they were created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionStore {
    /// Sessions in creation order.
    sessions: Vec<ClassSession>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted sessions.
    pub fn from_sessions(sessions: Vec<ClassSession>) -> AppResult<Self> {
        let mut store = Self::new();
        for session in sessions {
            store.insert(session)?;
        }
        Ok(store)
    }

    /// Append a session.
    pub fn insert(&mut self, session: ClassSession) -> AppResult<()> {
        if self.contains(&session.id) {
            return Err(AppError::duplicate(format!(
                "Class '{}' already exists",
                session.id
            )));
        }
        self.sessions.push(session);
        Ok(())
    }

    /// Whether a session with this id exists.
    pub fn contains(&self, id: &ClassId) -> bool {
        self.sessions.iter().any(|s| s.id == *id)
    }

    /// Look up a session.
    pub fn get(&self, id: &ClassId) -> AppResult<&ClassSession> {
        self.sessions
            .iter()
            .find(|s| s.id == *id)
            .ok_or_else(|| not_found(id))
    }

    /// Look up a session for modification.
    pub fn get_mut(&mut self, id: &ClassId) -> AppResult<&mut ClassSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or_else(|| not_found(id))
    }

    /// Remove a session, returning it.
    pub fn remove(&mut self, id: &ClassId) -> AppResult<ClassSession> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == *id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.sessions.remove(index))
    }

    /// All sessions, oldest first.
    pub fn list(&self) -> &[ClassSession] {
        &self.sessions
    }

    /// Sessions assigned to `room_id`, oldest first.
    pub fn for_room<'a>(&'a self, room_id: &'a RoomId) -> impl Iterator<Item = &'a ClassSession> {
        self.sessions.iter().filter(move |s| s.is_in(room_id))
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn not_found(id: &ClassId) -> AppError {
    AppError::not_found(format!("Class '{id}' not found"))
}

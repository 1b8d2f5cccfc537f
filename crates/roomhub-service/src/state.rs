//! Mutable scheduler state and its persisted form.

use roomhub_core::error::AppError;
use roomhub_core::result::AppResult;
use roomhub_entity::snapshot::{SNAPSHOT_VERSION, StoreSnapshot};

use crate::registry::RoomRegistry;
use crate::sessions::SessionStore;

/// Rooms and sessions together.
///
/// Cheap enough to clone that every mutation runs against a draft copy
/// and only replaces the live state after the draft was persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerState {
    /// Room inventory.
    pub registry: RoomRegistry,
    /// Class sessions in creation order.
    pub sessions: SessionStore,
}

impl SchedulerState {
    /// Rebuild the state from a persisted snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> AppResult<Self> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(AppError::storage(format!(
                "Snapshot version {} is newer than supported version {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        let registry = RoomRegistry::from_rooms(snapshot.rooms)?;
        let sessions = SessionStore::from_sessions(snapshot.classes)?;
        for session in sessions.list() {
            if let Some(room_id) = &session.room_id {
                if !registry.contains(room_id) {
                    return Err(AppError::storage(format!(
                        "Class '{}' references unknown room '{room_id}'",
                        session.id
                    )));
                }
            }
        }
        Ok(Self { registry, sessions })
    }

    /// Capture the state for persistence.
    pub fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(
            self.registry.all().cloned().collect(),
            self.sessions.list().to_vec(),
        )
    }
}

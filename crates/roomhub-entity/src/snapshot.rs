//! Persisted shape of the whole scheduler state.

use serde::{Deserialize, Serialize};

use crate::class::ClassSession;
use crate::room::Room;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Rooms and class sessions as written by a snapshot store.
///
/// Classes are kept in creation order; conflict reports rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Room inventory.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Class sessions, oldest first.
    #[serde(default)]
    pub classes: Vec<ClassSession>,
}

impl StoreSnapshot {
    /// Build a snapshot at the current format version.
    pub fn new(rooms: Vec<Room>, classes: Vec<ClassSession>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            rooms,
            classes,
        }
    }
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

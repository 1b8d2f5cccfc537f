//! Room entity model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use roomhub_core::types::id::RoomId;

use super::status::RoomStatus;

/// Categorical room type (e.g. `lab`, `standard`, `auditorium`).
///
/// Stored lowercase and trimmed so that `"Standard"` and `"standard"`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoomType(String);

impl RoomType {
    /// Create a normalized room type.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_lowercase())
    }

    /// Return the type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RoomType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for RoomType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<RoomType> for String {
    fn from(value: RoomType) -> Self {
        value.0
    }
}

/// A physical room that class sessions can be booked into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Stable room key.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Room category.
    pub room_type: RoomType,
    /// Seats available.
    pub capacity: u32,
    /// Current status, maintained by the allocation engine.
    #[serde(default = "default_status")]
    pub status: RoomStatus,
    /// Single dates on which the room cannot host any session.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub blocked_dates: BTreeSet<NaiveDate>,
}

impl Room {
    /// Whether the room is administratively blocked.
    pub fn is_blocked(&self) -> bool {
        self.status == RoomStatus::Blocked
    }

    /// Whether the room is closed on the given date.
    pub fn is_blocked_on(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    /// Whether the room can seat `students` and has the requested type.
    pub fn fits(&self, students: u32, room_type: Option<&RoomType>) -> bool {
        self.capacity >= students && room_type.is_none_or(|t| *t == self.room_type)
    }
}

fn default_status() -> RoomStatus {
    RoomStatus::Available
}

/// Data required to register a new room.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRoom {
    /// Stable room key.
    pub id: RoomId,
    /// Display name.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Room category.
    pub room_type: RoomType,
    /// Seats available.
    #[validate(range(min = 1))]
    pub capacity: u32,
}

impl NewRoom {
    /// Convert into an available room.
    pub fn into_room(self) -> Room {
        Room {
            id: self.id,
            name: self.name,
            room_type: self.room_type,
            capacity: self.capacity,
            status: RoomStatus::Available,
            blocked_dates: BTreeSet::new(),
        }
    }
}

/// Partial update of a room's descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoomUpdate {
    /// New display name.
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// New room category.
    pub room_type: Option<RoomType>,
    /// New capacity.
    #[validate(range(min = 1))]
    pub capacity: Option<u32>,
}

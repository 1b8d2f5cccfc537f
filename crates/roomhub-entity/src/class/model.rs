//! Class session ("turma") entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use roomhub_core::types::id::{ClassId, RoomId};

use super::schedule::ClassSchedule;
use crate::room::RoomType;

/// Confirmation state of a session's booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingState {
    /// Held ahead of confirmation.
    Reserved,
    /// Active, conflict-validated booking.
    #[default]
    Confirmed,
}

impl BookingState {
    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence a session gave up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasedSlot {
    /// The calendar date released.
    pub date: NaiveDate,
    /// Why the occurrence was released.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A recurring class booked (or waiting to be booked) into a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    /// Unique class identifier.
    pub id: ClassId,
    /// Display name.
    pub name: String,
    /// Assigned room, once allocated.
    pub room_id: Option<RoomId>,
    /// Number of students; the room must seat at least this many.
    pub student_count: u32,
    /// Required room category, if any.
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// Weekly recurrence.
    pub schedule: ClassSchedule,
    /// Whether the booking is confirmed or only held.
    #[serde(default)]
    pub booking: BookingState,
    /// Occurrences that no longer occupy the room.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub released: Vec<ReleasedSlot>,
    /// When the session was registered.
    pub created_at: DateTime<Utc>,
}

impl ClassSession {
    /// Whether the occurrence on `date` was released.
    pub fn is_released(&self, date: NaiveDate) -> bool {
        self.released.iter().any(|slot| slot.date == date)
    }

    /// Whether the booking is confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.booking == BookingState::Confirmed
    }

    /// Whether the session is booked into `room_id`.
    pub fn is_in(&self, room_id: &RoomId) -> bool {
        self.room_id.as_ref() == Some(room_id)
    }
}

/// Data required to register a class session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewClassSession {
    /// Display name.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Number of students.
    #[validate(range(min = 1))]
    pub student_count: u32,
    /// Required room category, if any.
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// Weekly recurrence.
    pub schedule: ClassSchedule,
    /// Room explicitly asked for, if any.
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

impl NewClassSession {
    /// Build the stored session, booked into `room_id` with the given state.
    pub fn into_session(
        self,
        room_id: RoomId,
        schedule: ClassSchedule,
        booking: BookingState,
    ) -> ClassSession {
        ClassSession {
            id: ClassId::new(),
            name: self.name,
            room_id: Some(room_id),
            student_count: self.student_count,
            room_type: self.room_type,
            schedule,
            booking,
            released: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Partial update of an existing class session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClassUpdate {
    /// New display name.
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// New recurrence.
    pub schedule: Option<ClassSchedule>,
    /// New student count.
    #[validate(range(min = 1))]
    pub student_count: Option<u32>,
    /// Move to this room.
    pub room_id: Option<RoomId>,
}

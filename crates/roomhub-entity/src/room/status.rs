//! Room status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Occupancy status of a room.
///
/// `Available`, `Reserved`, and `Occupied` are derived from the sessions
/// booked into the room; `Blocked` is an administrative override that
/// pre-empts all allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// No session is assigned to the room.
    Available,
    /// Only pending (unconfirmed) reservations hold the room.
    Reserved,
    /// At least one confirmed session is booked into the room.
    Occupied,
    /// Taken out of service by an administrator.
    Blocked,
}

impl RoomStatus {
    /// All statuses in listing priority order.
    pub const ALL: [RoomStatus; 4] = [
        RoomStatus::Available,
        RoomStatus::Reserved,
        RoomStatus::Occupied,
        RoomStatus::Blocked,
    ];

    /// Listing priority (lower sorts first).
    pub fn priority(&self) -> u8 {
        match self {
            Self::Available => 0,
            Self::Reserved => 1,
            Self::Occupied => 2,
            Self::Blocked => 3,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = roomhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            "blocked" => Ok(Self::Blocked),
            _ => Err(roomhub_core::AppError::validation(format!(
                "Invalid room status: '{s}'. Expected one of: available, reserved, occupied, blocked"
            ))),
        }
    }
}

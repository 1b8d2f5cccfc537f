//! Default room inventory installed on first start.

use roomhub_core::result::AppResult;
use roomhub_core::types::id::RoomId;
use roomhub_entity::room::NewRoom;

/// `(id, name, type, capacity)` for each default room.
const DEFAULT_ROOMS: &[(&str, &str, &str, u32)] = &[
    ("lab-1", "Computer Lab 1", "computer-lab", 18),
    ("lab-2", "Computer Lab 2", "computer-lab", 20),
    ("lab-3", "Computer Lab 3", "computer-lab", 40),
    ("room-4", "Experimental Room 4", "experimental", 45),
    ("lab-5", "Computer Lab 5", "computer-lab", 35),
    ("lab-6", "Computer Lab 6", "computer-lab", 28),
    ("lab-7", "Health Lab", "health-lab", 30),
    ("lab-8", "Wellness Lab", "wellness-lab", 30),
    ("lab-9", "Beauty Lab", "beauty-lab", 30),
    ("room-10", "Room 10", "standard", 32),
    ("room-11", "Room 11", "standard", 32),
    ("room-12", "Room 12", "standard", 32),
    ("room-13", "Room 13", "standard", 32),
    ("room-14", "Theater Room", "theater", 35),
    ("room-15", "Fashion Studio", "fashion", 35),
    ("room-16", "Room 16", "standard", 32),
    ("room-17", "Room 17", "standard", 32),
    ("room-18", "Room 18", "standard", 32),
    ("room-19", "Room 19", "standard", 32),
    ("room-20", "Room 20", "standard", 32),
    ("library", "Library", "experimental", 45),
];

/// The default inventory as registration requests.
pub fn default_rooms() -> AppResult<Vec<NewRoom>> {
    DEFAULT_ROOMS
        .iter()
        .map(|(id, name, room_type, capacity)| {
            Ok(NewRoom {
                id: RoomId::new(id)?,
                name: (*name).to_string(),
                room_type: (*room_type).into(),
                capacity: *capacity,
            })
        })
        .collect()
}

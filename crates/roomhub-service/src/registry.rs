//! Room registry: the room inventory keyed by room id.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use roomhub_core::error::AppError;
use roomhub_core::result::AppResult;
use roomhub_core::types::id::RoomId;
use roomhub_entity::room::{NewRoom, Room, RoomStatus, RoomType, RoomUpdate};

/// Optional filters for [`RoomRegistry::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFilter {
    /// Only rooms of this type.
    pub room_type: Option<RoomType>,
    /// Only rooms in this status.
    pub status: Option<RoomStatus>,
    /// Only rooms holding at least this many students.
    pub min_capacity: Option<u32>,
}

impl RoomFilter {
    fn matches(&self, room: &Room) -> bool {
        self.room_type.as_ref().is_none_or(|t| *t == room.room_type)
            && self.status.is_none_or(|s| s == room.status)
            && self.min_capacity.is_none_or(|c| room.capacity >= c)
    }
}

/// The room inventory.
///
/// Room ids are unique. Statuses are written only through
/// [`RoomRegistry::set_status`], which the allocation engine calls after
/// each change to a room's sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, Room>,
}

impl RoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from previously persisted rooms.
    pub fn from_rooms(rooms: Vec<Room>) -> AppResult<Self> {
        let mut registry = Self::new();
        for room in rooms {
            registry.insert(room)?;
        }
        Ok(registry)
    }

    /// Validate and add a new room.
    pub fn register(&mut self, request: NewRoom) -> AppResult<&Room> {
        request.validate()?;
        let id = request.id.clone();
        self.insert(request.into_room())?;
        debug!(room_id = %id, "Registered room");
        self.get(&id)
    }

    fn insert(&mut self, room: Room) -> AppResult<()> {
        if self.rooms.contains_key(&room.id) {
            return Err(AppError::duplicate(format!(
                "Room '{}' already exists",
                room.id
            )));
        }
        self.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    /// Look up a room.
    pub fn get(&self, id: &RoomId) -> AppResult<&Room> {
        self.rooms.get(id).ok_or_else(|| not_found(id))
    }

    /// Whether the room exists.
    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    /// Rooms matching `filter`, ordered by status priority
    /// (available, reserved, occupied, blocked) and then by id.
    pub fn list(&self, filter: &RoomFilter) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().filter(|r| filter.matches(r)).collect();
        rooms.sort_by(|a, b| {
            a.status
                .priority()
                .cmp(&b.status.priority())
                .then_with(|| a.id.cmp(&b.id))
        });
        rooms
    }

    /// Rooms matching `filter` grouped by status, each group ordered by id.
    ///
    /// All four statuses are present, possibly with empty groups.
    pub fn list_grouped(&self, filter: &RoomFilter) -> BTreeMap<RoomStatus, Vec<&Room>> {
        let mut groups: BTreeMap<RoomStatus, Vec<&Room>> =
            RoomStatus::ALL.iter().map(|s| (*s, Vec::new())).collect();
        for room in self.rooms.values().filter(|r| filter.matches(r)) {
            groups.entry(room.status).or_default().push(room);
        }
        groups
    }

    /// All rooms in id order.
    pub fn all(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Overwrite a room's status.
    pub fn set_status(&mut self, id: &RoomId, status: RoomStatus) -> AppResult<()> {
        let room = self.rooms.get_mut(id).ok_or_else(|| not_found(id))?;
        if room.status != status {
            debug!(room_id = %id, from = %room.status, to = %status, "Room status changed");
            room.status = status;
        }
        Ok(())
    }

    /// Apply a partial update to a room's descriptive fields.
    pub fn update(&mut self, id: &RoomId, update: RoomUpdate) -> AppResult<&Room> {
        update.validate()?;
        let room = self.rooms.get_mut(id).ok_or_else(|| not_found(id))?;
        if let Some(name) = update.name {
            room.name = name;
        }
        if let Some(room_type) = update.room_type {
            room.room_type = room_type;
        }
        if let Some(capacity) = update.capacity {
            room.capacity = capacity;
        }
        Ok(room)
    }

    /// Close the room on the given dates.
    pub fn block_dates(&mut self, id: &RoomId, dates: &BTreeSet<NaiveDate>) -> AppResult<&Room> {
        let room = self.rooms.get_mut(id).ok_or_else(|| not_found(id))?;
        room.blocked_dates.extend(dates.iter().copied());
        Ok(room)
    }

    /// Reopen the room on the given dates. Dates that were not closed are ignored.
    pub fn unblock_dates(&mut self, id: &RoomId, dates: &BTreeSet<NaiveDate>) -> AppResult<&Room> {
        let room = self.rooms.get_mut(id).ok_or_else(|| not_found(id))?;
        room.blocked_dates.retain(|d| !dates.contains(d));
        Ok(room)
    }

    /// Remove a room from the inventory.
    pub fn remove(&mut self, id: &RoomId) -> AppResult<Room> {
        self.rooms.remove(id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &RoomId) -> AppError {
    AppError::not_found(format!("Room '{id}' not found"))
}

//! # roomhub-entity
//!
//! Domain entity models for RoomHub. Every struct in this crate is either a
//! persisted record (rooms, class sessions, the store snapshot) or a request
//! value object validated at the service boundary. All entities derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod class;
pub mod room;
pub mod snapshot;

pub use class::{
    BookingState, ClassSchedule, ClassSession, ClassUpdate, DayOfWeek, NewClassSession, Period,
    ReleasedSlot,
};
pub use room::{NewRoom, Room, RoomStatus, RoomType, RoomUpdate};
pub use snapshot::StoreSnapshot;

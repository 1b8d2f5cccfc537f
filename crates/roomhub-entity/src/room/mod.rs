//! Room domain entities.

pub mod model;
pub mod status;

pub use model::{NewRoom, Room, RoomType, RoomUpdate};
pub use status::RoomStatus;

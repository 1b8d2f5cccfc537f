//! Room status derivation.

use roomhub_core::result::AppResult;
use roomhub_core::types::id::RoomId;
use roomhub_entity::room::RoomStatus;

use crate::sessions::SessionStore;
use crate::state::SchedulerState;

/// Status implied by the sessions booked into a room, ignoring any block.
pub fn derive_status(sessions: &SessionStore, room_id: &RoomId) -> RoomStatus {
    let mut status = RoomStatus::Available;
    for session in sessions.for_room(room_id) {
        if session.is_confirmed() {
            return RoomStatus::Occupied;
        }
        status = RoomStatus::Reserved;
    }
    status
}

/// Recompute a room's status after its sessions changed.
///
/// A blocked room stays blocked.
pub(crate) fn refresh_status(
    state: &mut SchedulerState,
    room_id: &RoomId,
) -> AppResult<RoomStatus> {
    let current = state.registry.get(room_id)?.status;
    if current == RoomStatus::Blocked {
        return Ok(current);
    }
    let status = derive_status(&state.sessions, room_id);
    state.registry.set_status(room_id, status)?;
    Ok(status)
}

/// Lift a block and restore the booking-derived status.
pub(crate) fn clear_block(state: &mut SchedulerState, room_id: &RoomId) -> AppResult<RoomStatus> {
    let status = derive_status(&state.sessions, room_id);
    state.registry.set_status(room_id, status)?;
    Ok(status)
}

//! The allocation engine: every decision that places, moves, or frees a
//! class, and every room status change.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use tracing::debug;
use validator::Validate;

use roomhub_core::config::allocation::AllocationConfig;
use roomhub_core::error::{AppError, ErrorDetail};
use roomhub_core::result::AppResult;
use roomhub_core::types::id::{ClassId, RoomId};
use roomhub_entity::class::{
    BookingState, ClassSchedule, ClassSession, ClassUpdate, DayOfWeek, NewClassSession,
    ReleasedSlot,
};
use roomhub_entity::room::{NewRoom, Room, RoomStatus, RoomType, RoomUpdate};

use super::proposal::{
    AllocationOutcome, Displacement, Proposal, ProposalReason, Relocation,
};
use super::status::{clear_block, refresh_status};
use crate::conflict::{Conflict, ConflictDetector};
use crate::interval::{ScheduleInterval, shift_schedule};
use crate::state::SchedulerState;

/// Outcome of checking one room against an interval.
#[derive(Debug)]
enum RoomCheck {
    /// Nothing holds the room.
    Free,
    /// Sessions hold the room on at least one shared occurrence.
    Busy(Vec<Conflict>),
    /// The room is closed on an occurrence.
    Closed(NaiveDate),
}

/// Capacity and type a placement must satisfy.
#[derive(Debug, Clone, Copy)]
struct Need<'a> {
    students: u32,
    room_type: Option<&'a RoomType>,
}

impl<'a> Need<'a> {
    fn of(session: &'a ClassSession) -> Self {
        Self {
            students: session.student_count,
            room_type: session.room_type.as_ref(),
        }
    }

    fn of_request(request: &'a NewClassSession) -> Self {
        Self {
            students: request.student_count,
            room_type: request.room_type.as_ref(),
        }
    }
}

/// Stateless decision logic over a [`SchedulerState`].
///
/// Commands mutate the state they are given. They check everything that
/// can fail before the first write, except [`reserve_displacing`], which
/// works on its own copy; callers that persist should still run commands
/// against a draft.
///
/// [`reserve_displacing`]: AllocationEngine::reserve_displacing
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    /// How many days past the requested start the later-window search scans.
    horizon_days: u32,
}

impl AllocationEngine {
    /// Creates a new allocation engine.
    pub fn new(config: &AllocationConfig) -> Self {
        Self {
            horizon_days: config.horizon_days,
        }
    }

    // ── Placement queries ────────────────────────────────────────────

    /// Find a placement for `request` without changing anything.
    ///
    /// Tries the requested room, then every adequate room at the requested
    /// dates (smallest capacity first), then later start dates up to the
    /// horizon. Fails with `NoAvailability` when all of them are taken.
    pub fn propose(
        &self,
        state: &SchedulerState,
        request: &NewClassSession,
    ) -> AppResult<Proposal> {
        request.validate()?;
        let interval = ScheduleInterval::normalize(&request.schedule)?;
        if !interval.has_occurrence() {
            return Err(AppError::invalid_schedule(format!(
                "'{}' never meets between {} and its end date",
                request.name, request.schedule.start_date
            )));
        }
        let need = Need::of_request(request);

        let proposal =
            |room_id: &RoomId, schedule: ClassSchedule, reason, blocked_by: &[Conflict]| {
                Proposal {
                    request: request.clone(),
                    room_id: room_id.clone(),
                    schedule,
                    reason,
                    blocked_by: blocked_by.iter().map(|c| c.class_id).collect(),
                }
            };

        let mut blocked_by = Vec::new();
        let mut examined = Vec::new();

        if let Some(room_id) = &request.room_id {
            let room = state.registry.get(room_id)?;
            ensure_usable(room, need)?;
            match assess(state, room, &interval, None)? {
                RoomCheck::Free => {
                    return Ok(proposal(
                        room_id,
                        request.schedule.clone(),
                        ProposalReason::RequestedRoom,
                        &[],
                    ));
                }
                RoomCheck::Closed(date) => {
                    let later = self.next_window(state, &[room], &request.schedule)?;
                    let mut err = closed(room, date);
                    if let Some(detail) = err.detail.as_mut() {
                        detail.next_window = later.map(|(_, schedule)| schedule.start_date);
                    }
                    return Err(err);
                }
                RoomCheck::Busy(conflicts) => {
                    debug!(
                        room_id = %room_id,
                        conflicts = conflicts.len(),
                        "Requested room is busy"
                    );
                    blocked_by = conflicts;
                    examined.push(room_id.clone());
                }
            }
        }

        let candidates: Vec<&Room> = candidates(state, need)
            .into_iter()
            .filter(|room| request.room_id.as_ref() != Some(&room.id))
            .collect();

        for room in &candidates {
            match assess(state, room, &interval, None)? {
                RoomCheck::Free => {
                    let reason = if request.room_id.is_some() {
                        ProposalReason::SubstituteRoom
                    } else {
                        ProposalReason::BestFit
                    };
                    debug!(room_id = %room.id, %reason, "Found room at requested dates");
                    return Ok(proposal(&room.id, request.schedule.clone(), reason, &blocked_by));
                }
                RoomCheck::Busy(conflicts) => {
                    if request.room_id.is_none() {
                        blocked_by.extend(conflicts);
                    }
                    examined.push(room.id.clone());
                }
                RoomCheck::Closed(_) => examined.push(room.id.clone()),
            }
        }

        let search: Vec<&Room> = match &request.room_id {
            Some(room_id) => vec![state.registry.get(room_id)?],
            None => candidates,
        };
        if let Some((room_id, schedule)) = self.next_window(state, &search, &request.schedule)? {
            debug!(room_id = %room_id, start = %schedule.start_date, "Found later window");
            return Ok(proposal(&room_id, schedule, ProposalReason::LaterWindow, &blocked_by));
        }

        let mut classes: Vec<ClassId> = Vec::new();
        for conflict in &blocked_by {
            if !classes.contains(&conflict.class_id) {
                classes.push(conflict.class_id);
            }
        }
        Err(AppError::no_availability(format!(
            "No room is free for '{}' within {} days of {}",
            request.name, self.horizon_days, request.schedule.start_date
        ))
        .with_detail(ErrorDetail {
            conflicting_classes: classes,
            rooms: examined,
            conflict_date: blocked_by.iter().map(|c| c.date).min(),
            next_window: None,
        }))
    }

    /// Scan start dates after the requested one for the first free room.
    fn next_window(
        &self,
        state: &SchedulerState,
        rooms: &[&Room],
        schedule: &ClassSchedule,
    ) -> AppResult<Option<(RoomId, ClassSchedule)>> {
        for offset in 1..=u64::from(self.horizon_days) {
            let Some(start) = schedule.start_date.checked_add_days(Days::new(offset)) else {
                break;
            };
            let shifted = shift_schedule(schedule, start);
            let interval = ScheduleInterval::normalize(&shifted)?;
            if !interval.has_occurrence() {
                continue;
            }
            for room in rooms {
                if let RoomCheck::Free = assess(state, room, &interval, None)? {
                    return Ok(Some((room.id.clone(), shifted)));
                }
            }
        }
        Ok(None)
    }

    /// Book the request if the requested room (or, with no room requested,
    /// the best-fit room) is free; otherwise return the suggestion unbooked.
    pub fn allocate(
        &self,
        state: &mut SchedulerState,
        request: NewClassSession,
    ) -> AppResult<AllocationOutcome> {
        let proposal = self.propose(state, &request)?;
        if !proposal.reason.books_directly() {
            return Ok(AllocationOutcome::Suggested { proposal });
        }
        let (class, room) = self.commit(state, proposal, BookingState::Confirmed)?;
        Ok(AllocationOutcome::Booked { class, room })
    }

    /// Book a proposal returned earlier, re-checking it first.
    pub fn confirm(
        &self,
        state: &mut SchedulerState,
        proposal: Proposal,
    ) -> AppResult<(ClassSession, Room)> {
        proposal.request.validate()?;
        self.commit(state, proposal, BookingState::Confirmed)
    }

    fn commit(
        &self,
        state: &mut SchedulerState,
        proposal: Proposal,
        booking: BookingState,
    ) -> AppResult<(ClassSession, Room)> {
        let Proposal {
            request,
            room_id,
            schedule,
            ..
        } = proposal;
        let interval = ScheduleInterval::normalize(&schedule)?;
        require_free(state, &room_id, Need::of_request(&request), &interval, None)?;

        let session = request.into_session(room_id.clone(), schedule, booking);
        state.sessions.insert(session.clone())?;
        refresh_status(state, &room_id)?;
        Ok((session, state.registry.get(&room_id)?.clone()))
    }

    // ── Reservations ─────────────────────────────────────────────────

    /// Hold `room_id` for a class pending confirmation.
    pub fn reserve(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
        room_id: &RoomId,
    ) -> AppResult<Room> {
        let session = state.sessions.get(&class_id)?;
        if session.is_in(room_id) && session.is_confirmed() {
            return Err(AppError::conflict(format!(
                "Class '{}' is already confirmed in room '{room_id}'",
                session.name
            )));
        }
        let interval = ScheduleInterval::of_session(session)?;
        require_free(state, room_id, Need::of(session), &interval, Some(class_id))?;

        let previous = self.place(state, class_id, room_id, Some(BookingState::Reserved))?;
        refresh_rooms(state, previous.as_ref(), room_id)?;
        Ok(state.registry.get(room_id)?.clone())
    }

    /// Reserve `room_id`, moving every clashing occupant to the smallest
    /// adequate free room. Fails without changes if any occupant cannot
    /// be moved.
    pub fn reserve_displacing(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
        room_id: &RoomId,
    ) -> AppResult<Displacement> {
        let mut draft = state.clone();

        let session = draft.sessions.get(&class_id)?.clone();
        let target = draft.registry.get(room_id)?;
        ensure_usable(target, Need::of(&session))?;
        let interval = ScheduleInterval::of_session(&session)?;
        if let RoomCheck::Closed(date) = assess(&draft, target, &interval, Some(class_id))? {
            return Err(closed(target, date));
        }

        let occupants =
            ConflictDetector::find_conflicts(&draft.sessions, room_id, &interval, Some(class_id))?;
        let mut moved = Vec::with_capacity(occupants.len());
        for occupant in &occupants {
            let to = self.rehome(&draft, occupant.class_id, room_id, class_id)?;
            draft.sessions.get_mut(&occupant.class_id)?.room_id = Some(to.clone());
            refresh_status(&mut draft, &to)?;
            debug!(class_id = %occupant.class_id, to = %to, "Moved occupant");
            moved.push(Relocation {
                class_id: occupant.class_id,
                from: room_id.clone(),
                to,
            });
        }

        require_free(&draft, room_id, Need::of(&session), &interval, Some(class_id))?;
        let previous = self.place(&mut draft, class_id, room_id, Some(BookingState::Reserved))?;
        refresh_rooms(&mut draft, previous.as_ref(), room_id)?;

        let displacement = Displacement {
            class: draft.sessions.get(&class_id)?.clone(),
            room: draft.registry.get(room_id)?.clone(),
            moved,
        };
        *state = draft;
        Ok(displacement)
    }

    /// Smallest adequate room, other than `from`, free for `occupant`.
    fn rehome(
        &self,
        state: &SchedulerState,
        occupant: ClassId,
        from: &RoomId,
        incoming: ClassId,
    ) -> AppResult<RoomId> {
        let session = state.sessions.get(&occupant)?;
        let interval = ScheduleInterval::of_session(session)?;
        for room in candidates(state, Need::of(session)) {
            if room.id == *from {
                continue;
            }
            if let RoomCheck::Free = assess(state, room, &interval, Some(occupant))? {
                return Ok(room.id.clone());
            }
        }
        Err(AppError::conflict(format!(
            "Class '{}' in room '{from}' cannot be moved to any other room",
            session.name
        ))
        .with_detail(ErrorDetail {
            conflicting_classes: vec![occupant, incoming],
            rooms: vec![from.clone()],
            ..Default::default()
        }))
    }

    /// Turn a pending reservation into a confirmed booking.
    pub fn confirm_reservation(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
    ) -> AppResult<Room> {
        let session = state.sessions.get(&class_id)?;
        if session.is_confirmed() {
            return Err(AppError::validation(format!(
                "Class '{}' has no pending reservation",
                session.name
            )));
        }
        let room_id = assigned_room(session)?;
        state.sessions.get_mut(&class_id)?.booking = BookingState::Confirmed;
        refresh_status(state, &room_id)?;
        Ok(state.registry.get(&room_id)?.clone())
    }

    // ── Session changes ──────────────────────────────────────────────

    /// Move a class to another room. Returns the vacated room, if any,
    /// and the new room.
    pub fn swap(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
        new_room_id: &RoomId,
    ) -> AppResult<(Option<Room>, Room)> {
        let session = state.sessions.get(&class_id)?;
        let interval = ScheduleInterval::of_session(session)?;
        require_free(state, new_room_id, Need::of(session), &interval, Some(class_id))?;

        let previous = self.place(state, class_id, new_room_id, None)?;
        refresh_rooms(state, previous.as_ref(), new_room_id)?;

        let old = match previous {
            Some(id) => Some(state.registry.get(&id)?.clone()),
            None => None,
        };
        Ok((old, state.registry.get(new_room_id)?.clone()))
    }

    /// Free one occurrence of a class. The room's status is not affected.
    pub fn release(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
        date: NaiveDate,
        reason: Option<String>,
    ) -> AppResult<ClassSession> {
        let session = state.sessions.get_mut(&class_id)?;
        if !session.schedule.covers(date) {
            return Err(AppError::invalid_date(format!(
                "{date} is outside the schedule of '{}'",
                session.name
            )));
        }
        let weekday = DayOfWeek::of(date);
        if !session.schedule.days.contains(&weekday) {
            return Err(AppError::invalid_date(format!(
                "'{}' does not meet on {weekday} ({date})",
                session.name
            )));
        }
        if session.is_released(date) {
            return Err(AppError::invalid_date(format!(
                "{date} is already released for '{}'",
                session.name
            )));
        }
        session.released.push(ReleasedSlot { date, reason });
        session.released.sort_by_key(|slot| slot.date);
        Ok(session.clone())
    }

    /// Change a class's name, schedule, size, or room.
    ///
    /// The result is checked against the target room as a whole, excluding
    /// the class itself. Released dates the new schedule no longer meets on
    /// are dropped.
    pub fn reschedule(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
        update: ClassUpdate,
    ) -> AppResult<ClassSession> {
        update.validate()?;
        let current = state.sessions.get(&class_id)?;
        let previous = current.room_id.clone();

        let mut next = current.clone();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(schedule) = update.schedule {
            next.schedule = schedule;
        }
        if let Some(students) = update.student_count {
            next.student_count = students;
        }
        if let Some(room_id) = update.room_id {
            next.room_id = Some(room_id);
        }
        let schedule = next.schedule.clone();
        next.released.retain(|slot| schedule.meets_on(slot.date));

        let interval = ScheduleInterval::of_session(&next)?;
        if let Some(room_id) = &next.room_id {
            let need = Need::of(&next);
            if previous.as_ref() == Some(room_id) {
                // A block keeps the classes a room already holds.
                require_room_holds(state, room_id, need, &interval, Some(class_id))?;
            } else {
                require_free(state, room_id, need, &interval, Some(class_id))?;
            }
        }

        let room_id = next.room_id.clone();
        *state.sessions.get_mut(&class_id)? = next.clone();
        if let Some(room_id) = &room_id {
            refresh_rooms(state, previous.as_ref(), room_id)?;
        } else if let Some(previous) = &previous {
            refresh_status(state, previous)?;
        }
        Ok(next)
    }

    /// Remove a class and refresh the room it vacated.
    pub fn delete(&self, state: &mut SchedulerState, class_id: ClassId) -> AppResult<ClassSession> {
        let session = state.sessions.remove(&class_id)?;
        if let Some(room_id) = &session.room_id {
            refresh_status(state, room_id)?;
        }
        Ok(session)
    }

    /// Point a session at `room_id`, optionally changing its booking state.
    /// Returns the room it left, if different.
    fn place(
        &self,
        state: &mut SchedulerState,
        class_id: ClassId,
        room_id: &RoomId,
        booking: Option<BookingState>,
    ) -> AppResult<Option<RoomId>> {
        let session = state.sessions.get_mut(&class_id)?;
        let previous = session.room_id.replace(room_id.clone());
        if let Some(booking) = booking {
            session.booking = booking;
        }
        Ok(previous.filter(|prev| prev != room_id))
    }

    // ── Room administration ──────────────────────────────────────────

    /// Add a room to the inventory.
    pub fn register_room(&self, state: &mut SchedulerState, request: NewRoom) -> AppResult<Room> {
        Ok(state.registry.register(request)?.clone())
    }

    /// Take a room out of service.
    pub fn block_room(&self, state: &mut SchedulerState, room_id: &RoomId) -> AppResult<Room> {
        state.registry.set_status(room_id, RoomStatus::Blocked)?;
        Ok(state.registry.get(room_id)?.clone())
    }

    /// Put a room back in service with the status its bookings imply.
    pub fn unblock_room(&self, state: &mut SchedulerState, room_id: &RoomId) -> AppResult<Room> {
        state.registry.get(room_id)?;
        clear_block(state, room_id)?;
        Ok(state.registry.get(room_id)?.clone())
    }

    /// Change a room's name, type, or capacity. Refused when a session
    /// assigned to the room would no longer fit.
    pub fn update_room(
        &self,
        state: &mut SchedulerState,
        room_id: &RoomId,
        update: RoomUpdate,
    ) -> AppResult<Room> {
        update.validate()?;
        let mut preview = state.registry.get(room_id)?.clone();
        if let Some(room_type) = &update.room_type {
            preview.room_type = room_type.clone();
        }
        if let Some(capacity) = update.capacity {
            preview.capacity = capacity;
        }
        let misfits: Vec<ClassId> = state
            .sessions
            .for_room(room_id)
            .filter(|s| !preview.fits(s.student_count, s.room_type.as_ref()))
            .map(|s| s.id)
            .collect();
        if !misfits.is_empty() {
            return Err(AppError::room_unavailable(format!(
                "{} class(es) in room '{room_id}' would no longer fit",
                misfits.len()
            ))
            .with_detail(ErrorDetail {
                conflicting_classes: misfits,
                rooms: vec![room_id.clone()],
                ..Default::default()
            }));
        }
        Ok(state.registry.update(room_id, update)?.clone())
    }

    /// Close a room on single dates. Refused while any session holds the
    /// room on one of them.
    pub fn block_dates(
        &self,
        state: &mut SchedulerState,
        room_id: &RoomId,
        dates: &BTreeSet<NaiveDate>,
    ) -> AppResult<Room> {
        state.registry.get(room_id)?;
        let mut clashes = Vec::new();
        for session in state.sessions.for_room(room_id) {
            let interval = ScheduleInterval::of_session(session)?;
            if let Some(date) = interval.first_hit(dates) {
                clashes.push(Conflict {
                    class_id: session.id,
                    date,
                });
            }
        }
        if !clashes.is_empty() {
            return Err(AppError::conflict(format!(
                "Room '{room_id}' is booked on {} of the dates",
                clashes.len()
            ))
            .with_detail(ConflictDetector::detail(room_id, &clashes)));
        }
        Ok(state.registry.block_dates(room_id, dates)?.clone())
    }

    /// Reopen a room on single dates.
    pub fn unblock_dates(
        &self,
        state: &mut SchedulerState,
        room_id: &RoomId,
        dates: &BTreeSet<NaiveDate>,
    ) -> AppResult<Room> {
        Ok(state.registry.unblock_dates(room_id, dates)?.clone())
    }

    /// Delete a room that no session references.
    pub fn remove_room(&self, state: &mut SchedulerState, room_id: &RoomId) -> AppResult<Room> {
        state.registry.get(room_id)?;
        let assigned: Vec<ClassId> = state.sessions.for_room(room_id).map(|s| s.id).collect();
        if !assigned.is_empty() {
            return Err(AppError::conflict(format!(
                "Room '{room_id}' still hosts {} class(es)",
                assigned.len()
            ))
            .with_detail(ErrorDetail {
                conflicting_classes: assigned,
                rooms: vec![room_id.clone()],
                ..Default::default()
            }));
        }
        state.registry.remove(room_id)
    }
}

/// Rooms that could host `need`, smallest capacity first, then by id.
fn candidates<'a>(state: &'a SchedulerState, need: Need<'_>) -> Vec<&'a Room> {
    let mut rooms: Vec<&Room> = state
        .registry
        .all()
        .filter(|room| !room.is_blocked() && room.fits(need.students, need.room_type))
        .collect();
    rooms.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)));
    rooms
}

fn unavailable(room: &Room, message: String) -> AppError {
    AppError::room_unavailable(message).with_detail(ErrorDetail {
        rooms: vec![room.id.clone()],
        ..Default::default()
    })
}

/// Fail with `RoomUnavailable` if the room is blocked or cannot host `need`.
fn ensure_usable(room: &Room, need: Need<'_>) -> AppResult<()> {
    if room.is_blocked() {
        return Err(unavailable(room, format!("Room '{}' is blocked", room.id)));
    }
    ensure_fits(room, need)
}

/// Fail with `RoomUnavailable` if the room is too small or of the wrong type.
fn ensure_fits(room: &Room, need: Need<'_>) -> AppResult<()> {
    if room.capacity < need.students {
        let message = format!(
            "Room '{}' holds {} students, {} needed",
            room.id, room.capacity, need.students
        );
        return Err(unavailable(room, message));
    }
    if let Some(required) = need.room_type {
        if *required != room.room_type {
            let message = format!(
                "Room '{}' is of type '{}', '{required}' required",
                room.id, room.room_type
            );
            return Err(unavailable(room, message));
        }
    }
    Ok(())
}

fn assess(
    state: &SchedulerState,
    room: &Room,
    interval: &ScheduleInterval,
    exclude: Option<ClassId>,
) -> AppResult<RoomCheck> {
    if let Some(date) = interval.first_hit(&room.blocked_dates) {
        return Ok(RoomCheck::Closed(date));
    }
    let conflicts = ConflictDetector::find_conflicts(&state.sessions, &room.id, interval, exclude)?;
    if conflicts.is_empty() {
        Ok(RoomCheck::Free)
    } else {
        Ok(RoomCheck::Busy(conflicts))
    }
}

/// Fail unless the room exists, can host `need`, and is free for `interval`.
fn require_free(
    state: &SchedulerState,
    room_id: &RoomId,
    need: Need<'_>,
    interval: &ScheduleInterval,
    exclude: Option<ClassId>,
) -> AppResult<()> {
    let room = state.registry.get(room_id)?;
    ensure_usable(room, need)?;
    require_open(state, room, interval, exclude)
}

/// As [`require_free`], but a blocked room passes: used for a class that
/// stays in the room it already holds.
fn require_room_holds(
    state: &SchedulerState,
    room_id: &RoomId,
    need: Need<'_>,
    interval: &ScheduleInterval,
    exclude: Option<ClassId>,
) -> AppResult<()> {
    let room = state.registry.get(room_id)?;
    ensure_fits(room, need)?;
    require_open(state, room, interval, exclude)
}

fn require_open(
    state: &SchedulerState,
    room: &Room,
    interval: &ScheduleInterval,
    exclude: Option<ClassId>,
) -> AppResult<()> {
    let room_id = &room.id;
    match assess(state, room, interval, exclude)? {
        RoomCheck::Free => Ok(()),
        RoomCheck::Closed(date) => Err(closed(room, date)),
        RoomCheck::Busy(conflicts) => Err(AppError::conflict(format!(
            "Room '{room_id}' is already booked by {} class(es), first on {}",
            conflicts.len(),
            conflicts.iter().map(|c| c.date).min().unwrap_or(interval.start_date())
        ))
        .with_detail(ConflictDetector::detail(room_id, &conflicts))),
    }
}

fn closed(room: &Room, date: NaiveDate) -> AppError {
    AppError::room_unavailable(format!("Room '{}' is closed on {date}", room.id)).with_detail(
        ErrorDetail {
            rooms: vec![room.id.clone()],
            conflict_date: Some(date),
            ..Default::default()
        },
    )
}

fn assigned_room(session: &ClassSession) -> AppResult<RoomId> {
    session.room_id.clone().ok_or_else(|| {
        AppError::validation(format!("Class '{}' has no room assigned", session.name))
    })
}

fn refresh_rooms(
    state: &mut SchedulerState,
    previous: Option<&RoomId>,
    current: &RoomId,
) -> AppResult<()> {
    if let Some(previous) = previous {
        refresh_status(state, previous)?;
    }
    refresh_status(state, current)?;
    Ok(())
}

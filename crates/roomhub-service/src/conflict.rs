//! Conflict detection between a requested interval and booked sessions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use roomhub_core::error::ErrorDetail;
use roomhub_core::result::AppResult;
use roomhub_core::types::id::{ClassId, RoomId};

use crate::interval::ScheduleInterval;
use crate::sessions::SessionStore;

/// One booked session that clashes with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// The clashing session.
    pub class_id: ClassId,
    /// First date both hold the room.
    pub date: NaiveDate,
}

/// Finds sessions that would share a room with a requested interval.
///
/// Reserved and confirmed sessions both hold their room. Released dates
/// are honoured on both sides: a session whose every shared occurrence was
/// released does not conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Sessions in `room_id` clashing with `interval`, in creation order.
    ///
    /// `exclude` skips one session, used when a session is checked against
    /// its own room during a swap or reschedule.
    pub fn find_conflicts(
        sessions: &SessionStore,
        room_id: &RoomId,
        interval: &ScheduleInterval,
        exclude: Option<ClassId>,
    ) -> AppResult<Vec<Conflict>> {
        let mut conflicts = Vec::new();
        for session in sessions.for_room(room_id) {
            if Some(session.id) == exclude {
                continue;
            }
            let booked = ScheduleInterval::of_session(session)?;
            if let Some(date) = booked.first_shared_occurrence(interval) {
                conflicts.push(Conflict {
                    class_id: session.id,
                    date,
                });
            }
        }
        Ok(conflicts)
    }

    /// Build the error payload describing `conflicts` in `room_id`.
    pub fn detail(room_id: &RoomId, conflicts: &[Conflict]) -> ErrorDetail {
        ErrorDetail {
            conflicting_classes: conflicts.iter().map(|c| c.class_id).collect(),
            rooms: vec![room_id.clone()],
            conflict_date: conflicts.iter().map(|c| c.date).min(),
            next_window: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roomhub_entity::class::{
        BookingState, ClassSchedule, ClassSession, DayOfWeek, Period, ReleasedSlot,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(days: &[DayOfWeek], period: Period, start: NaiveDate) -> ClassSchedule {
        ClassSchedule {
            days: days.iter().copied().collect(),
            period,
            start_date: start,
            end_date: None,
        }
    }

    fn booked(room: &str, schedule: ClassSchedule) -> ClassSession {
        ClassSession {
            id: ClassId::new(),
            name: "booked".into(),
            room_id: Some(RoomId::new(room).unwrap()),
            student_count: 10,
            room_type: None,
            schedule,
            booking: BookingState::Confirmed,
            released: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_reports_in_creation_order() {
        let room = RoomId::new("room-10").unwrap();
        let start = date(2025, 2, 3);
        let first = booked("room-10", schedule(&[DayOfWeek::Wednesday], Period::Morning, start));
        let other_room = booked("room-11", schedule(&[DayOfWeek::Monday], Period::Morning, start));
        let second = booked("room-10", schedule(&[DayOfWeek::Monday], Period::Morning, start));
        let store =
            SessionStore::from_sessions(vec![first.clone(), other_room, second.clone()]).unwrap();

        let request = ScheduleInterval::normalize(&schedule(
            &[DayOfWeek::Monday, DayOfWeek::Wednesday],
            Period::Morning,
            start,
        ))
        .unwrap();
        let conflicts = ConflictDetector::find_conflicts(&store, &room, &request, None).unwrap();
        let ids: Vec<_> = conflicts.iter().map(|c| c.class_id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        // 2025-02-03 is a Monday, 2025-02-05 a Wednesday
        assert_eq!(conflicts[0].date, date(2025, 2, 5));
        assert_eq!(conflicts[1].date, date(2025, 2, 3));

        let detail = ConflictDetector::detail(&room, &conflicts);
        assert_eq!(detail.conflict_date, Some(date(2025, 2, 3)));
    }

    #[test]
    fn test_excluded_session_is_skipped() {
        let room = RoomId::new("room-10").unwrap();
        let session = booked(
            "room-10",
            schedule(&[DayOfWeek::Monday], Period::Evening, date(2025, 1, 1)),
        );
        let interval = ScheduleInterval::of_session(&session).unwrap();
        let store = SessionStore::from_sessions(vec![session.clone()]).unwrap();
        assert_eq!(
            ConflictDetector::find_conflicts(&store, &room, &interval, None)
                .unwrap()
                .len(),
            1
        );
        assert!(
            ConflictDetector::find_conflicts(&store, &room, &interval, Some(session.id))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_released_date_frees_single_occurrence() {
        let room = RoomId::new("room-10").unwrap();
        let mut session = booked(
            "room-10",
            schedule(&[DayOfWeek::Tuesday], Period::Morning, date(2025, 1, 1)),
        );
        session.released.push(ReleasedSlot {
            date: date(2025, 2, 4),
            reason: None,
        });
        let store = SessionStore::from_sessions(vec![session]).unwrap();

        let one_off = ScheduleInterval::normalize(&ClassSchedule {
            end_date: Some(date(2025, 2, 4)),
            ..schedule(&[DayOfWeek::Tuesday], Period::Morning, date(2025, 2, 4))
        })
        .unwrap();
        assert!(
            ConflictDetector::find_conflicts(&store, &room, &one_off, None)
                .unwrap()
                .is_empty()
        );

        let next_week = ScheduleInterval::normalize(&ClassSchedule {
            end_date: Some(date(2025, 2, 11)),
            ..schedule(&[DayOfWeek::Tuesday], Period::Morning, date(2025, 2, 11))
        })
        .unwrap();
        assert_eq!(
            ConflictDetector::find_conflicts(&store, &room, &next_week, None)
                .unwrap()
                .len(),
            1
        );
    }
}

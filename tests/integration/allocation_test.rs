//! Integration tests for room allocation, conflicts, swaps, and releases.

mod helpers;

use std::collections::BTreeSet;

use roomhub_core::ErrorKind;
use roomhub_entity::class::{ClassUpdate, Period};
use roomhub_entity::room::RoomStatus;
use roomhub_service::{AllocationOutcome, ProposalReason};

use helpers::{TestApp, date, one_off, room_id, tuesday_morning};

#[tokio::test]
async fn test_best_fit_never_wastes_a_larger_room() {
    let app = TestApp::with_rooms(&[("r20", 20), ("r30", 30), ("r50", 50)]).await;

    let (_, first) = app.book(tuesday_morning("Algebra", 25, None)).await;
    assert_eq!(first.id, room_id("r30"));

    let (_, second) = app.book(tuesday_morning("Biology", 25, None)).await;
    assert_eq!(second.id, room_id("r50"));

    assert_eq!(app.status("r20").await, RoomStatus::Available);
    assert_eq!(app.status("r30").await, RoomStatus::Occupied);
    assert_eq!(app.status("r50").await, RoomStatus::Occupied);
}

#[tokio::test]
async fn test_overlapping_swap_is_a_conflict() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (first, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    let (second, _) = app.book(tuesday_morning("Biology", 25, Some("r40"))).await;

    let err = app
        .scheduler
        .swap(second.id, &room_id("r30"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    let detail = err.detail();
    assert_eq!(detail.conflicting_classes, vec![first.id]);
    assert_eq!(detail.conflict_date, Some(date(2025, 2, 4)));
}

#[tokio::test]
async fn test_adjacent_periods_share_a_room() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;

    let mut afternoon = tuesday_morning("Biology", 25, Some("r30"));
    afternoon.schedule.period = Period::Afternoon;
    let (_, room) = app.book(afternoon).await;
    assert_eq!(room.id, room_id("r30"));
}

#[tokio::test]
async fn test_failed_swap_leaves_state_unchanged() {
    let app = TestApp::with_rooms(&[("r20", 20), ("r30", 30), ("r40", 40)]).await;
    let (first, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    let (second, _) = app.book(tuesday_morning("Biology", 25, Some("r40"))).await;
    let before = app.scheduler.snapshot().await;
    let saves = app.store.save_count();

    let err = app
        .scheduler
        .swap(first.id, &room_id("r20"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RoomUnavailable);

    let err = app
        .scheduler
        .swap(first.id, &room_id("r40"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    assert_eq!(app.scheduler.snapshot().await, before);
    assert_eq!(app.store.save_count(), saves);
    assert!(app.scheduler.class(second.id).await.unwrap().is_in(&room_id("r40")));
}

#[tokio::test]
async fn test_swap_moves_class_and_statuses() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (class, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;

    let (old, new) = app.scheduler.swap(class.id, &room_id("r40")).await.unwrap();
    assert_eq!(old.unwrap().status, RoomStatus::Available);
    assert_eq!(new.status, RoomStatus::Occupied);
}

#[tokio::test]
async fn test_release_frees_exactly_one_date() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    let (weekly, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;

    let released = date(2025, 2, 11);
    app.scheduler
        .release(weekly.id, released, Some("field trip".into()))
        .await
        .unwrap();

    let (guest, _) = app
        .book(one_off("Workshop", 20, "r30", released, Period::Morning))
        .await;
    assert!(guest.is_confirmed());

    // The next Tuesday is still held, and every later Tuesday too.
    let err = app
        .scheduler
        .allocate(one_off("Workshop 2", 20, "r30", date(2025, 2, 18), Period::Morning))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoAvailability);
    assert!(err.detail().conflicting_classes.contains(&weekly.id));
}

#[tokio::test]
async fn test_release_on_wrong_weekday_is_invalid() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    let (class, _) = app.book(tuesday_morning("Algebra", 25, None)).await;

    // 2025-02-12 is a Wednesday
    let err = app
        .scheduler
        .release(class.id, date(2025, 2, 12), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidDate);

    // before the start date
    let err = app
        .scheduler
        .release(class.id, date(2025, 1, 28), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidDate);
}

#[tokio::test]
async fn test_deleting_last_class_frees_room() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    let (first, _) = app.book(tuesday_morning("Algebra", 25, None)).await;
    let mut evening = tuesday_morning("Biology", 25, None);
    evening.schedule.period = Period::Evening;
    let (second, _) = app.book(evening).await;

    app.scheduler.delete(first.id).await.unwrap();
    assert_eq!(app.status("r30").await, RoomStatus::Occupied);

    app.scheduler.delete(second.id).await.unwrap();
    assert_eq!(app.status("r30").await, RoomStatus::Available);

    let err = app.scheduler.delete(second.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_busy_requested_room_returns_suggestion() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;

    let outcome = app
        .scheduler
        .allocate(tuesday_morning("Biology", 25, Some("r30")))
        .await
        .unwrap();
    let proposal = match outcome {
        AllocationOutcome::Suggested { proposal } => proposal,
        AllocationOutcome::Booked { .. } => panic!("busy room must not be booked"),
    };
    assert_eq!(proposal.reason, ProposalReason::SubstituteRoom);
    assert_eq!(proposal.room_id, room_id("r40"));
    assert_eq!(app.scheduler.classes().await.len(), 1);
    assert_eq!(app.status("r40").await, RoomStatus::Available);

    let (class, room) = app.scheduler.confirm(proposal).await.unwrap();
    assert!(class.is_in(&room_id("r40")));
    assert_eq!(room.status, RoomStatus::Occupied);
}

#[tokio::test]
async fn test_invalid_schedules_are_rejected() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;

    let mut empty_days = tuesday_morning("Algebra", 25, None);
    empty_days.schedule.days.clear();
    let err = app.scheduler.allocate(empty_days).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSchedule);

    let mut inverted = tuesday_morning("Algebra", 25, None);
    inverted.schedule.end_date = Some(date(2025, 1, 1));
    let err = app.scheduler.allocate(inverted).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSchedule);

    assert!(app.scheduler.classes().await.is_empty());
}

#[tokio::test]
async fn test_reschedule_checks_against_other_classes() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    let (morning, _) = app.book(tuesday_morning("Algebra", 25, None)).await;
    let mut evening = tuesday_morning("Biology", 25, None);
    evening.schedule.period = Period::Evening;
    let (evening, _) = app.book(evening).await;

    let mut clash = evening.schedule.clone();
    clash.period = Period::Morning;
    let err = app
        .scheduler
        .reschedule(
            evening.id,
            ClassUpdate {
                schedule: Some(clash),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.detail().conflicting_classes, vec![morning.id]);

    let renamed = app
        .scheduler
        .reschedule(
            morning.id,
            ClassUpdate {
                name: Some("Linear Algebra".into()),
                student_count: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Linear Algebra");
}

#[tokio::test]
async fn test_blocked_room_keeps_editable_classes() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (class, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    app.scheduler.block_room(&room_id("r30")).await.unwrap();

    let renamed = app
        .scheduler
        .reschedule(
            class.id,
            ClassUpdate {
                name: Some("Linear Algebra".into()),
                student_count: Some(20),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Linear Algebra");
    assert!(renamed.is_in(&room_id("r30")));
    assert_eq!(app.status("r30").await, RoomStatus::Blocked);

    // Capacity still applies in a blocked room.
    let err = app
        .scheduler
        .reschedule(
            class.id,
            ClassUpdate {
                student_count: Some(35),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RoomUnavailable);

    // Moving into a blocked room is still refused.
    let (other, _) = app.book(tuesday_morning("Biology", 25, Some("r40"))).await;
    let err = app
        .scheduler
        .reschedule(
            other.id,
            ClassUpdate {
                room_id: Some(room_id("r30")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RoomUnavailable);
}

#[tokio::test]
async fn test_suggestion_is_not_persisted() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    let before = app.scheduler.snapshot().await;
    let saves = app.store.save_count();

    let outcome = app
        .scheduler
        .allocate(tuesday_morning("Biology", 25, Some("r30")))
        .await
        .unwrap();
    assert!(matches!(outcome, AllocationOutcome::Suggested { .. }));
    assert_eq!(app.store.save_count(), saves);
    assert_eq!(app.scheduler.snapshot().await, before);
}

#[tokio::test]
async fn test_closed_requested_room_reports_next_window() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    let closed: BTreeSet<_> = [date(2025, 2, 11)].into_iter().collect();
    app.scheduler
        .block_dates(&room_id("r30"), &closed)
        .await
        .unwrap();

    let err = app
        .scheduler
        .allocate(one_off("Workshop", 20, "r30", date(2025, 2, 11), Period::Morning))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RoomUnavailable);
    let detail = err.detail();
    assert_eq!(detail.conflict_date, Some(date(2025, 2, 11)));
    assert_eq!(detail.next_window, Some(date(2025, 2, 18)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_allocations_book_room_once() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;

    let (first, second) = tokio::join!(
        app.scheduler.allocate(tuesday_morning("Algebra", 25, Some("r30"))),
        app.scheduler.allocate(tuesday_morning("Biology", 25, Some("r30"))),
    );

    let mut booked = 0;
    for result in [first, second] {
        match result {
            Ok(AllocationOutcome::Booked { .. }) => booked += 1,
            Ok(AllocationOutcome::Suggested { .. }) => {}
            Err(e) => assert_eq!(e.kind, ErrorKind::NoAvailability),
        }
    }
    assert_eq!(booked, 1);
    assert_eq!(app.scheduler.classes_in(&room_id("r30")).await.unwrap().len(), 1);
    assert_eq!(app.status("r30").await, RoomStatus::Occupied);
}

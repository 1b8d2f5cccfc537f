//! Integration tests for pending reservations and displacing reservations.

mod helpers;

use roomhub_core::ErrorKind;
use roomhub_entity::class::BookingState;
use roomhub_entity::room::RoomStatus;

use helpers::{TestApp, room_id, tuesday_morning};

#[tokio::test]
async fn test_reserve_then_confirm() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (class, room) = app.book(tuesday_morning("Algebra", 25, None)).await;
    assert_eq!(room.id, room_id("r30"));

    let reserved = app.scheduler.reserve(class.id, &room_id("r40")).await.unwrap();
    assert_eq!(reserved.status, RoomStatus::Reserved);
    assert_eq!(app.status("r30").await, RoomStatus::Available);

    let pending = app.scheduler.class(class.id).await.unwrap();
    assert_eq!(pending.booking, BookingState::Reserved);
    assert!(pending.is_in(&room_id("r40")));

    let confirmed = app.scheduler.confirm_reservation(class.id).await.unwrap();
    assert_eq!(confirmed.status, RoomStatus::Occupied);
    assert!(app.scheduler.class(class.id).await.unwrap().is_confirmed());

    let err = app.scheduler.confirm_reservation(class.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_reserve_rejects_busy_room() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (holder, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    let (other, _) = app.book(tuesday_morning("Biology", 25, Some("r40"))).await;

    let err = app.scheduler.reserve(other.id, &room_id("r30")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.detail().conflicting_classes, vec![holder.id]);

    let err = app.scheduler.reserve(holder.id, &room_id("r30")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_reserve_rejects_blocked_room() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (class, _) = app.book(tuesday_morning("Algebra", 25, None)).await;
    app.scheduler.block_room(&room_id("r40")).await.unwrap();

    let err = app.scheduler.reserve(class.id, &room_id("r40")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RoomUnavailable);
    assert_eq!(app.status("r40").await, RoomStatus::Blocked);
}

#[tokio::test]
async fn test_reserve_displacing_relocates_occupant() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40), ("r50", 50)]).await;
    let (occupant, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    let (incoming, _) = app.book(tuesday_morning("Biology", 28, Some("r50"))).await;

    let result = app
        .scheduler
        .reserve_displacing(incoming.id, &room_id("r30"))
        .await
        .unwrap();
    assert_eq!(result.moved.len(), 1);
    assert_eq!(result.moved[0].class_id, occupant.id);
    assert_eq!(result.moved[0].from, room_id("r30"));
    assert_eq!(result.moved[0].to, room_id("r40"));
    assert_eq!(result.room.status, RoomStatus::Reserved);

    assert!(app.scheduler.class(occupant.id).await.unwrap().is_in(&room_id("r40")));
    assert_eq!(app.status("r40").await, RoomStatus::Occupied);
    assert_eq!(app.status("r50").await, RoomStatus::Available);

    let room = app.scheduler.confirm_reservation(incoming.id).await.unwrap();
    assert_eq!(room.status, RoomStatus::Occupied);
}

#[tokio::test]
async fn test_reserve_displacing_without_clash_moves_nobody() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (class, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;

    let result = app
        .scheduler
        .reserve_displacing(class.id, &room_id("r40"))
        .await
        .unwrap();
    assert!(result.moved.is_empty());
    assert_eq!(app.status("r30").await, RoomStatus::Available);
    assert_eq!(app.status("r40").await, RoomStatus::Reserved);
}

#[tokio::test]
async fn test_reserve_displacing_is_all_or_nothing() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r50", 50)]).await;
    app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;
    let (incoming, _) = app.book(tuesday_morning("Biology", 28, Some("r50"))).await;
    let before = app.scheduler.snapshot().await;
    let saves = app.store.save_count();

    let err = app
        .scheduler
        .reserve_displacing(incoming.id, &room_id("r30"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.detail().conflicting_classes.contains(&incoming.id));

    assert_eq!(app.scheduler.snapshot().await, before);
    assert_eq!(app.store.save_count(), saves);
}

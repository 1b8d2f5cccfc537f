//! Integration tests for the occupancy dashboard.

mod helpers;

use std::collections::BTreeSet;

use roomhub_entity::class::Period;
use roomhub_service::PeriodOccupancy;

use helpers::{TestApp, date, one_off, room_id, tuesday_morning};

fn counts(occupied: u32, available: u32, reserved: u32, blocked: u32) -> PeriodOccupancy {
    PeriodOccupancy {
        occupied,
        available,
        reserved,
        blocked,
    }
}

#[tokio::test]
async fn test_counts_sum_to_room_count() {
    let app = TestApp::with_rooms(&[("r20", 20), ("r30", 30), ("r40", 40), ("r50", 50)]).await;
    app.book(tuesday_morning("Algebra", 25, None)).await;
    let (pending, _) = app.book(tuesday_morning("Biology", 25, None)).await;
    app.scheduler.reserve(pending.id, &room_id("r50")).await.unwrap();
    app.scheduler.block_room(&room_id("r20")).await.unwrap();

    let tuesday = app.scheduler.dashboard_on(date(2025, 2, 11)).await.unwrap();
    assert_eq!(tuesday.total_rooms, 4);
    assert_eq!(tuesday.periods.len(), 3);
    for occupancy in tuesday.periods.values() {
        assert_eq!(occupancy.total(), 4);
    }
    assert_eq!(tuesday.periods[&Period::Morning], counts(1, 1, 1, 1));
    assert_eq!(tuesday.periods[&Period::Afternoon], counts(0, 3, 0, 1));
    assert_eq!(tuesday.periods[&Period::Evening], counts(0, 3, 0, 1));

    // Nothing meets on Wednesdays.
    let wednesday = app.scheduler.dashboard_on(date(2025, 2, 12)).await.unwrap();
    assert_eq!(wednesday.periods[&Period::Morning], counts(0, 3, 0, 1));
}

#[tokio::test]
async fn test_released_and_closed_dates() {
    let app = TestApp::with_rooms(&[("r30", 30), ("r40", 40)]).await;
    let (class, _) = app.book(tuesday_morning("Algebra", 25, Some("r30"))).await;

    let released = date(2025, 2, 11);
    app.scheduler.release(class.id, released, None).await.unwrap();
    let closed: BTreeSet<_> = [date(2025, 2, 18)].into_iter().collect();
    app.scheduler
        .block_dates(&room_id("r40"), &closed)
        .await
        .unwrap();

    let on_release = app.scheduler.dashboard_on(released).await.unwrap();
    assert_eq!(on_release.periods[&Period::Morning], counts(0, 2, 0, 0));

    let on_closure = app.scheduler.dashboard_on(date(2025, 2, 18)).await.unwrap();
    assert_eq!(on_closure.periods[&Period::Morning], counts(1, 0, 0, 1));
    assert_eq!(on_closure.periods[&Period::Evening], counts(0, 1, 0, 1));
}

#[tokio::test]
async fn test_custom_period_counts_where_it_overlaps() {
    let app = TestApp::with_rooms(&[("r30", 30)]).await;
    let on = date(2025, 2, 12);
    let lunch = Period::Custom {
        start: chrono::NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        end: chrono::NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    };
    app.book(one_off("Seminar", 20, "r30", on, lunch)).await;

    let snapshot = app.scheduler.dashboard_on(on).await.unwrap();
    assert_eq!(snapshot.periods[&Period::Morning], counts(1, 0, 0, 0));
    assert_eq!(snapshot.periods[&Period::Afternoon], counts(1, 0, 0, 0));
    assert_eq!(snapshot.periods[&Period::Evening], counts(0, 1, 0, 0));
}

#[tokio::test]
async fn test_empty_inventory() {
    let app = TestApp::with_rooms(&[]).await;
    let snapshot = app.scheduler.dashboard_on(date(2025, 2, 11)).await.unwrap();
    assert_eq!(snapshot.total_rooms, 0);
    assert!(snapshot.periods.values().all(|p| p.total() == 0));
}

//! Integration tests for write-through persistence, rollback, and seeding.

mod helpers;

use std::sync::Arc;

use roomhub_core::ErrorKind;
use roomhub_core::config::allocation::AllocationConfig;
use roomhub_core::traits::store::SnapshotStore;
use roomhub_entity::room::{RoomStatus, RoomUpdate};
use roomhub_entity::snapshot::StoreSnapshot;
use roomhub_service::{RoomFilter, Scheduler};
use roomhub_storage::{JsonFileStore, MemoryStore};

use helpers::{FlakyStore, config, date, new_room, room_id, tuesday_morning};

#[tokio::test]
async fn test_every_mutation_is_saved() {
    let store = MemoryStore::<StoreSnapshot>::new();
    let scheduler = Scheduler::open(Arc::new(store.clone()), &config())
        .await
        .unwrap();
    assert_eq!(store.save_count(), 0);

    scheduler.register_room(new_room("r30", 30)).await.unwrap();
    assert_eq!(store.save_count(), 1);

    scheduler.allocate(tuesday_morning("Algebra", 25, None)).await.unwrap();
    assert_eq!(store.save_count(), 2);

    let saved = store.load().await.unwrap().unwrap();
    assert_eq!(saved, scheduler.snapshot().await);
    assert_eq!(saved.classes.len(), 1);

    // Rejected operations write nothing.
    scheduler.register_room(new_room("r30", 30)).await.unwrap_err();
    assert_eq!(store.save_count(), 2);
}

#[tokio::test]
async fn test_failed_save_rolls_back() {
    let store = Arc::new(FlakyStore::default());
    let scheduler = Scheduler::open(store.clone(), &config()).await.unwrap();
    scheduler.register_room(new_room("r30", 30)).await.unwrap();
    let before = scheduler.snapshot().await;
    let saves = store.save_count();

    store.fail_saves(true);
    let err = scheduler
        .allocate(tuesday_morning("Algebra", 25, None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageFailure);

    let err = scheduler
        .update_room(
            &room_id("r30"),
            RoomUpdate {
                capacity: Some(40),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageFailure);

    assert_eq!(scheduler.snapshot().await, before);
    assert_eq!(store.save_count(), saves);
    assert!(scheduler.classes().await.is_empty());
    assert_eq!(scheduler.room(&room_id("r30")).await.unwrap().capacity, 30);

    store.fail_saves(false);
    scheduler
        .allocate(tuesday_morning("Algebra", 25, None))
        .await
        .unwrap();
    assert_eq!(scheduler.classes().await.len(), 1);
}

#[tokio::test]
async fn test_suggestion_survives_failing_store() {
    let store = Arc::new(FlakyStore::default());
    let scheduler = Scheduler::open(store.clone(), &config()).await.unwrap();
    scheduler.register_room(new_room("r30", 30)).await.unwrap();
    scheduler.register_room(new_room("r40", 40)).await.unwrap();
    scheduler
        .allocate(tuesday_morning("Algebra", 25, Some("r30")))
        .await
        .unwrap();
    let saves = store.save_count();

    store.fail_saves(true);
    let outcome = scheduler
        .allocate(tuesday_morning("Biology", 25, Some("r30")))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        roomhub_service::AllocationOutcome::Suggested { .. }
    ));
    assert_eq!(store.save_count(), saves);
}

#[tokio::test]
async fn test_state_survives_reopen_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("store.json");

    let class_id = {
        let store = JsonFileStore::<StoreSnapshot>::new(&path).await.unwrap();
        let scheduler = Scheduler::open(Arc::new(store), &config()).await.unwrap();
        scheduler.register_room(new_room("r30", 30)).await.unwrap();
        scheduler.register_room(new_room("r40", 40)).await.unwrap();
        let outcome = scheduler
            .allocate(tuesday_morning("Algebra", 25, None))
            .await
            .unwrap();
        let class = match outcome {
            roomhub_service::AllocationOutcome::Booked { class, .. } => class,
            other => panic!("unexpected outcome: {other:?}"),
        };
        scheduler
            .release(class.id, date(2025, 2, 11), Some("holiday".into()))
            .await
            .unwrap();
        scheduler.block_room(&room_id("r40")).await.unwrap();
        class.id
    };
    assert!(path.exists());

    let store = JsonFileStore::<StoreSnapshot>::new(&path).await.unwrap();
    let scheduler = Scheduler::open(Arc::new(store), &config()).await.unwrap();
    let class = scheduler.class(class_id).await.unwrap();
    assert!(class.is_released(date(2025, 2, 11)));
    assert!(class.is_in(&room_id("r30")));
    assert_eq!(
        scheduler.room(&room_id("r30")).await.unwrap().status,
        RoomStatus::Occupied
    );
    assert_eq!(
        scheduler.room(&room_id("r40")).await.unwrap().status,
        RoomStatus::Blocked
    );
}

#[tokio::test]
async fn test_unknown_room_in_snapshot_is_rejected() {
    let store = MemoryStore::<StoreSnapshot>::new();
    {
        let scheduler = Scheduler::open(Arc::new(store.clone()), &config())
            .await
            .unwrap();
        scheduler.register_room(new_room("r30", 30)).await.unwrap();
        scheduler
            .allocate(tuesday_morning("Algebra", 25, None))
            .await
            .unwrap();
    }

    let mut snapshot = store.load().await.unwrap().unwrap();
    snapshot.rooms.clear();
    store.save(&snapshot).await.unwrap();

    let err = Scheduler::open(Arc::new(store), &config()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageFailure);
}

#[tokio::test]
async fn test_empty_store_is_seeded_once() {
    let store = MemoryStore::<StoreSnapshot>::new();
    let seeding = AllocationConfig {
        seed_default_rooms: true,
        ..config()
    };

    let scheduler = Scheduler::open(Arc::new(store.clone()), &seeding)
        .await
        .unwrap();
    let seeded = scheduler.rooms(&RoomFilter::default()).await.len();
    assert!(seeded > 0);
    assert!(
        scheduler
            .rooms(&RoomFilter::default())
            .await
            .iter()
            .all(|room| room.status == RoomStatus::Available)
    );
    assert_eq!(store.save_count(), 1);

    let first = scheduler.rooms(&RoomFilter::default()).await[0].id.clone();
    scheduler.remove_room(&first).await.unwrap();

    let reopened = Scheduler::open(Arc::new(store.clone()), &seeding)
        .await
        .unwrap();
    assert_eq!(reopened.rooms(&RoomFilter::default()).await.len(), seeded - 1);
    assert_eq!(store.save_count(), 2);
}

#[tokio::test]
async fn test_seeding_disabled_leaves_store_empty() {
    let store = MemoryStore::<StoreSnapshot>::new();
    let scheduler = Scheduler::open(Arc::new(store.clone()), &config())
        .await
        .unwrap();
    assert!(scheduler.rooms(&RoomFilter::default()).await.is_empty());
    assert_eq!(store.save_count(), 0);
}

//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use roomhub_core::config::allocation::AllocationConfig;
use roomhub_core::error::AppError;
use roomhub_core::result::AppResult;
use roomhub_core::traits::store::SnapshotStore;
use roomhub_core::types::id::RoomId;
use roomhub_entity::class::{ClassSchedule, ClassSession, DayOfWeek, NewClassSession, Period};
use roomhub_entity::room::{NewRoom, Room};
use roomhub_entity::snapshot::StoreSnapshot;
use roomhub_service::{AllocationOutcome, Scheduler};
use roomhub_storage::MemoryStore;

/// Test application context
pub struct TestApp {
    /// The scheduler under test
    pub scheduler: Scheduler,
    /// Handle on the scheduler's store
    pub store: MemoryStore<StoreSnapshot>,
}

impl TestApp {
    /// Scheduler over an empty in-memory store with the given rooms
    pub async fn with_rooms(rooms: &[(&str, u32)]) -> Self {
        let store = MemoryStore::new();
        let scheduler = Scheduler::open(Arc::new(store.clone()), &config())
            .await
            .expect("Failed to open scheduler");
        for (id, capacity) in rooms {
            scheduler
                .register_room(new_room(id, *capacity))
                .await
                .expect("Failed to register room");
        }
        Self { scheduler, store }
    }

    /// Book a request that must be booked directly
    pub async fn book(&self, request: NewClassSession) -> (ClassSession, Room) {
        match self.scheduler.allocate(request).await.expect("allocate failed") {
            AllocationOutcome::Booked { class, room } => (class, room),
            AllocationOutcome::Suggested { proposal } => {
                panic!("Expected a booking, got a {} suggestion", proposal.reason)
            }
        }
    }

    /// Current status of a room
    pub async fn status(&self, room: &str) -> roomhub_entity::room::RoomStatus {
        self.scheduler
            .room(&room_id(room))
            .await
            .expect("room missing")
            .status
    }
}

/// Allocation settings with seeding disabled
pub fn config() -> AllocationConfig {
    AllocationConfig {
        horizon_days: 90,
        seed_default_rooms: false,
    }
}

/// Parse a room id
pub fn room_id(id: &str) -> RoomId {
    RoomId::new(id).expect("invalid room id")
}

/// A standard room
pub fn new_room(id: &str, capacity: u32) -> NewRoom {
    NewRoom {
        id: room_id(id),
        name: id.to_uppercase(),
        room_type: "standard".into(),
        capacity,
    }
}

/// Calendar date shorthand
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("invalid date")
}

/// Open-ended Tuesday-morning class starting 2025-02-04 (a Tuesday)
pub fn tuesday_morning(name: &str, students: u32, room: Option<&str>) -> NewClassSession {
    NewClassSession {
        name: name.into(),
        student_count: students,
        room_type: None,
        schedule: ClassSchedule {
            days: [DayOfWeek::Tuesday].into_iter().collect(),
            period: Period::Morning,
            start_date: date(2025, 2, 4),
            end_date: None,
        },
        room_id: room.map(room_id),
    }
}

/// A one-off class on a single date
pub fn one_off(
    name: &str,
    students: u32,
    room: &str,
    on: NaiveDate,
    period: Period,
) -> NewClassSession {
    NewClassSession {
        name: name.into(),
        student_count: students,
        room_type: None,
        schedule: ClassSchedule {
            days: [DayOfWeek::of(on)].into_iter().collect(),
            period,
            start_date: on,
            end_date: Some(on),
        },
        room_id: Some(room_id(room)),
    }
}

/// Store that can be switched to fail every save
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore<StoreSnapshot>,
    failing: AtomicBool,
}

impl FlakyStore {
    /// Make every following save fail
    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Saves that went through
    pub fn save_count(&self) -> u64 {
        self.inner.save_count()
    }
}

#[async_trait]
impl SnapshotStore<StoreSnapshot> for FlakyStore {
    fn backend(&self) -> &str {
        "flaky"
    }

    async fn load(&self) -> AppResult<Option<StoreSnapshot>> {
        self.inner.load().await
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::storage("disk full"));
        }
        self.inner.save(snapshot).await
    }
}

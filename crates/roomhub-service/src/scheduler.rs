//! The scheduler: single owner of rooms and sessions, writing every
//! change through to the snapshot store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use roomhub_core::config::allocation::AllocationConfig;
use roomhub_core::error::{AppError, ErrorKind};
use roomhub_core::result::AppResult;
use roomhub_core::traits::store::SnapshotStore;
use roomhub_core::types::id::{ClassId, RoomId};
use roomhub_entity::class::{ClassSession, ClassUpdate, NewClassSession};
use roomhub_entity::room::{NewRoom, Room, RoomStatus, RoomUpdate};
use roomhub_entity::snapshot::StoreSnapshot;

use crate::allocation::{AllocationEngine, AllocationOutcome, Displacement, Proposal};
use crate::dashboard::{DashboardAggregator, OccupancySnapshot};
use crate::registry::RoomFilter;
use crate::seed::default_rooms;
use crate::state::SchedulerState;

/// Coordinates the allocation engine, the in-memory state, and persistence.
///
/// Mutations hold the write lock for their whole duration: they run against
/// a draft copy, persist it, and only then replace the live state. A failed
/// save leaves the live state exactly as it was. Reads see committed state
/// only.
pub struct Scheduler {
    /// Committed rooms and sessions.
    state: RwLock<SchedulerState>,
    /// Where every committed state is written.
    store: Arc<dyn SnapshotStore<StoreSnapshot>>,
    /// Decision logic.
    engine: AllocationEngine,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("store", &self.store)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Load the persisted state, seeding the default rooms when the store
    /// holds no rooms and seeding is enabled.
    pub async fn open(
        store: Arc<dyn SnapshotStore<StoreSnapshot>>,
        config: &AllocationConfig,
    ) -> AppResult<Self> {
        let mut state = match store.load().await? {
            Some(snapshot) => SchedulerState::from_snapshot(snapshot)?,
            None => SchedulerState::default(),
        };
        info!(
            backend = store.backend(),
            rooms = state.registry.len(),
            classes = state.sessions.len(),
            "Loaded scheduler state"
        );

        if state.registry.is_empty() && config.seed_default_rooms {
            for room in default_rooms()? {
                state.registry.register(room)?;
            }
            store.save(&state.to_snapshot()).await?;
            info!(rooms = state.registry.len(), "Seeded default rooms");
        }

        Ok(Self {
            state: RwLock::new(state),
            store,
            engine: AllocationEngine::new(config),
        })
    }

    /// Run `op` on a draft, persist it, and commit.
    async fn mutate<T>(
        &self,
        action: &'static str,
        op: impl FnOnce(&AllocationEngine, &mut SchedulerState) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut state = self.state.write().await;
        let mut draft = state.clone();

        let output = op(&self.engine, &mut draft).inspect_err(|e| {
            warn!(action, kind = %e.kind, error = %e.message, "Operation rejected");
        })?;

        if draft == *state {
            debug!(action, "Nothing changed");
            return Ok(output);
        }

        if let Err(e) = self.store.save(&draft.to_snapshot()).await {
            warn!(action, error = %e, "Failed to persist state; changes discarded");
            return Err(if e.is(ErrorKind::StorageFailure) {
                e
            } else {
                AppError::with_source(
                    ErrorKind::StorageFailure,
                    format!("Failed to persist state after {action}"),
                    e,
                )
            });
        }

        *state = draft;
        debug!(action, "Committed state");
        Ok(output)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Rooms matching `filter`, available first.
    pub async fn rooms(&self, filter: &RoomFilter) -> Vec<Room> {
        let state = self.state.read().await;
        state.registry.list(filter).into_iter().cloned().collect()
    }

    /// Rooms matching `filter`, grouped by status.
    pub async fn rooms_grouped(&self, filter: &RoomFilter) -> BTreeMap<RoomStatus, Vec<Room>> {
        let state = self.state.read().await;
        state
            .registry
            .list_grouped(filter)
            .into_iter()
            .map(|(status, rooms)| (status, rooms.into_iter().cloned().collect()))
            .collect()
    }

    /// One room.
    pub async fn room(&self, room_id: &RoomId) -> AppResult<Room> {
        let state = self.state.read().await;
        Ok(state.registry.get(room_id)?.clone())
    }

    /// Every class, oldest first.
    pub async fn classes(&self) -> Vec<ClassSession> {
        let state = self.state.read().await;
        state.sessions.list().to_vec()
    }

    /// Classes booked into `room_id`, oldest first.
    pub async fn classes_in(&self, room_id: &RoomId) -> AppResult<Vec<ClassSession>> {
        let state = self.state.read().await;
        state.registry.get(room_id)?;
        Ok(state.sessions.for_room(room_id).cloned().collect())
    }

    /// One class.
    pub async fn class(&self, class_id: ClassId) -> AppResult<ClassSession> {
        let state = self.state.read().await;
        Ok(state.sessions.get(&class_id)?.clone())
    }

    /// Find a placement without booking it.
    pub async fn propose(&self, request: &NewClassSession) -> AppResult<Proposal> {
        let state = self.state.read().await;
        self.engine.propose(&state, request)
    }

    /// Per-period occupancy on `date`.
    pub async fn dashboard_on(&self, date: NaiveDate) -> AppResult<OccupancySnapshot> {
        let state = self.state.read().await;
        DashboardAggregator::snapshot_on(&state, date)
    }

    /// Per-period occupancy today.
    pub async fn dashboard(&self) -> AppResult<OccupancySnapshot> {
        let state = self.state.read().await;
        DashboardAggregator::snapshot(&state)
    }

    /// The committed state in persisted form.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.to_snapshot()
    }

    // ── Rooms ────────────────────────────────────────────────────────

    /// Add a room.
    pub async fn register_room(&self, request: NewRoom) -> AppResult<Room> {
        let room = self
            .mutate("register_room", |engine, state| engine.register_room(state, request))
            .await?;
        info!(
            room_id = %room.id,
            capacity = room.capacity,
            room_type = %room.room_type,
            "Room registered"
        );
        Ok(room)
    }

    /// Change a room's name, type, or capacity.
    pub async fn update_room(&self, room_id: &RoomId, update: RoomUpdate) -> AppResult<Room> {
        let room = self
            .mutate("update_room", |engine, state| engine.update_room(state, room_id, update))
            .await?;
        info!(room_id = %room.id, "Room updated");
        Ok(room)
    }

    /// Take a room out of service.
    pub async fn block_room(&self, room_id: &RoomId) -> AppResult<Room> {
        let room = self
            .mutate("block_room", |engine, state| engine.block_room(state, room_id))
            .await?;
        info!(room_id = %room.id, "Room blocked");
        Ok(room)
    }

    /// Return a room to service.
    pub async fn unblock_room(&self, room_id: &RoomId) -> AppResult<Room> {
        let room = self
            .mutate("unblock_room", |engine, state| engine.unblock_room(state, room_id))
            .await?;
        info!(room_id = %room.id, status = %room.status, "Room unblocked");
        Ok(room)
    }

    /// Close a room on single dates.
    pub async fn block_dates(
        &self,
        room_id: &RoomId,
        dates: &BTreeSet<NaiveDate>,
    ) -> AppResult<Room> {
        let room = self
            .mutate("block_dates", |engine, state| engine.block_dates(state, room_id, dates))
            .await?;
        info!(room_id = %room.id, dates = dates.len(), "Room dates blocked");
        Ok(room)
    }

    /// Reopen a room on single dates.
    pub async fn unblock_dates(
        &self,
        room_id: &RoomId,
        dates: &BTreeSet<NaiveDate>,
    ) -> AppResult<Room> {
        let room = self
            .mutate("unblock_dates", |engine, state| engine.unblock_dates(state, room_id, dates))
            .await?;
        info!(room_id = %room.id, dates = dates.len(), "Room dates unblocked");
        Ok(room)
    }

    /// Delete a room no class references.
    pub async fn remove_room(&self, room_id: &RoomId) -> AppResult<Room> {
        let room = self
            .mutate("remove_room", |engine, state| engine.remove_room(state, room_id))
            .await?;
        info!(room_id = %room.id, "Room removed");
        Ok(room)
    }

    // ── Classes ──────────────────────────────────────────────────────

    /// Book a class, or return a suggestion when the request cannot be
    /// honoured as asked.
    pub async fn allocate(&self, request: NewClassSession) -> AppResult<AllocationOutcome> {
        let outcome = self
            .mutate("allocate", |engine, state| engine.allocate(state, request))
            .await?;
        match &outcome {
            AllocationOutcome::Booked { class, room } => {
                info!(class_id = %class.id, room_id = %room.id, "Class allocated");
            }
            AllocationOutcome::Suggested { proposal } => {
                info!(
                    room_id = %proposal.room_id,
                    reason = %proposal.reason,
                    start = %proposal.schedule.start_date,
                    "Allocation suggested"
                );
            }
        }
        Ok(outcome)
    }

    /// Book a suggestion returned by [`Scheduler::allocate`] or
    /// [`Scheduler::propose`].
    pub async fn confirm(&self, proposal: Proposal) -> AppResult<(ClassSession, Room)> {
        let (class, room) = self
            .mutate("confirm", |engine, state| engine.confirm(state, proposal))
            .await?;
        info!(class_id = %class.id, room_id = %room.id, "Proposal confirmed");
        Ok((class, room))
    }

    /// Hold a room for a class pending confirmation.
    pub async fn reserve(&self, class_id: ClassId, room_id: &RoomId) -> AppResult<Room> {
        let room = self
            .mutate("reserve", |engine, state| engine.reserve(state, class_id, room_id))
            .await?;
        info!(class_id = %class_id, room_id = %room.id, "Room reserved");
        Ok(room)
    }

    /// Reserve a room, moving its clashing occupants elsewhere.
    pub async fn reserve_displacing(
        &self,
        class_id: ClassId,
        room_id: &RoomId,
    ) -> AppResult<Displacement> {
        let displacement = self
            .mutate("reserve_displacing", |engine, state| {
                engine.reserve_displacing(state, class_id, room_id)
            })
            .await?;
        for relocation in &displacement.moved {
            info!(
                class_id = %relocation.class_id,
                from = %relocation.from,
                to = %relocation.to,
                "Class relocated"
            );
        }
        info!(
            class_id = %class_id,
            room_id = %room_id,
            moved = displacement.moved.len(),
            "Room reserved"
        );
        Ok(displacement)
    }

    /// Confirm a pending reservation.
    pub async fn confirm_reservation(&self, class_id: ClassId) -> AppResult<Room> {
        let room = self
            .mutate("confirm_reservation", |engine, state| {
                engine.confirm_reservation(state, class_id)
            })
            .await?;
        info!(class_id = %class_id, room_id = %room.id, "Reservation confirmed");
        Ok(room)
    }

    /// Move a class to another room.
    pub async fn swap(
        &self,
        class_id: ClassId,
        room_id: &RoomId,
    ) -> AppResult<(Option<Room>, Room)> {
        let (old, new) = self
            .mutate("swap", |engine, state| engine.swap(state, class_id, room_id))
            .await?;
        info!(
            class_id = %class_id,
            from = old.as_ref().map(|r| r.id.as_str()).unwrap_or("-"),
            to = %new.id,
            "Class swapped"
        );
        Ok((old, new))
    }

    /// Free one occurrence of a class.
    pub async fn release(
        &self,
        class_id: ClassId,
        date: NaiveDate,
        reason: Option<String>,
    ) -> AppResult<ClassSession> {
        let class = self
            .mutate("release", |engine, state| engine.release(state, class_id, date, reason))
            .await?;
        info!(class_id = %class_id, %date, "Occurrence released");
        Ok(class)
    }

    /// Change a class's name, schedule, size, or room.
    pub async fn reschedule(
        &self,
        class_id: ClassId,
        update: ClassUpdate,
    ) -> AppResult<ClassSession> {
        let class = self
            .mutate("reschedule", |engine, state| engine.reschedule(state, class_id, update))
            .await?;
        info!(class_id = %class_id, "Class rescheduled");
        Ok(class)
    }

    /// Remove a class.
    pub async fn delete(&self, class_id: ClassId) -> AppResult<ClassSession> {
        let class = self
            .mutate("delete", |engine, state| engine.delete(state, class_id))
            .await?;
        info!(class_id = %class_id, "Class deleted");
        Ok(class)
    }
}

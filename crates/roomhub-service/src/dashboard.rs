//! Occupancy dashboard: per-period room counts for a single date.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use roomhub_core::result::AppResult;
use roomhub_entity::class::Period;
use roomhub_entity::room::RoomStatus;

use crate::interval::ScheduleInterval;
use crate::state::SchedulerState;

/// Room counts for one period. The four counts sum to the room count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOccupancy {
    /// Rooms with a confirmed session in the period.
    pub occupied: u32,
    /// Rooms with nothing booked in the period.
    pub available: u32,
    /// Rooms held only by pending reservations in the period.
    pub reserved: u32,
    /// Rooms out of service, permanently or on this date.
    pub blocked: u32,
}

impl PeriodOccupancy {
    /// Sum of all four counts.
    pub fn total(&self) -> u32 {
        self.occupied + self.available + self.reserved + self.blocked
    }

    fn count(&mut self, status: RoomStatus) {
        match status {
            RoomStatus::Available => self.available += 1,
            RoomStatus::Reserved => self.reserved += 1,
            RoomStatus::Occupied => self.occupied += 1,
            RoomStatus::Blocked => self.blocked += 1,
        }
    }
}

/// Occupancy of every room on one date, per categorical period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    /// The date described.
    pub date: NaiveDate,
    /// Number of rooms in the inventory.
    pub total_rooms: u32,
    /// Counts for morning, afternoon, and evening.
    pub periods: BTreeMap<Period, PeriodOccupancy>,
}

/// Read-only aggregation over the scheduler state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardAggregator;

impl DashboardAggregator {
    /// Occupancy on `date`.
    pub fn snapshot_on(state: &SchedulerState, date: NaiveDate) -> AppResult<OccupancySnapshot> {
        let mut periods: BTreeMap<Period, PeriodOccupancy> = Period::CATEGORICAL
            .iter()
            .map(|p| (*p, PeriodOccupancy::default()))
            .collect();

        let mut total_rooms = 0;
        for room in state.registry.all() {
            total_rooms += 1;
            if room.is_blocked() || room.is_blocked_on(date) {
                for counts in periods.values_mut() {
                    counts.count(RoomStatus::Blocked);
                }
                continue;
            }

            let mut meeting = Vec::new();
            for session in state.sessions.for_room(&room.id) {
                let interval = ScheduleInterval::of_session(session)?;
                if interval.holds_on(date) {
                    meeting.push((interval, session.is_confirmed()));
                }
            }

            for (period, counts) in periods.iter_mut() {
                let mut status = RoomStatus::Available;
                for (interval, confirmed) in &meeting {
                    if !interval.covers_period(*period) {
                        continue;
                    }
                    if *confirmed {
                        status = RoomStatus::Occupied;
                        break;
                    }
                    status = RoomStatus::Reserved;
                }
                counts.count(status);
            }
        }

        Ok(OccupancySnapshot {
            date,
            total_rooms,
            periods,
        })
    }

    /// Occupancy today, by the local clock.
    pub fn snapshot(state: &SchedulerState) -> AppResult<OccupancySnapshot> {
        Self::snapshot_on(state, Local::now().date_naive())
    }
}

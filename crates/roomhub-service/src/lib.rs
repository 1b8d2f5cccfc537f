//! # roomhub-service
//!
//! The availability and allocation engine of RoomHub.
//!
//! Leaf components are plain state containers and pure functions:
//! [`RoomRegistry`], [`SessionStore`], [`ScheduleInterval`] (the time model),
//! and [`ConflictDetector`]. [`AllocationEngine`] coordinates them and is the
//! only place room statuses change. [`Scheduler`] owns the mutable state
//! behind a single lock and writes every successful mutation through to the
//! snapshot store; [`DashboardAggregator`] reads it.

pub mod allocation;
pub mod conflict;
pub mod dashboard;
pub mod interval;
pub mod registry;
pub mod scheduler;
pub mod seed;
pub mod sessions;
pub mod state;

pub use allocation::{
    AllocationEngine, AllocationOutcome, Displacement, Proposal, ProposalReason, Relocation,
};
pub use conflict::{Conflict, ConflictDetector};
pub use dashboard::{DashboardAggregator, OccupancySnapshot, PeriodOccupancy};
pub use interval::ScheduleInterval;
pub use registry::{RoomFilter, RoomRegistry};
pub use scheduler::Scheduler;
pub use sessions::SessionStore;
pub use state::SchedulerState;

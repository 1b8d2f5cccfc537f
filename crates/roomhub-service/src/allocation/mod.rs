//! Room allocation: placement search, bookings, reservations, swaps,
//! releases, and derived room status.

pub mod engine;
pub mod proposal;
pub mod status;

pub use engine::AllocationEngine;
pub use proposal::{AllocationOutcome, Displacement, Proposal, ProposalReason, Relocation};
pub use status::derive_status;

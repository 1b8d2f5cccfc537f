//! Values returned by allocation queries and commands.

use serde::{Deserialize, Serialize};

use roomhub_core::types::id::{ClassId, RoomId};
use roomhub_entity::class::{ClassSchedule, ClassSession, NewClassSession};
use roomhub_entity::room::Room;

/// Why a proposal picked its room and dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalReason {
    /// The requested room is free at the requested dates.
    RequestedRoom,
    /// No room was requested; smallest adequate free room.
    BestFit,
    /// The requested room is busy; another room is free at the requested dates.
    SubstituteRoom,
    /// Nothing is free at the requested dates; the pattern is moved later.
    LaterWindow,
}

impl ProposalReason {
    /// Whether `allocate` books this proposal without asking.
    pub fn books_directly(&self) -> bool {
        matches!(self, Self::RequestedRoom | Self::BestFit)
    }
}

impl std::fmt::Display for ProposalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RequestedRoom => "requested room",
            Self::BestFit => "best fit",
            Self::SubstituteRoom => "substitute room",
            Self::LaterWindow => "later window",
        };
        f.write_str(s)
    }
}

/// A placement the engine found for a request.
///
/// Proposals are inert: nothing is booked until one is passed back to
/// `confirm`, which re-checks it against the state at that moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// The original request.
    pub request: NewClassSession,
    /// Room to book.
    pub room_id: RoomId,
    /// Schedule to book; differs from the request only for a later window.
    pub schedule: ClassSchedule,
    /// How the placement was chosen.
    pub reason: ProposalReason,
    /// Sessions that made the requested room or dates unusable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<ClassId>,
}

/// Result of [`AllocationEngine::allocate`](super::AllocationEngine::allocate).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationOutcome {
    /// The class was stored and the room assigned.
    Booked {
        /// The new session.
        class: ClassSession,
        /// The room after its status was refreshed.
        room: Room,
    },
    /// Nothing was stored; the caller may confirm the proposal.
    Suggested {
        /// The suggestion.
        proposal: Proposal,
    },
}

/// An occupant moved out of a room by a displacing reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// The moved session.
    pub class_id: ClassId,
    /// Room it was moved out of.
    pub from: RoomId,
    /// Room it now occupies.
    pub to: RoomId,
}

/// Result of a displacing reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Displacement {
    /// The reserved session.
    pub class: ClassSession,
    /// The reserved room.
    pub room: Room,
    /// Occupants moved elsewhere, in creation order.
    pub moved: Vec<Relocation>,
}

use crate::error::MoveRejection;
use crate::geometry::Vec3;
use crate::roster::{PegId, RingId};

/// Input from the interaction layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionAction {
    Grab { ring: RingId },
    Drag { ring: RingId, position: Vec3 },
    Release { ring: RingId, position: Vec3 },
}

/// Outward signals, drained with `GameSession::take_events`.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Started { rings: usize, pegs: usize },
    Grabbed { ring: RingId },
    MoveRejected { ring: RingId, reason: MoveRejection },
    RingPlaced { ring: RingId, peg: PegId },
    Solved { moves: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionOutcome {
    Grab(crate::state::GrabOutcome),
    Drag { moved: bool },
    Release(crate::state::ReleaseOutcome),
}

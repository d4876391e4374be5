use crate::geometry::Axis;
use crate::roster::{PegId, RingId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("ring roster is empty")]
    EmptyRoster,
    #[error("need at least 2 pegs to tell start from goal, got {found}")]
    TooFewPegs { found: usize },
    #[error("ring {ring} has invalid size {size}")]
    InvalidRingSize { ring: String, size: f32 },
    #[error("rings {first} and {second} share the same size")]
    DuplicateRingSize { first: String, second: String },
    #[error("peg {peg} has a non-finite position")]
    InvalidPegPosition { peg: String },
    #[error("axis {axis:?} is the stacking axis and cannot classify pegs")]
    HeightAxis { axis: Axis },
    #[error("session already started")]
    AlreadyStarted,
}

/// Why a grab or release was refused. Always recovered by rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("unknown ring")]
    UnknownRing,
    #[error("session is not active")]
    SessionInactive,
    #[error("ring is not being held")]
    NotHeld,
    #[error("no peg within tolerance")]
    ClassificationMiss,
    #[error("stack on peg {peg} is out of order")]
    OrderingViolation { peg: PegId },
    #[error("ring is not the top ring, {top} is")]
    NotTopmost { top: RingId },
    #[error("top ring {top} is not larger than the moving ring")]
    TargetTopNotLarger { top: RingId },
}

use crate::error::MoveRejection;
use crate::roster::{PegId, RingId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    Active,
    Solved,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Active)
    }
}

/// A grab waiting for its release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub ring: RingId,
    pub origin: Option<PegId>,
    /// Grab verdict; a refused grab still needs its release to roll back.
    pub grab: Result<(), MoveRejection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabOutcome {
    pub allowed: bool,
    pub rejection: Option<MoveRejection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub accepted: bool,
    pub new_peg: Option<PegId>,
    pub solved: bool,
    pub rejection: Option<MoveRejection>,
}

impl GrabOutcome {
    pub(crate) fn from_result(result: Result<(), MoveRejection>) -> Self {
        Self {
            allowed: result.is_ok(),
            rejection: result.err(),
        }
    }
}

impl ReleaseOutcome {
    pub(crate) fn rejected(rejection: MoveRejection, solved: bool) -> Self {
        Self {
            accepted: false,
            new_peg: None,
            solved,
            rejection: Some(rejection),
        }
    }
}

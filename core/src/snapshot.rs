use crate::geometry::Vec3;
use crate::roster::{PegId, RingId};

/// Positions of every ring, indexed by `RingId`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub positions: Vec<Vec3>,
}

impl PositionSnapshot {
    pub fn position(&self, ring: RingId) -> Option<Vec3> {
        self.positions.get(ring.index()).copied()
    }
}

/// Read-only view of a session for diagnostics and UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub positions: Vec<Vec3>,
    pub assignments: Vec<Option<PegId>>,
    pub held: Vec<RingId>,
    pub moves: u32,
    pub solved: bool,
}

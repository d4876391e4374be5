use std::fmt;

use crate::classify::SpatialClassifier;
use crate::roster::{PegId, Ring, RingId, Roster};

/// Rings on one peg, bottom first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub peg: PegId,
    pub rings: Vec<RingId>,
    pub names: Vec<String>,
}

impl Arrangement {
    fn from_rings(peg: PegId, rings: &[&Ring]) -> Self {
        Self {
            peg,
            rings: rings.iter().map(|ring| ring.id).collect(),
            names: rings.iter().map(|ring| ring.name.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn top(&self) -> Option<RingId> {
        self.rings.last().copied()
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bottom → Top: {}", self.names.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackOrderValidator {
    classifier: SpatialClassifier,
}

impl StackOrderValidator {
    pub fn new(classifier: SpatialClassifier) -> Self {
        Self { classifier }
    }

    fn rings_on<'a>(&self, peg: PegId, roster: &'a Roster) -> Vec<&'a Ring> {
        roster
            .rings()
            .iter()
            .filter(|ring| self.classifier.classify_ring(ring, roster.pegs()) == Some(peg))
            .collect()
    }

    /// Actual stack by height. Equal heights keep roster order.
    pub fn arrangement(&self, peg: PegId, roster: &Roster) -> Arrangement {
        let mut rings = self.rings_on(peg, roster);
        rings.sort_by(|a, b| a.position.height().total_cmp(&b.position.height()));
        Arrangement::from_rings(peg, &rings)
    }

    /// Stack the same rings would form if sorted largest first.
    pub fn expected_arrangement(&self, peg: PegId, roster: &Roster) -> Arrangement {
        let mut rings = self.rings_on(peg, roster);
        rings.sort_by(|a, b| b.size.total_cmp(&a.size));
        Arrangement::from_rings(peg, &rings)
    }

    pub fn is_order_correct(&self, peg: PegId, roster: &Roster) -> bool {
        let actual = self.arrangement(peg, roster);
        if actual.len() < 2 {
            return true;
        }
        actual.rings == self.expected_arrangement(peg, roster).rings
    }

    pub fn ordered_arrangement(&self, peg: PegId, roster: &Roster) -> Option<Arrangement> {
        let actual = self.arrangement(peg, roster);
        if actual.len() < 2 || actual.rings == self.expected_arrangement(peg, roster).rings {
            Some(actual)
        } else {
            None
        }
    }

    /// Highest ring on `peg`, skipping `excluding` (the ring being moved).
    pub fn top_ring(&self, peg: PegId, roster: &Roster, excluding: Option<RingId>) -> Option<RingId> {
        self.arrangement(peg, roster)
            .rings
            .into_iter()
            .rev()
            .find(|id| Some(*id) != excluding)
    }
}

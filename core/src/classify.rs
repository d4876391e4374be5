//! Proximity classification of rings onto pegs.
//!
//! A ring belongs to the peg whose coordinate on the configured axis is
//! within the tolerance of the ring's own coordinate. When tolerance windows
//! overlap the nearest peg wins, and an exact distance tie goes to the
//! earlier peg, so every ring lands on at most one peg.

use crate::geometry::{nearly_equal, planar_distance, Axis, Vec3};
use crate::roster::{Peg, PegId, Ring, RingId, Roster};
use crate::rules::PuzzleRules;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialClassifier {
    pub axis: Axis,
    pub tolerance: f32,
    pub snap_radius: f32,
}

impl SpatialClassifier {
    pub fn new(rules: &PuzzleRules) -> Self {
        Self {
            axis: rules.axis,
            tolerance: rules.tolerance,
            snap_radius: rules.snap_radius,
        }
    }

    pub fn classify(&self, point: Vec3, pegs: &[Peg]) -> Option<PegId> {
        let coord = self.axis.component(point);
        if !coord.is_finite() {
            return None;
        }
        let mut best: Option<(PegId, f32)> = None;
        for peg in pegs {
            let peg_coord = self.axis.component(peg.position);
            if !nearly_equal(peg_coord, coord, self.tolerance) {
                continue;
            }
            let distance = (peg_coord - coord).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((peg.id, distance)),
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn classify_ring(&self, ring: &Ring, pegs: &[Peg]) -> Option<PegId> {
        self.classify(ring.position, pegs)
    }

    /// Rings currently classified onto `peg`, in roster order.
    pub fn rings_on(&self, peg: PegId, roster: &Roster) -> Vec<RingId> {
        roster
            .rings()
            .iter()
            .filter(|ring| self.classify_ring(ring, roster.pegs()) == Some(peg))
            .map(|ring| ring.id)
            .collect()
    }

    /// Peg for a release point: classified on the axis and within the snap
    /// radius of the peg base in the ground plane.
    pub fn resolve_drop(&self, point: Vec3, pegs: &[Peg]) -> Option<PegId> {
        let id = self.classify(point, pegs)?;
        let peg = pegs.iter().find(|peg| peg.id == id)?;
        if planar_distance(point, peg.position) <= self.snap_radius {
            Some(id)
        } else {
            None
        }
    }
}

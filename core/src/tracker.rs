use crate::classify::SpatialClassifier;
use crate::geometry::Vec3;
use crate::order::StackOrderValidator;
use crate::roster::{PegId, RingId, Roster};
use crate::snapshot::PositionSnapshot;

/// Owns the authoritative ring positions and the rollback buffer.
///
/// `roster` holds live positions, including rings dragged mid-air.
/// `resting` holds where every ring last came to rest; it only changes on
/// setup and on a committed release. Rules are checked against the resting
/// view, so a held ring keeps its slot until its own release settles it.
#[derive(Debug, Clone)]
pub struct PuzzleStateTracker {
    roster: Roster,
    classifier: SpatialClassifier,
    base_offset: f32,
    resting: PositionSnapshot,
    in_flight: Vec<RingId>,
}

impl PuzzleStateTracker {
    pub fn new(roster: Roster, classifier: SpatialClassifier, base_offset: f32) -> Self {
        let resting = PositionSnapshot {
            positions: roster.positions(),
        };
        Self {
            roster,
            classifier,
            base_offset,
            resting,
            in_flight: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn resting(&self) -> &PositionSnapshot {
        &self.resting
    }

    /// Copy of the roster with every ring at its resting position.
    pub fn settled(&self) -> Roster {
        let mut roster = self.roster.clone();
        roster.restore_positions(&self.resting.positions);
        roster
    }

    /// Rings grabbed and not yet released, in grab order.
    pub fn in_flight(&self) -> &[RingId] {
        &self.in_flight
    }

    pub fn is_in_flight(&self, ring: RingId) -> bool {
        self.in_flight.contains(&ring)
    }

    /// Starts a gesture on `ring`. Grabbing a ring already in flight keeps
    /// its resting position.
    pub fn begin_grab(&mut self, ring: RingId) -> bool {
        if self.roster.ring(ring).is_none() {
            return false;
        }
        if !self.is_in_flight(ring) {
            self.in_flight.push(ring);
        }
        true
    }

    /// Settles `ring` at `position` and ends its gesture.
    pub fn commit_release(&mut self, ring: RingId, position: Vec3) -> bool {
        if !self.set_ring_position(ring, position) {
            return false;
        }
        if let Some(slot) = self.resting.positions.get_mut(ring.index()) {
            *slot = position;
        }
        self.in_flight.retain(|id| *id != ring);
        true
    }

    pub fn set_ring_position(&mut self, ring: RingId, position: Vec3) -> bool {
        match self.roster.ring_mut(ring) {
            Some(ring) => {
                ring.position = position;
                true
            }
            None => false,
        }
    }

    /// Ends the gesture on `ring` and puts every ring that is not still held
    /// back where it rested. Returns false when `ring` was not in flight.
    pub fn rollback(&mut self, ring: RingId) -> bool {
        let Some(idx) = self.in_flight.iter().position(|id| *id == ring) else {
            return false;
        };
        self.in_flight.remove(idx);
        let settle: Vec<RingId> = self
            .roster
            .rings()
            .iter()
            .map(|ring| ring.id)
            .filter(|id| !self.in_flight.contains(id))
            .collect();
        for id in settle {
            if let Some(position) = self.resting.position(id) {
                self.set_ring_position(id, position);
            }
        }
        true
    }

    /// Live classification, following a dragged ring.
    pub fn peg_of(&self, ring: RingId) -> Option<PegId> {
        let ring = self.roster.ring(ring)?;
        self.classifier.classify_ring(ring, self.roster.pegs())
    }

    pub fn resting_peg_of(&self, ring: RingId) -> Option<PegId> {
        let position = self.resting.position(ring)?;
        self.classifier.classify(position, self.roster.pegs())
    }

    /// Every ring resting on the last peg. Classification is recomputed each
    /// call.
    pub fn is_solved(&self) -> bool {
        let Some(goal) = self.roster.goal_peg() else {
            return false;
        };
        let total = self.roster.rings().len();
        total > 0 && self.classifier.rings_on(goal.id, &self.settled()).len() == total
    }

    /// Where `ring` comes to rest when snapped onto the top of `peg`.
    pub fn stack_position(&self, ring: RingId, peg: PegId) -> Option<Vec3> {
        let moving = self.roster.ring(ring)?;
        let base = self.roster.peg(peg)?.position;
        let settled = self.settled();
        let validator = StackOrderValidator::new(self.classifier);
        let height = match validator
            .top_ring(peg, &settled, Some(ring))
            .and_then(|top| settled.ring(top))
        {
            Some(top) => top.position.height() + top.thickness * 0.5 + moving.thickness * 0.5,
            None => base.height() + self.base_offset + moving.thickness * 0.5,
        };
        Some(base.with_height(height))
    }

    /// Stacks every ring on the start peg, largest at the bottom.
    pub fn initial_stack(&mut self) {
        let Some(start) = self.roster.start_peg().map(|peg| peg.position) else {
            return;
        };
        let mut order: Vec<(RingId, f32, f32)> = self
            .roster
            .rings()
            .iter()
            .map(|ring| (ring.id, ring.size, ring.thickness))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut current = start.height() + self.base_offset;
        for (id, _, thickness) in order {
            self.set_ring_position(id, start.with_height(current + thickness * 0.5));
            current += thickness;
        }
        self.resting.positions = self.roster.positions();
        self.in_flight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{PegSpec, RingSpec};
    use crate::rules::PuzzleRules;

    fn tracker() -> PuzzleStateTracker {
        let rules = PuzzleRules::default();
        let roster =
            Roster::build(RingSpec::graded(3, 3.0, 1.0, 0.2), PegSpec::row(3, 1.0), &rules).expect("roster");
        let mut tracker = PuzzleStateTracker::new(roster, SpatialClassifier::new(&rules), rules.base_offset);
        tracker.initial_stack();
        tracker
    }

    #[test]
    fn initial_stack_puts_largest_at_bottom() {
        let tracker = tracker();
        let heights: Vec<f32> = tracker.roster().rings().iter().map(|r| r.position.y).collect();
        assert!(heights[0] < heights[1] && heights[1] < heights[2]);
        assert!((heights[0] - 0.2).abs() < 1e-6);
        assert!((0..3).all(|idx| tracker.peg_of(RingId(idx)) == Some(PegId(0))));
        assert_eq!(tracker.resting().positions, tracker.roster().positions());
    }

    #[test]
    fn rollback_restores_all_rings() {
        let mut tracker = tracker();
        let before = tracker.roster().positions();
        assert!(tracker.begin_grab(RingId(2)));
        assert_eq!(tracker.resting().position(RingId(2)), Some(before[2]));
        tracker.set_ring_position(RingId(2), Vec3::new(0.0, 0.3, 2.0));
        tracker.set_ring_position(RingId(0), Vec3::new(9.0, 9.0, 9.0));
        assert!(tracker.rollback(RingId(2)));
        assert_eq!(tracker.roster().positions(), before);
        assert!(tracker.in_flight().is_empty());
    }

    #[test]
    fn rollback_without_gesture_is_noop() {
        let mut tracker = tracker();
        assert!(!tracker.rollback(RingId(2)));
        assert!(!tracker.begin_grab(RingId(7)));
    }

    #[test]
    fn rollback_leaves_other_held_ring_in_the_air() {
        let mut tracker = tracker();
        let before = tracker.roster().positions();
        let hovering = Vec3::new(0.0, 2.0, 1.5);
        tracker.begin_grab(RingId(2));
        tracker.set_ring_position(RingId(2), hovering);
        tracker.begin_grab(RingId(1));
        tracker.set_ring_position(RingId(1), Vec3::new(0.0, 2.0, 2.0));
        assert!(tracker.rollback(RingId(1)));
        assert_eq!(tracker.roster().positions(), vec![before[0], before[1], hovering]);
        assert_eq!(tracker.in_flight(), &[RingId(2)]);
        // the settled view still has ring 2 on top of the start peg
        assert_eq!(tracker.resting_peg_of(RingId(2)), Some(PegId(0)));
        assert_eq!(tracker.peg_of(RingId(2)), None);
    }

    #[test]
    fn commit_updates_resting_position() {
        let mut tracker = tracker();
        tracker.begin_grab(RingId(2));
        let target = tracker.stack_position(RingId(2), PegId(1)).expect("position");
        assert!(tracker.commit_release(RingId(2), target));
        assert_eq!(tracker.resting().position(RingId(2)), Some(target));
        assert!(!tracker.is_in_flight(RingId(2)));
        assert!(!tracker.rollback(RingId(2)));
        assert_eq!(tracker.peg_of(RingId(2)), Some(PegId(1)));
    }

    #[test]
    fn stack_position_sits_on_top_ring() {
        let tracker = tracker();
        let empty = tracker.stack_position(RingId(2), PegId(2)).expect("position");
        assert_eq!(empty.z, 2.0);
        assert!((empty.y - 0.2).abs() < 1e-6);
        let on_top = tracker.stack_position(RingId(2), PegId(0)).expect("position");
        // ring 1 center is at 0.4, ring 2 sits half a thickness above its top
        assert!((on_top.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn stack_position_ignores_rings_hovering_over_target() {
        let mut tracker = tracker();
        tracker.begin_grab(RingId(2));
        tracker.set_ring_position(RingId(2), Vec3::new(0.0, 1.5, 1.0));
        let landing = tracker.stack_position(RingId(1), PegId(1)).expect("position");
        assert!((landing.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn solved_only_when_all_rest_on_goal() {
        let mut tracker = tracker();
        assert!(!tracker.is_solved());
        for idx in 0..3 {
            tracker.commit_release(RingId(idx), Vec3::new(0.0, 0.2 * idx as f32, 2.0));
        }
        assert!(tracker.is_solved());
        tracker.begin_grab(RingId(1));
        tracker.set_ring_position(RingId(1), Vec3::new(0.0, 0.2, 1.0));
        assert!(tracker.is_solved());
        tracker.commit_release(RingId(1), Vec3::new(0.0, 0.2, 1.0));
        assert!(!tracker.is_solved());
    }
}

use crate::classify::SpatialClassifier;
use crate::error::MoveRejection;
use crate::order::StackOrderValidator;
use crate::roster::{PegId, RingId, Roster};
use crate::state::SessionState;

/// Grab and release legality. Pure predicates over the roster passed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAuthorizer {
    classifier: SpatialClassifier,
    validator: StackOrderValidator,
}

impl MoveAuthorizer {
    pub fn new(classifier: SpatialClassifier) -> Self {
        Self {
            classifier,
            validator: StackOrderValidator::new(classifier),
        }
    }

    pub fn check_grab(
        &self,
        ring: RingId,
        roster: &Roster,
        state: SessionState,
    ) -> Result<(), MoveRejection> {
        if !state.is_active() {
            return Err(MoveRejection::SessionInactive);
        }
        let ring_ref = roster.ring(ring).ok_or(MoveRejection::UnknownRing)?;
        let peg = self
            .classifier
            .classify_ring(ring_ref, roster.pegs())
            .ok_or(MoveRejection::ClassificationMiss)?;
        if !self.validator.is_order_correct(peg, roster) {
            return Err(MoveRejection::OrderingViolation { peg });
        }
        match self.validator.top_ring(peg, roster, None) {
            Some(top) if top == ring => Ok(()),
            Some(top) => Err(MoveRejection::NotTopmost { top }),
            None => Err(MoveRejection::ClassificationMiss),
        }
    }

    pub fn can_grab(&self, ring: RingId, roster: &Roster, state: SessionState) -> bool {
        self.check_grab(ring, roster, state).is_ok()
    }

    pub fn check_release(
        &self,
        ring: RingId,
        target: Option<PegId>,
        roster: &Roster,
        state: SessionState,
    ) -> Result<(), MoveRejection> {
        if !state.is_active() {
            return Err(MoveRejection::SessionInactive);
        }
        let moving = roster.ring(ring).ok_or(MoveRejection::UnknownRing)?;
        let target = target.ok_or(MoveRejection::ClassificationMiss)?;
        let Some(top) = self.validator.top_ring(target, roster, Some(ring)) else {
            return Ok(());
        };
        let top_size = roster.ring(top).map(|r| r.size).unwrap_or(f32::NAN);
        // strict: equal sizes never stack
        if top_size > moving.size {
            Ok(())
        } else {
            Err(MoveRejection::TargetTopNotLarger { top })
        }
    }

    pub fn can_release(
        &self,
        ring: RingId,
        target: Option<PegId>,
        roster: &Roster,
        state: SessionState,
    ) -> bool {
        self.check_release(ring, target, roster, state).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::roster::{PegSpec, RingSpec};
    use crate::rules::PuzzleRules;

    // sizes 3, 2, 1 stacked on peg 0 with ring 0 at the bottom
    fn stacked() -> Roster {
        let rules = PuzzleRules::default();
        let mut roster =
            Roster::build(RingSpec::graded(3, 3.0, 1.0, 0.1), PegSpec::row(3, 1.0), &rules).expect("roster");
        for idx in 0..3 {
            if let Some(ring) = roster.ring_mut(RingId(idx)) {
                ring.position = Vec3::new(0.0, 0.15 + 0.1 * idx as f32, 0.0);
            }
        }
        roster
    }

    fn authorizer() -> MoveAuthorizer {
        MoveAuthorizer::new(SpatialClassifier::new(&PuzzleRules::default()))
    }

    #[test]
    fn only_topmost_can_be_grabbed() {
        let roster = stacked();
        let auth = authorizer();
        assert!(auth.can_grab(RingId(2), &roster, SessionState::Active));
        assert_eq!(
            auth.check_grab(RingId(1), &roster, SessionState::Active),
            Err(MoveRejection::NotTopmost { top: RingId(2) })
        );
        assert!(!auth.can_grab(RingId(0), &roster, SessionState::Active));
    }

    #[test]
    fn inactive_or_solved_rejects_everything() {
        let roster = stacked();
        let auth = authorizer();
        for state in [SessionState::Inactive, SessionState::Solved] {
            assert_eq!(
                auth.check_grab(RingId(2), &roster, state),
                Err(MoveRejection::SessionInactive)
            );
            assert!(!auth.can_release(RingId(2), Some(PegId(1)), &roster, state));
        }
    }

    #[test]
    fn grab_refused_on_corrupted_stack() {
        let mut roster = stacked();
        if let Some(ring) = roster.ring_mut(RingId(0)) {
            ring.position.y = 5.0;
        }
        assert_eq!(
            authorizer().check_grab(RingId(0), &roster, SessionState::Active),
            Err(MoveRejection::OrderingViolation { peg: PegId(0) })
        );
    }

    #[test]
    fn grab_refused_off_peg() {
        let mut roster = stacked();
        if let Some(ring) = roster.ring_mut(RingId(2)) {
            ring.position.z = 0.5;
        }
        assert_eq!(
            authorizer().check_grab(RingId(2), &roster, SessionState::Active),
            Err(MoveRejection::ClassificationMiss)
        );
    }

    #[test]
    fn release_needs_strictly_larger_top() {
        let mut roster = stacked();
        // ring 2 (size 1) alone on peg 1
        if let Some(ring) = roster.ring_mut(RingId(2)) {
            ring.position = Vec3::new(0.0, 0.15, 1.0);
        }
        let auth = authorizer();
        assert!(auth.can_release(RingId(1), Some(PegId(2)), &roster, SessionState::Active));
        assert_eq!(
            auth.check_release(RingId(1), Some(PegId(1)), &roster, SessionState::Active),
            Err(MoveRejection::TargetTopNotLarger { top: RingId(2) })
        );
        assert_eq!(
            auth.check_release(RingId(1), None, &roster, SessionState::Active),
            Err(MoveRejection::ClassificationMiss)
        );
    }

    #[test]
    fn release_ignores_moving_ring_on_target() {
        let roster = stacked();
        // top ring dropped back on its own peg lands on ring 1 (size 2)
        assert!(authorizer().can_release(RingId(2), Some(PegId(0)), &roster, SessionState::Active));
    }
}

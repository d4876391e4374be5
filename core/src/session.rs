//! Session lifecycle and grab/release mediation.
//!
//! `GameSession` is the only entry point the interaction layer needs. It
//! owns the roster through `PuzzleStateTracker` and hands it by reference to
//! the classifier, validator and authorizer on every event. Illegal moves
//! never panic or return errors: they roll back to the resting positions
//! and surface as a `MoveRejection` plus a queued event. Each held ring has
//! its own gesture, so releasing one never disturbs another still in the air.

use tracing::{debug, info, warn};

use crate::action::{ActionOutcome, SessionAction, SessionEvent};
use crate::authorize::MoveAuthorizer;
use crate::classify::SpatialClassifier;
use crate::error::{MoveRejection, SetupError};
use crate::geometry::Vec3;
use crate::order::{Arrangement, StackOrderValidator};
use crate::roster::{Peg, PegId, PegSpec, Ring, RingId, RingSpec, Roster};
use crate::rules::PuzzleRules;
use crate::snapshot::SessionSnapshot;
use crate::state::{Gesture, GrabOutcome, ReleaseOutcome, SessionState};
use crate::tracker::PuzzleStateTracker;

#[derive(Debug, Clone)]
pub struct GameSession {
    rules: PuzzleRules,
    classifier: SpatialClassifier,
    validator: StackOrderValidator,
    authorizer: MoveAuthorizer,
    state: SessionState,
    tracker: Option<PuzzleStateTracker>,
    gestures: Vec<Gesture>,
    moves: u32,
    events: Vec<SessionEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(PuzzleRules::default())
    }
}

impl GameSession {
    pub fn new(rules: PuzzleRules) -> Self {
        let rules = rules.sanitized();
        let classifier = SpatialClassifier::new(&rules);
        Self {
            rules,
            classifier,
            validator: StackOrderValidator::new(classifier),
            authorizer: MoveAuthorizer::new(classifier),
            state: SessionState::Inactive,
            tracker: None,
            gestures: Vec::new(),
            moves: 0,
            events: Vec::new(),
        }
    }

    /// Builds the roster, stacks every ring on the start peg and activates
    /// the session. On error the session is left untouched.
    pub fn start_session(
        &mut self,
        rings: Vec<RingSpec>,
        pegs: Vec<PegSpec>,
    ) -> Result<(), SetupError> {
        if self.state != SessionState::Inactive || self.tracker.is_some() {
            return Err(SetupError::AlreadyStarted);
        }
        let roster = Roster::build(rings, pegs, &self.rules)?;
        let ring_count = roster.rings().len();
        let peg_count = roster.pegs().len();
        let mut tracker = PuzzleStateTracker::new(roster, self.classifier, self.rules.base_offset);
        tracker.initial_stack();
        self.tracker = Some(tracker);
        self.state = SessionState::Active;
        self.events.push(SessionEvent::Started {
            rings: ring_count,
            pegs: peg_count,
        });
        info!(rings = ring_count, pegs = peg_count, "session started");
        Ok(())
    }

    /// Starts a gesture on `ring`. Several rings may be held at once; a
    /// second grab of a ring already held replaces its gesture.
    pub fn on_grab_attempt(&mut self, ring: RingId) -> GrabOutcome {
        let state = self.state;
        let Some(tracker) = self.tracker.as_mut() else {
            return self.reject_grab(ring, MoveRejection::SessionInactive);
        };
        if !tracker.begin_grab(ring) {
            return self.reject_grab(ring, MoveRejection::UnknownRing);
        }
        let origin = tracker.resting_peg_of(ring);
        let verdict = self.authorizer.check_grab(ring, &tracker.settled(), state);
        self.gestures.retain(|gesture| gesture.ring != ring);
        self.gestures.push(Gesture {
            ring,
            origin,
            grab: verdict,
        });
        match verdict {
            Ok(()) => {
                debug!(%ring, held = self.gestures.len(), "grab allowed");
                self.events.push(SessionEvent::Grabbed { ring });
                GrabOutcome::from_result(verdict)
            }
            Err(reason) => self.reject_grab(ring, reason),
        }
    }

    fn reject_grab(&mut self, ring: RingId, reason: MoveRejection) -> GrabOutcome {
        debug!(%ring, %reason, "grab rejected");
        self.events.push(SessionEvent::MoveRejected { ring, reason });
        GrabOutcome::from_result(Err(reason))
    }

    /// Follows a held ring. Positions mid-gesture are not validated.
    pub fn on_drag(&mut self, ring: RingId, position: Vec3) -> bool {
        if !self.is_held(ring) {
            return false;
        }
        self.tracker
            .as_mut()
            .is_some_and(|tracker| tracker.set_ring_position(ring, position))
    }

    pub fn on_release_attempt(&mut self, ring: RingId, position: Vec3) -> ReleaseOutcome {
        let state = self.state;
        let solved = state == SessionState::Solved;
        let Some(tracker) = self.tracker.as_mut() else {
            return self.reject_release(ring, MoveRejection::SessionInactive, false);
        };
        let Some(idx) = self.gestures.iter().position(|gesture| gesture.ring == ring) else {
            return self.reject_release(ring, MoveRejection::NotHeld, false);
        };
        let gesture = self.gestures.remove(idx);

        tracker.set_ring_position(ring, position);
        let settled = tracker.settled();
        let target = self.classifier.resolve_drop(position, settled.pegs());
        let verdict = gesture
            .grab
            .and_then(|()| self.authorizer.check_release(ring, target, &settled, state));
        let peg = match (verdict, target) {
            (Ok(()), Some(peg)) => peg,
            (Err(reason), _) => return self.reject_release(ring, reason, true),
            (Ok(()), None) => {
                return self.reject_release(ring, MoveRejection::ClassificationMiss, true)
            }
        };

        let Some(resting) = tracker.stack_position(ring, peg) else {
            return self.reject_release(ring, MoveRejection::UnknownRing, true);
        };
        let mut placed = settled;
        if let Some(moving) = placed.ring_mut(ring) {
            moving.position = resting;
        }
        if !self.validator.is_order_correct(peg, &placed) {
            warn!(%ring, %peg, "placement broke stack order");
            return self.reject_release(ring, MoveRejection::OrderingViolation { peg }, true);
        }
        tracker.commit_release(ring, resting);

        if gesture.origin != Some(peg) {
            self.moves = self.moves.saturating_add(1);
        }
        debug!(%ring, %peg, moves = self.moves, "release accepted");
        self.events.push(SessionEvent::RingPlaced { ring, peg });

        let now_solved = !solved && tracker.is_solved();
        if now_solved {
            self.state = SessionState::Solved;
            self.events.push(SessionEvent::Solved { moves: self.moves });
            info!(moves = self.moves, "puzzle solved");
        }
        ReleaseOutcome {
            accepted: true,
            new_peg: Some(peg),
            solved: self.state == SessionState::Solved,
            rejection: None,
        }
    }

    fn reject_release(
        &mut self,
        ring: RingId,
        reason: MoveRejection,
        roll_back: bool,
    ) -> ReleaseOutcome {
        if roll_back {
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.rollback(ring);
            }
        }
        debug!(%ring, %reason, "release rejected");
        self.events.push(SessionEvent::MoveRejected { ring, reason });
        ReleaseOutcome::rejected(reason, self.state == SessionState::Solved)
    }

    pub fn apply_action(&mut self, action: SessionAction) -> ActionOutcome {
        match action {
            SessionAction::Grab { ring } => ActionOutcome::Grab(self.on_grab_attempt(ring)),
            SessionAction::Drag { ring, position } => ActionOutcome::Drag {
                moved: self.on_drag(ring, position),
            },
            SessionAction::Release { ring, position } => {
                ActionOutcome::Release(self.on_release_attempt(ring, position))
            }
        }
    }

    /// Ring ids on `peg`, bottom to top.
    pub fn query_arrangement(&self, peg: PegId) -> Vec<RingId> {
        self.arrangement(peg)
            .map(|arrangement| arrangement.rings)
            .unwrap_or_default()
    }

    pub fn arrangement(&self, peg: PegId) -> Option<Arrangement> {
        let roster = self.tracker.as_ref()?.roster();
        roster.peg(peg)?;
        Some(self.validator.arrangement(peg, roster))
    }

    /// The arrangement, or `None` when the stack is out of order.
    pub fn ordered_arrangement(&self, peg: PegId) -> Option<Arrangement> {
        let roster = self.tracker.as_ref()?.roster();
        roster.peg(peg)?;
        self.validator.ordered_arrangement(peg, roster)
    }

    pub fn is_order_correct(&self, peg: PegId) -> bool {
        self.tracker
            .as_ref()
            .is_some_and(|tracker| self.validator.is_order_correct(peg, tracker.roster()))
    }

    pub fn is_session_solved(&self) -> bool {
        self.state == SessionState::Solved
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn rules(&self) -> &PuzzleRules {
        &self.rules
    }

    pub fn rings(&self) -> &[Ring] {
        self.tracker
            .as_ref()
            .map(|tracker| tracker.roster().rings())
            .unwrap_or(&[])
    }

    pub fn pegs(&self) -> &[Peg] {
        self.tracker
            .as_ref()
            .map(|tracker| tracker.roster().pegs())
            .unwrap_or(&[])
    }

    pub fn peg_of(&self, ring: RingId) -> Option<PegId> {
        self.tracker.as_ref()?.peg_of(ring)
    }

    /// Rings with a gesture in flight, in grab order.
    pub fn held(&self) -> Vec<RingId> {
        self.gestures.iter().map(|gesture| gesture.ring).collect()
    }

    pub fn is_held(&self, ring: RingId) -> bool {
        self.gestures.iter().any(|gesture| gesture.ring == ring)
    }

    /// Accepted releases that moved a ring to a different peg.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn optimal_move_count(&self) -> u64 {
        let rings = self.rings().len() as u32;
        1u64.checked_shl(rings).map_or(u64::MAX, |v| v - 1)
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let tracker = self.tracker.as_ref()?;
        let roster = tracker.roster();
        Some(SessionSnapshot {
            positions: roster.rings().iter().map(|ring| ring.position).collect(),
            assignments: roster
                .rings()
                .iter()
                .map(|ring| tracker.peg_of(ring.id))
                .collect(),
            held: self.held(),
            moves: self.moves,
            solved: self.is_session_solved(),
        })
    }
}

use crate::error::MoveRejection;
use crate::roster::PegId;
use crate::session::GameSession;
use crate::state::ReleaseOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub from: PegId,
    pub to: PegId,
}

/// Shortest move sequence taking `rings` rings from `from` to `to`.
pub fn plan(rings: usize, from: PegId, via: PegId, to: PegId) -> Vec<PlannedMove> {
    let mut moves = Vec::new();
    plan_into(rings, from, via, to, &mut moves);
    moves
}

fn plan_into(rings: usize, from: PegId, via: PegId, to: PegId, out: &mut Vec<PlannedMove>) {
    if rings == 0 {
        return;
    }
    plan_into(rings - 1, from, to, via, out);
    out.push(PlannedMove { from, to });
    plan_into(rings - 1, via, from, to, out);
}

/// Plan for a freshly started session: start peg to goal peg through the
/// second peg.
pub fn plan_for(session: &GameSession) -> Vec<PlannedMove> {
    let pegs = session.pegs();
    if pegs.len() < 3 {
        return Vec::new();
    }
    plan(session.rings().len(), PegId(0), PegId(1), PegId(pegs.len() - 1))
}

/// Grabs the top ring of `from` and releases it over `to`, the way a hand
/// would.
pub fn perform_move(
    session: &mut GameSession,
    from: PegId,
    to: PegId,
) -> Result<ReleaseOutcome, MoveRejection> {
    let ring = session
        .arrangement(from)
        .and_then(|arrangement| arrangement.top())
        .ok_or(MoveRejection::ClassificationMiss)?;
    let target = session
        .pegs()
        .get(to.index())
        .map(|peg| peg.position)
        .ok_or(MoveRejection::ClassificationMiss)?;
    let grab = session.on_grab_attempt(ring);
    let release = session.on_release_attempt(ring, target.with_height(target.height() + 1.0));
    if let Some(reason) = grab.rejection {
        return Err(reason);
    }
    match release.rejection {
        Some(reason) => Err(reason),
        None => Ok(release),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_length_is_minimal() {
        for rings in 0..8 {
            let moves = plan(rings, PegId(0), PegId(1), PegId(2));
            assert_eq!(moves.len(), (1usize << rings) - 1);
        }
    }

    #[test]
    fn three_ring_plan_matches_classic_sequence() {
        let moves: Vec<(usize, usize)> = plan(3, PegId(0), PegId(1), PegId(2))
            .into_iter()
            .map(|m| (m.from.index(), m.to.index()))
            .collect();
        assert_eq!(moves, vec![(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)]);
    }
}

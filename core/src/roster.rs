use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::geometry::Vec3;
use crate::rules::PuzzleRules;

/// Index of a ring in the session roster. Stable for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RingId(pub usize);

/// Index of a peg in the roster, after sorting by classification coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PegId(pub usize);

impl RingId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl PegId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ring#{}", self.0)
    }
}

impl fmt::Display for PegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peg#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingSpec {
    pub name: String,
    pub size: f32,
    pub thickness: f32,
}

impl RingSpec {
    pub fn new(name: impl Into<String>, size: f32, thickness: f32) -> Self {
        Self {
            name: name.into(),
            size,
            thickness,
        }
    }

    /// `count` rings, each `step` smaller than the previous one.
    pub fn graded(count: usize, largest: f32, step: f32, thickness: f32) -> Vec<RingSpec> {
        (0..count)
            .map(|idx| RingSpec::new(format!("Donut {}", idx + 1), largest - step * idx as f32, thickness))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PegSpec {
    pub name: String,
    pub position: Vec3,
}

impl PegSpec {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// `count` pegs spaced `spacing` apart along `Z`.
    pub fn row(count: usize, spacing: f32) -> Vec<PegSpec> {
        (0..count)
            .map(|idx| PegSpec::new(format!("Tower {}", idx + 1), Vec3::new(0.0, 0.0, spacing * idx as f32)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: RingId,
    pub name: String,
    pub size: f32,
    pub thickness: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Peg {
    pub id: PegId,
    pub name: String,
    pub position: Vec3,
}

/// Rings and pegs of one session. The only source of truth for positions.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    rings: Vec<Ring>,
    pegs: Vec<Peg>,
}

impl Roster {
    pub fn build(
        rings: Vec<RingSpec>,
        pegs: Vec<PegSpec>,
        rules: &PuzzleRules,
    ) -> Result<Self, SetupError> {
        if rules.axis.is_height() {
            return Err(SetupError::HeightAxis { axis: rules.axis });
        }
        if rings.is_empty() {
            return Err(SetupError::EmptyRoster);
        }
        if pegs.len() < 2 {
            return Err(SetupError::TooFewPegs { found: pegs.len() });
        }
        for ring in &rings {
            if !ring.size.is_finite() || ring.size <= 0.0 {
                return Err(SetupError::InvalidRingSize {
                    ring: ring.name.clone(),
                    size: ring.size,
                });
            }
        }
        if !rules.allow_duplicate_sizes {
            for (idx, ring) in rings.iter().enumerate() {
                if let Some(other) = rings[idx + 1..].iter().find(|other| other.size == ring.size) {
                    return Err(SetupError::DuplicateRingSize {
                        first: ring.name.clone(),
                        second: other.name.clone(),
                    });
                }
            }
        }
        if let Some(peg) = pegs.iter().find(|peg| !peg.position.is_finite()) {
            return Err(SetupError::InvalidPegPosition {
                peg: peg.name.clone(),
            });
        }

        let mut pegs = pegs;
        // sort_by is stable, equal coordinates keep caller order
        pegs.sort_by(|a, b| {
            rules
                .axis
                .component(a.position)
                .total_cmp(&rules.axis.component(b.position))
        });
        let pegs = pegs
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| Peg {
                id: PegId(idx),
                name: entry.name,
                position: entry.position,
            })
            .collect();
        let rings = rings
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| Ring {
                id: RingId(idx),
                name: entry.name,
                size: entry.size,
                thickness: if entry.thickness.is_finite() {
                    entry.thickness.max(0.0)
                } else {
                    0.0
                },
                position: Vec3::ZERO,
            })
            .collect();
        Ok(Self { rings, pegs })
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    pub fn ring(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(id.0)
    }

    pub fn peg(&self, id: PegId) -> Option<&Peg> {
        self.pegs.get(id.0)
    }

    pub fn start_peg(&self) -> Option<&Peg> {
        self.pegs.first()
    }

    pub fn goal_peg(&self) -> Option<&Peg> {
        self.pegs.last()
    }

    pub(crate) fn ring_mut(&mut self, id: RingId) -> Option<&mut Ring> {
        self.rings.get_mut(id.0)
    }

    pub(crate) fn positions(&self) -> Vec<Vec3> {
        self.rings.iter().map(|ring| ring.position).collect()
    }

    pub(crate) fn restore_positions(&mut self, positions: &[Vec3]) {
        for (ring, pos) in self.rings.iter_mut().zip(positions) {
            ring.position = *pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_sorts_pegs_along_axis() {
        let pegs = vec![
            PegSpec::new("right", Vec3::new(0.0, 0.0, 2.0)),
            PegSpec::new("left", Vec3::new(0.0, 0.0, -1.0)),
            PegSpec::new("middle", Vec3::new(0.0, 0.0, 0.5)),
        ];
        let roster = Roster::build(RingSpec::graded(2, 1.0, 0.1, 0.1), pegs, &PuzzleRules::default())
            .expect("roster");
        let names: Vec<&str> = roster.pegs().iter().map(|peg| peg.name.as_str()).collect();
        assert_eq!(names, vec!["left", "middle", "right"]);
        assert_eq!(roster.start_peg().map(|peg| peg.id), Some(PegId(0)));
        assert_eq!(roster.goal_peg().map(|peg| peg.id), Some(PegId(2)));
    }

    #[test]
    fn build_rejects_empty_and_single_peg() {
        let rules = PuzzleRules::default();
        assert_eq!(
            Roster::build(Vec::new(), PegSpec::row(3, 1.0), &rules).unwrap_err(),
            SetupError::EmptyRoster
        );
        assert_eq!(
            Roster::build(RingSpec::graded(3, 1.0, 0.1, 0.1), PegSpec::row(1, 1.0), &rules).unwrap_err(),
            SetupError::TooFewPegs { found: 1 }
        );
    }

    #[test]
    fn build_rejects_height_axis() {
        let rules = PuzzleRules {
            axis: crate::geometry::Axis::Y,
            ..PuzzleRules::default()
        };
        assert!(matches!(
            Roster::build(RingSpec::graded(2, 1.0, 0.1, 0.1), PegSpec::row(3, 1.0), &rules),
            Err(SetupError::HeightAxis { .. })
        ));
    }

    #[test]
    fn duplicate_sizes_follow_rules() {
        let rings = vec![RingSpec::new("a", 1.0, 0.1), RingSpec::new("b", 1.0, 0.1)];
        let strict = Roster::build(rings.clone(), PegSpec::row(3, 1.0), &PuzzleRules::default());
        assert!(matches!(strict, Err(SetupError::DuplicateRingSize { .. })));
        let permissive = PuzzleRules {
            allow_duplicate_sizes: true,
            ..PuzzleRules::default()
        };
        assert!(Roster::build(rings, PegSpec::row(3, 1.0), &permissive).is_ok());
    }

    #[test]
    fn graded_rings_shrink() {
        let rings = RingSpec::graded(3, 1.0, 0.25, 0.1);
        let sizes: Vec<f32> = rings.iter().map(|ring| ring.size).collect();
        assert_eq!(sizes, vec![1.0, 0.75, 0.5]);
        assert_eq!(rings[2].name, "Donut 3");
    }
}

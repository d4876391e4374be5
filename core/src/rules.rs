use serde::{Deserialize, Serialize};

use crate::geometry::Axis;

pub const TOLERANCE_DEFAULT: f32 = 0.4;
pub const TOLERANCE_MIN: f32 = 0.01;
pub const TOLERANCE_MAX: f32 = 10.0;

pub const SNAP_RADIUS_DEFAULT: f32 = 0.5;
pub const SNAP_RADIUS_MIN: f32 = 0.01;
pub const SNAP_RADIUS_MAX: f32 = 10.0;

pub const BASE_OFFSET_DEFAULT: f32 = 0.1;
pub const BASE_OFFSET_MIN: f32 = 0.0;
pub const BASE_OFFSET_MAX: f32 = 1.0;

/// Tunables for classification and stacking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleRules {
    /// Axis along which rings are matched to pegs. `Y` is the stacking
    /// axis and is replaced by the default.
    pub axis: Axis,
    /// Maximum axis distance for a ring to count as on a peg (inclusive).
    pub tolerance: f32,
    /// Maximum ground-plane distance between a release point and a peg base.
    pub snap_radius: f32,
    /// Gap between a peg base and the bottom ring.
    pub base_offset: f32,
    pub allow_duplicate_sizes: bool,
}

impl Default for PuzzleRules {
    fn default() -> Self {
        Self {
            axis: Axis::Z,
            tolerance: TOLERANCE_DEFAULT,
            snap_radius: SNAP_RADIUS_DEFAULT,
            base_offset: BASE_OFFSET_DEFAULT,
            allow_duplicate_sizes: false,
        }
    }
}

impl PuzzleRules {
    pub fn sanitized(self) -> Self {
        Self {
            axis: if self.axis.is_height() {
                Axis::default()
            } else {
                self.axis
            },
            tolerance: clamp_or(self.tolerance, TOLERANCE_MIN, TOLERANCE_MAX, TOLERANCE_DEFAULT),
            snap_radius: clamp_or(
                self.snap_radius,
                SNAP_RADIUS_MIN,
                SNAP_RADIUS_MAX,
                SNAP_RADIUS_DEFAULT,
            ),
            base_offset: clamp_or(
                self.base_offset,
                BASE_OFFSET_MIN,
                BASE_OFFSET_MAX,
                BASE_OFFSET_DEFAULT,
            ),
            allow_duplicate_sizes: self.allow_duplicate_sizes,
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

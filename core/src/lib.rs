pub mod action;
pub mod authorize;
pub mod classify;
pub mod error;
pub mod geometry;
pub mod order;
pub mod roster;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod solver;
pub mod state;
pub mod tracker;

pub use action::{ActionOutcome, SessionAction, SessionEvent};
pub use authorize::MoveAuthorizer;
pub use classify::SpatialClassifier;
pub use error::{MoveRejection, SetupError};
pub use geometry::{Axis, Vec3};
pub use order::{Arrangement, StackOrderValidator};
pub use roster::{Peg, PegId, PegSpec, Ring, RingId, RingSpec, Roster};
pub use rules::PuzzleRules;
pub use session::GameSession;
pub use snapshot::{PositionSnapshot, SessionSnapshot};
pub use state::{Gesture, GrabOutcome, ReleaseOutcome, SessionState};
pub use tracker::PuzzleStateTracker;

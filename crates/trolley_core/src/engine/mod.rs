//! The simulation engine: track geometry, decision gate, victims,
//! collision detection and the round sequencer that ties them together.

pub mod collision;
pub mod config;
pub mod gate;
pub mod sequencer;
pub mod track;
pub mod victims;

pub use collision::CollisionDetector;
pub use config::{EngineConfig, SequenceEndPolicy, TrackConfig};
pub use gate::{CommitOutcome, DecisionGate, GatePhase};
pub use sequencer::{LevelSequencer, RoundSummary, TickOutcome, VehicleState};
pub use track::TrackGeometry;
pub use victims::{Victim, VictimSet};

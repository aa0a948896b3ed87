//! # trolley_core - Deterministic Trolley-Track Decision Simulation Engine
//!
//! Simulates a vehicle on a track that splits into two lanes and re-merges.
//! Before the split an operator commits to a lane; victims on the unchosen
//! lane survive, those on the chosen lane are struck. Across a sequence of
//! levels the accumulated decisions reduce to an ethical-archetype verdict.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same run)
//! - Tick-driven: one logical update per call, driven by the host scheduler
//! - Pure analyser boundary reusable on externally recorded decision logs
//! - JSON API for easy integration with game engines and UIs

pub mod analysis;
pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use analysis::{analyse, analyse_records, DecisionInput, RunReport, Verdict};
pub use api::{analyse_run_json, simulate_run_json, LevelCounts, RunRequest, RunResponse};
pub use engine::{
    CollisionDetector, DecisionGate, EngineConfig, GatePhase, LevelSequencer, RoundSummary,
    SequenceEndPolicy, TickOutcome, TrackConfig, TrackGeometry, VehicleState, Victim, VictimSet,
};
pub use error::{ConfigError, Result, SimError};
pub use models::{default_campaign, Choice, DecisionRecord, Lane, Level, RunLog};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

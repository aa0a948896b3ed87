//! Round lifecycle driver.
//!
//! Owns the whole simulation context (vehicle, gate, victims, run log,
//! seeded RNG) and advances it one logical update per tick. An external
//! scheduler calls [`LevelSequencer::tick`]; rendering, input and progress
//! consumers use the read-only views. Same seed, same inputs: same run.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::collision::CollisionDetector;
use crate::engine::config::{EngineConfig, SequenceEndPolicy};
use crate::engine::gate::{DecisionGate, GatePhase};
use crate::engine::track::TrackGeometry;
use crate::engine::victims::VictimSet;
use crate::error::ConfigError;
use crate::models::{Choice, DecisionRecord, Lane, Level, RunLog};

/// Vehicle kinematic state for the current round.
///
/// `committed` is monotone within a round: false to true at most once,
/// reset only when the next round begins. `lane` is the realized lane and
/// never changes after commitment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VehicleState {
    pub longitudinal_position: f64,
    /// Realized lane; `None` until the gate commits.
    pub lane: Option<Lane>,
    pub committed: bool,
}

/// Aggregated outcome of one finished round.
#[derive(Debug, Clone, Copy, Serialize, JsonSchema)]
pub struct RoundSummary {
    pub level_index: u32,
    #[schemars(with = "String")]
    pub choice: Choice,
    pub realized_lane: Lane,
    pub struck: u32,
    pub spared: u32,
}

/// The most significant thing a tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Waiting for the first input; nothing moved.
    Paused,
    /// Vehicle advanced.
    Advanced,
    /// The lane was committed on this tick; a record was appended.
    Committed,
    /// The round finished on this tick.
    RoundComplete,
    /// Sequence exhausted under the halt policy; ticks are now no-ops.
    Halted,
}

#[derive(Debug)]
pub struct LevelSequencer {
    config: EngineConfig,
    geometry: TrackGeometry,
    detector: CollisionDetector,
    levels: Vec<Level>,
    cursor: usize,
    vehicle: VehicleState,
    gate: DecisionGate,
    victims: VictimSet,
    log: RunLog,
    rounds: Vec<RoundSummary>,
    seed: u64,
    rng: ChaCha8Rng,
    exhausted: bool,
}

impl LevelSequencer {
    /// Build a sequencer over an ordered level list and begin the first
    /// round. The seed fixes the fallback-lane draws for the whole run.
    pub fn new(config: EngineConfig, levels: Vec<Level>, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelSequence);
        }
        let geometry = TrackGeometry::new(config.track.clone());
        let detector = CollisionDetector::new(&config);
        let start_x = config.track.start_x;
        let mut sequencer = Self {
            config,
            geometry,
            detector,
            levels,
            cursor: 0,
            vehicle: VehicleState {
                longitudinal_position: start_x,
                lane: None,
                committed: false,
            },
            gate: DecisionGate::new(),
            victims: VictimSet::default(),
            log: RunLog::new(),
            rounds: Vec::new(),
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            exhausted: false,
        };
        sequencer.begin_round();
        Ok(sequencer)
    }

    /// Apply a lane-selection event from the input producer.
    pub fn select_lane(&mut self, lane: Lane) -> bool {
        self.gate.select(lane)
    }

    /// Arm the current round without a lane selection; commitment will fall
    /// back to a random lane while recording the absence of input.
    pub fn arm(&mut self) -> bool {
        self.gate.arm()
    }

    /// One logical update. Advances the vehicle when the round is armed,
    /// commits the lane at the gate boundary (appending the decision record
    /// at that instant), applies collisions, and completes the round at the
    /// end of the visible span. The tick after a completed round advances
    /// the cursor and resets per-round state.
    pub fn tick(&mut self) -> TickOutcome {
        if self.exhausted {
            return TickOutcome::Halted;
        }
        match self.gate.phase() {
            GatePhase::AwaitingChoice => TickOutcome::Paused,
            GatePhase::RoundComplete => self.advance_round(),
            GatePhase::Armed | GatePhase::Committed => self.advance_vehicle(),
        }
    }

    fn advance_vehicle(&mut self) -> TickOutcome {
        let x = self.vehicle.longitudinal_position + self.config.vehicle_speed;
        self.vehicle.longitudinal_position = x;
        let mut outcome = TickOutcome::Advanced;

        if !self.vehicle.committed && x >= self.config.track.gate_entry_x {
            // The selection freezes the moment the vehicle reaches the gate.
            let commit = self
                .gate
                .try_commit(&mut self.rng)
                .unwrap_or_else(|| panic!("gate must be armed while the vehicle advances"));
            self.vehicle.lane = Some(commit.realized_lane);
            self.vehicle.committed = true;
            let level = self.levels[self.cursor];
            self.log.append(DecisionRecord {
                level_index: self.cursor as u32,
                top_count: level.top_count,
                bottom_count: level.bottom_count,
                choice: commit.recorded_choice,
            });
            info!(
                level = self.cursor,
                lane = ?commit.realized_lane,
                choice = commit.recorded_choice.tag(),
                "decision recorded"
            );
            outcome = TickOutcome::Committed;
        }

        if let Some(lane) = self.vehicle.lane {
            self.detector.update(&mut self.victims, lane, x);
        }

        if x >= self.config.track.end_x {
            self.gate.complete_round();
            self.rounds.push(self.summarize_round());
            debug!(level = self.cursor, "round complete");
            outcome = TickOutcome::RoundComplete;
        }
        outcome
    }

    fn summarize_round(&self) -> RoundSummary {
        let realized_lane = self
            .vehicle
            .lane
            .unwrap_or_else(|| panic!("round completed without a committed lane"));
        let choice = self
            .log
            .records()
            .last()
            .map(|r| r.choice)
            .unwrap_or(Choice::Unset);
        RoundSummary {
            level_index: self.cursor as u32,
            choice,
            realized_lane,
            struck: self.victims.struck_count(),
            spared: self.victims.spared_count(),
        }
    }

    fn advance_round(&mut self) -> TickOutcome {
        let next = self.cursor + 1;
        if next >= self.levels.len() {
            match self.config.sequence_end {
                SequenceEndPolicy::Halt => {
                    self.exhausted = true;
                    self.victims = VictimSet::default();
                    info!(rounds = self.rounds.len(), "level sequence exhausted");
                    return TickOutcome::Halted;
                }
                SequenceEndPolicy::Wrap => self.cursor = 0,
            }
        } else {
            self.cursor = next;
        }
        self.begin_round();
        TickOutcome::Paused
    }

    /// Reset every per-round piece of state for the level under the cursor.
    /// The run log and round summaries survive.
    fn begin_round(&mut self) {
        let level = self.levels[self.cursor];
        self.victims = VictimSet::from_level(
            &level,
            self.config.track.branch_midpoint_x(),
            self.config.victim_spacing,
        );
        self.vehicle = VehicleState {
            longitudinal_position: self.config.track.start_x,
            lane: None,
            committed: false,
        };
        self.gate.reset();
        debug!(
            level = self.cursor,
            top = level.top_count,
            bottom = level.bottom_count,
            "round started"
        );
    }

    /// Full-run reset: back to the first level with a cleared log, cleared
    /// summaries and the RNG re-seeded, so the rerun reproduces exactly.
    pub fn reset_run(&mut self) {
        self.cursor = 0;
        self.log.clear();
        self.rounds.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.exhausted = false;
        self.begin_round();
    }

    /// Drive the current round to completion with one scripted input:
    /// `Some(lane)` selects, `None` leaves the choice to fate. Returns the
    /// finished round's summary, or `None` once the sequence has halted.
    pub fn play_round(&mut self, choice: Option<Lane>) -> Option<RoundSummary> {
        if self.exhausted {
            return None;
        }
        if matches!(self.gate.phase(), GatePhase::RoundComplete) {
            self.tick();
            if self.exhausted {
                return None;
            }
        }
        match choice {
            Some(lane) => self.select_lane(lane),
            None => self.arm(),
        };
        loop {
            match self.tick() {
                TickOutcome::RoundComplete => break,
                TickOutcome::Halted => return None,
                _ => {}
            }
        }
        self.rounds.last().copied()
    }

    // ------------------------------------------------------------------
    // Read-only consumer views
    // ------------------------------------------------------------------

    /// Render view: vehicle kinematics.
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// Render view: lateral offset of the vehicle at its current position.
    /// Before commitment this follows the pending selection; ahead of the
    /// gate the offset is lane-independent anyway.
    pub fn lateral_offset(&self) -> f64 {
        let lane = self
            .vehicle
            .lane
            .or(self.gate.selection())
            .unwrap_or(Lane::Bottom);
        self.geometry
            .lateral_offset(self.vehicle.longitudinal_position, lane)
    }

    /// Render view: victim positions and strike flags.
    pub fn victims(&self) -> &VictimSet {
        &self.victims
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    /// Input view: gate state, for enabling or disabling selection UI.
    pub fn gate(&self) -> &DecisionGate {
        &self.gate
    }

    /// Progress view: the decision log so far.
    pub fn run_log(&self) -> &RunLog {
        &self.log
    }

    /// Progress view: per-round outcomes so far.
    pub fn rounds(&self) -> &[RoundSummary] {
        &self.rounds
    }

    pub fn level_index(&self) -> usize {
        self.cursor
    }

    pub fn active_level(&self) -> Level {
        self.levels[self.cursor]
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer(levels: Vec<Level>) -> LevelSequencer {
        LevelSequencer::new(EngineConfig::default(), levels, 42).unwrap()
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let err = LevelSequencer::new(EngineConfig::default(), vec![], 0).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLevelSequence));
    }

    #[test]
    fn test_round_pauses_until_first_input() {
        let mut seq = sequencer(vec![Level::new(1, 5)]);
        let start = seq.vehicle().longitudinal_position;
        for _ in 0..10 {
            assert_eq!(seq.tick(), TickOutcome::Paused);
        }
        assert_eq!(seq.vehicle().longitudinal_position, start);
        seq.select_lane(Lane::Top);
        assert_eq!(seq.tick(), TickOutcome::Advanced);
        assert!(seq.vehicle().longitudinal_position > start);
    }

    #[test]
    fn test_record_appended_at_commit_instant_not_round_end() {
        let mut seq = sequencer(vec![Level::new(1, 5)]);
        seq.select_lane(Lane::Top);
        let mut committed_at = None;
        for _ in 0..1000 {
            match seq.tick() {
                TickOutcome::Committed => {
                    committed_at = Some(seq.vehicle().longitudinal_position);
                    break;
                }
                TickOutcome::RoundComplete => panic!("round ended before commitment"),
                _ => {}
            }
        }
        let x = committed_at.expect("no commitment observed");
        assert!(x >= 200.0 && x < 800.0);
        assert_eq!(seq.run_log().len(), 1);
        let record = seq.run_log().records()[0];
        assert_eq!(record.choice, Choice::Top);
        assert_eq!(record.top_count, 1);
        assert_eq!(record.bottom_count, 5);
    }

    #[test]
    fn test_exactly_one_record_per_round() {
        let mut seq = sequencer(vec![Level::new(1, 5), Level::new(5, 1)]);
        seq.play_round(Some(Lane::Top));
        assert_eq!(seq.run_log().len(), 1);
        seq.play_round(Some(Lane::Bottom));
        assert_eq!(seq.run_log().len(), 2);
        assert_eq!(seq.run_log().records()[1].level_index, 1);
    }

    #[test]
    fn test_selection_changeable_until_gate() {
        let mut seq = sequencer(vec![Level::new(2, 3)]);
        seq.select_lane(Lane::Top);
        // Flip the selection a few ticks before the gate.
        for _ in 0..10 {
            seq.tick();
        }
        assert!(seq.select_lane(Lane::Bottom));
        let summary = finish_round(&mut seq);
        assert_eq!(summary.realized_lane, Lane::Bottom);
        assert_eq!(summary.choice, Choice::Bottom);
    }

    fn finish_round(seq: &mut LevelSequencer) -> RoundSummary {
        loop {
            if seq.tick() == TickOutcome::RoundComplete {
                return *seq.rounds().last().unwrap();
            }
        }
    }

    #[test]
    fn test_chosen_lane_strikes_other_lane_spared() {
        let mut seq = sequencer(vec![Level::new(2, 3)]);
        let summary = seq.play_round(Some(Lane::Bottom)).unwrap();
        assert_eq!(summary.struck, 3);
        assert_eq!(summary.spared, 2);
    }

    #[test]
    fn test_fallback_round_records_unset_but_strikes() {
        let mut seq = sequencer(vec![Level::new(2, 2)]);
        let summary = seq.play_round(None).unwrap();
        assert_eq!(summary.choice, Choice::Unset);
        assert_eq!(summary.struck, 2);
        assert_eq!(seq.run_log().records()[0].choice, Choice::Unset);
    }

    #[test]
    fn test_no_strike_state_leaks_between_rounds() {
        let mut seq = sequencer(vec![Level::new(1, 1), Level::new(1, 1)]);
        seq.play_round(Some(Lane::Top));
        let second = seq.play_round(Some(Lane::Bottom)).unwrap();
        assert_eq!(second.struck, 1);
        assert_eq!(second.spared, 1);
    }

    #[test]
    fn test_halt_policy_stops_after_last_level() {
        let mut seq = sequencer(vec![Level::new(1, 0)]);
        seq.play_round(Some(Lane::Top));
        assert!(seq.play_round(Some(Lane::Bottom)).is_none());
        assert!(seq.is_exhausted());
        assert_eq!(seq.tick(), TickOutcome::Halted);
        // The log survives exhaustion.
        assert_eq!(seq.run_log().len(), 1);
    }

    #[test]
    fn test_wrap_policy_restarts_from_first_level() {
        let mut config = EngineConfig::default();
        config.sequence_end = SequenceEndPolicy::Wrap;
        let mut seq =
            LevelSequencer::new(config, vec![Level::new(1, 2), Level::new(3, 4)], 7).unwrap();
        seq.play_round(Some(Lane::Top));
        seq.play_round(Some(Lane::Top));
        let third = seq.play_round(Some(Lane::Top)).unwrap();
        assert_eq!(third.level_index, 0);
        assert_eq!(seq.run_log().len(), 3);
    }

    #[test]
    fn test_reset_run_clears_log_and_reproduces() {
        let mut seq = sequencer(vec![Level::new(1, 5), Level::new(5, 1)]);
        seq.play_round(None);
        seq.play_round(None);
        let first_lanes: Vec<Lane> = seq.rounds().iter().map(|r| r.realized_lane).collect();
        seq.reset_run();
        assert!(seq.run_log().is_empty());
        assert!(seq.rounds().is_empty());
        seq.play_round(None);
        seq.play_round(None);
        let second_lanes: Vec<Lane> = seq.rounds().iter().map(|r| r.realized_lane).collect();
        assert_eq!(first_lanes, second_lanes);
    }

    #[test]
    fn test_lane_immutable_after_commit() {
        let mut seq = sequencer(vec![Level::new(1, 1)]);
        seq.select_lane(Lane::Top);
        loop {
            if seq.tick() == TickOutcome::Committed {
                break;
            }
        }
        assert!(!seq.select_lane(Lane::Bottom));
        assert_eq!(seq.vehicle().lane, Some(Lane::Top));
        finish_round(&mut seq);
        assert_eq!(seq.rounds()[0].realized_lane, Lane::Top);
    }

    #[test]
    fn test_lateral_offset_tracks_committed_lane() {
        let mut seq = sequencer(vec![Level::new(1, 1)]);
        seq.select_lane(Lane::Bottom);
        // Run into the branch span.
        while seq.vehicle().longitudinal_position < 400.0 {
            seq.tick();
        }
        assert_eq!(seq.lateral_offset(), 30.0);
    }
}

//! Decision gate: owns the current round's lane selection and the moment it
//! becomes binding.

use rand::Rng;
use tracing::debug;

use crate::models::{Choice, Lane};

/// Gate lifecycle for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Round paused; nothing picked yet and the vehicle does not advance.
    AwaitingChoice,
    /// Vehicle advancing; the selection may still change.
    Armed,
    /// Lane locked for the remainder of the round.
    Committed,
    /// Vehicle reached the end of the visible span.
    RoundComplete,
}

/// What a commitment produced: the lane the vehicle will physically take,
/// and the choice that goes on the record. These differ exactly when the
/// operator never selected: the realized lane is drawn at random while the
/// record keeps `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub realized_lane: Lane,
    pub recorded_choice: Choice,
}

impl Default for GatePhase {
    fn default() -> Self {
        GatePhase::AwaitingChoice
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionGate {
    phase: GatePhase,
    selection: Option<Lane>,
    committed: Option<CommitOutcome>,
}

impl DecisionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Current selection; changeable until commitment.
    pub fn selection(&self) -> Option<Lane> {
        self.selection
    }

    /// The lane frozen at the gate boundary, if committed.
    pub fn committed_lane(&self) -> Option<Lane> {
        self.committed.map(|c| c.realized_lane)
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Whether selection input is currently accepted. Input UIs read this to
    /// enable or disable lane controls.
    pub fn accepts_selection(&self) -> bool {
        matches!(self.phase, GatePhase::AwaitingChoice | GatePhase::Armed)
    }

    /// Whether the vehicle is held at the start of the round.
    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GatePhase::AwaitingChoice)
    }

    /// Apply a lane-selection event. The first selection arms the round;
    /// while armed, later selections overwrite earlier ones (last write
    /// wins). Returns whether the event was accepted.
    pub fn select(&mut self, lane: Lane) -> bool {
        match self.phase {
            GatePhase::AwaitingChoice => {
                self.selection = Some(lane);
                self.phase = GatePhase::Armed;
                debug!(?lane, "first selection, round armed");
                true
            }
            GatePhase::Armed => {
                self.selection = Some(lane);
                true
            }
            GatePhase::Committed | GatePhase::RoundComplete => false,
        }
    }

    /// Arm the round without selecting a lane: the operator lets the vehicle
    /// roll and leaves the choice to fate. Commitment will then fall back to
    /// a random lane while recording the absence of input.
    pub fn arm(&mut self) -> bool {
        match self.phase {
            GatePhase::AwaitingChoice => {
                self.phase = GatePhase::Armed;
                true
            }
            GatePhase::Armed => true,
            GatePhase::Committed | GatePhase::RoundComplete => false,
        }
    }

    /// Freeze the current selection at the gate boundary. With no selection
    /// made, a fallback lane is drawn uniformly from `rng`; the recorded
    /// choice stays `Unset` and only the realized lane drives motion and
    /// collisions. Returns `None` unless the gate is armed.
    pub fn try_commit<R: Rng>(&mut self, rng: &mut R) -> Option<CommitOutcome> {
        if !matches!(self.phase, GatePhase::Armed) {
            return None;
        }
        let outcome = match self.selection {
            Some(lane) => CommitOutcome {
                realized_lane: lane,
                recorded_choice: Choice::from(lane),
            },
            None => {
                let lane = if rng.gen_bool(0.5) {
                    Lane::Top
                } else {
                    Lane::Bottom
                };
                CommitOutcome {
                    realized_lane: lane,
                    recorded_choice: Choice::Unset,
                }
            }
        };
        self.phase = GatePhase::Committed;
        self.committed = Some(outcome);
        debug!(
            lane = ?outcome.realized_lane,
            choice = outcome.recorded_choice.tag(),
            "lane committed"
        );
        Some(outcome)
    }

    /// Mark the round finished. Valid only once committed; the phase can
    /// then only be left through [`DecisionGate::reset`].
    pub fn complete_round(&mut self) -> bool {
        if matches!(self.phase, GatePhase::Committed) {
            self.phase = GatePhase::RoundComplete;
            true
        } else {
            false
        }
    }

    /// Sequencer-issued reset back to the start of a fresh round.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

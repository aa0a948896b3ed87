//! JSON boundary for host applications.
//!
//! Two entry points: [`analyse_run_json`] scores an externally supplied
//! decision log, [`simulate_run_json`] drives a full scripted run through
//! the engine and scores the result. Both take and return JSON strings so
//! embedders never link against the engine types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{analyse, analyse_records, DecisionInput, RunReport};
use crate::engine::{EngineConfig, LevelSequencer, RoundSummary};
use crate::error::{Result, SimError};
use crate::models::{Choice, DecisionRecord, Level};
use crate::SCHEMA_VERSION;

/// Scripted-run request.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RunRequest {
    pub schema_version: u8,
    /// Fixes the fallback-lane draws; same seed, same output bytes.
    pub seed: u64,
    pub levels: Vec<LevelCounts>,
    /// One entry per level, matched by position. A missing entry (or an
    /// explicit `"Unset"`) leaves that round's choice to fate.
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub config: Option<EngineConfig>,
}

/// Victim counts for one level. Either naming convention is accepted per
/// lane; the first key wins, then the synonym, then 0. Signed on the wire
/// so that negative counts surface as a configuration error instead of a
/// parse failure.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
pub struct LevelCounts {
    #[serde(default)]
    pub top: Option<i64>,
    #[serde(default)]
    pub up: Option<i64>,
    #[serde(default)]
    pub bottom: Option<i64>,
    #[serde(default)]
    pub down: Option<i64>,
}

impl LevelCounts {
    fn resolve(&self) -> (i64, i64) {
        (
            self.top.or(self.up).unwrap_or(0),
            self.bottom.or(self.down).unwrap_or(0),
        )
    }
}

/// Scripted-run response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct RunResponse {
    pub schema_version: u8,
    pub decisions: Vec<DecisionRecord>,
    pub rounds: Vec<RoundSummary>,
    pub report: RunReport,
}

/// Score an externally supplied decision log.
///
/// Input: JSON array of decision objects, each with a lane-count pair under
/// either naming convention (`top`/`up`, `bottom`/`down`) and an optional
/// `choice` tag (`"T"`, `"B"`; anything else or absent reads as unset).
pub fn analyse_run_json(input: &str) -> Result<String> {
    let decisions: Vec<DecisionInput> = serde_json::from_str(input)?;
    debug!(count = decisions.len(), "analysing decision log");
    let report = analyse(&decisions);
    Ok(serde_json::to_string(&report)?)
}

/// Drive a full scripted run through the engine and score it.
pub fn simulate_run_json(input: &str) -> Result<String> {
    let request: RunRequest = serde_json::from_str(input)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::UnsupportedSchema {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let levels = request
        .levels
        .iter()
        .map(|counts| {
            let (top, bottom) = counts.resolve();
            Level::from_signed(top, bottom)
        })
        .collect::<std::result::Result<Vec<Level>, _>>()?;
    let round_count = levels.len();

    let config = request.config.unwrap_or_default();
    let mut sequencer = LevelSequencer::new(config, levels, request.seed)?;
    info!(rounds = round_count, seed = request.seed, "scripted run");

    for index in 0..round_count {
        let choice = request.choices.get(index).copied().unwrap_or(Choice::Unset);
        sequencer.play_round(choice.lane());
    }

    let response = RunResponse {
        schema_version: SCHEMA_VERSION,
        decisions: sequencer.run_log().records().to_vec(),
        rounds: sequencer.rounds().to_vec(),
        report: analyse_records(sequencer.run_log()),
    };
    Ok(serde_json::to_string(&response)?)
}

//! Decision-log reducer: aggregate metrics and the verdict table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Choice, DecisionRecord, RunLog};

/// One analysable decision.
///
/// Counts may arrive under either naming convention per lane (`top`/`up`,
/// `bottom`/`down`). Resolution order: the first key if present, else the
/// synonym, else 0. A missing or unrecognized choice tag reads as `Unset`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct DecisionInput {
    #[serde(default)]
    pub top: Option<u32>,
    #[serde(default)]
    pub up: Option<u32>,
    #[serde(default)]
    pub bottom: Option<u32>,
    #[serde(default)]
    pub down: Option<u32>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub choice: Choice,
}

impl DecisionInput {
    pub fn new(top: u32, bottom: u32, choice: Choice) -> Self {
        Self {
            top: Some(top),
            bottom: Some(bottom),
            choice,
            ..Self::default()
        }
    }

    pub fn top_count(&self) -> u32 {
        self.top.or(self.up).unwrap_or(0)
    }

    pub fn bottom_count(&self) -> u32 {
        self.bottom.or(self.down).unwrap_or(0)
    }
}

impl From<&DecisionRecord> for DecisionInput {
    fn from(record: &DecisionRecord) -> Self {
        Self::new(record.top_count, record.bottom_count, record.choice)
    }
}

/// Ethical archetype, ordered from least agency to most deliberate harm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Verdict {
    #[serde(rename = "Detached Bystander")]
    DetachedBystander,
    #[serde(rename = "Heroic Utilitarian")]
    HeroicUtilitarian,
    #[serde(rename = "Calculating Pragmatist")]
    CalculatingPragmatist,
    #[serde(rename = "Chaos Conductor")]
    ChaosConductor,
    #[serde(rename = "Cold Strategist")]
    ColdStrategist,
    #[serde(rename = "Malevolent Mastermind")]
    MalevolentMastermind,
    #[serde(rename = "Pure Evil")]
    PureEvil,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::DetachedBystander => "Detached Bystander",
            Verdict::HeroicUtilitarian => "Heroic Utilitarian",
            Verdict::CalculatingPragmatist => "Calculating Pragmatist",
            Verdict::ChaosConductor => "Chaos Conductor",
            Verdict::ColdStrategist => "Cold Strategist",
            Verdict::MalevolentMastermind => "Malevolent Mastermind",
            Verdict::PureEvil => "Pure Evil",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Verdict::DetachedBystander => "You let fate decide.",
            Verdict::HeroicUtilitarian => "You cut losses wherever you could.",
            Verdict::CalculatingPragmatist => "Feelings off, calculator on.",
            Verdict::ChaosConductor => "Equal parts mercy and mayhem.",
            Verdict::ColdStrategist => "Your math favoured the massacre.",
            Verdict::MalevolentMastermind => "You steered straight into crowds.",
            Verdict::PureEvil => "All aboard the pain train.",
        }
    }

    /// First match wins; low-agency players are classified before any
    /// compassion band is considered. The agency comparison is strict, so
    /// exactly 0.2 is not a bystander.
    fn classify(agency: f64, compassion: f64) -> Self {
        if agency < 0.2 {
            Verdict::DetachedBystander
        } else if compassion >= 0.5 {
            Verdict::HeroicUtilitarian
        } else if compassion >= 0.2 {
            Verdict::CalculatingPragmatist
        } else if compassion > -0.2 {
            Verdict::ChaosConductor
        } else if compassion >= -0.5 {
            Verdict::ColdStrategist
        } else if compassion >= -0.8 {
            Verdict::MalevolentMastermind
        } else {
            Verdict::PureEvil
        }
    }
}

/// Aggregate verdict for a full run. Serializes with the camelCase field
/// set the progress/log consumers expect: `verdict`, `tagline`,
/// `livesLost`, `potentialSaved`, `agency`, `compassion`, `summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub verdict: Verdict,
    pub tagline: String,
    pub lives_lost: u64,
    pub potential_saved: i64,
    pub agency: f64,
    pub compassion: f64,
    pub summary: String,
}

/// Reduce an ordered decision sequence to its verdict.
///
/// Per decision: the worst case adds `max(top, bottom)` casualties; a
/// deliberate choice kills its own lane and saves the other; an unset
/// choice saves nobody and is penalized by the imbalance it refused to
/// resolve. Agency is the deliberate fraction; compassion rescales lives
/// lost so that all-spared is +1, half is 0, none-spared is -1.
pub fn analyse(decisions: &[DecisionInput]) -> RunReport {
    let mut lives_lost: u64 = 0;
    let mut agency_count: u64 = 0;
    let mut max_casualties: u64 = 0;
    let mut potential_saved: i64 = 0;

    for decision in decisions {
        let top = u64::from(decision.top_count());
        let bottom = u64::from(decision.bottom_count());
        max_casualties += top.max(bottom);
        match decision.choice {
            Choice::Top => {
                lives_lost += top;
                potential_saved += bottom as i64;
                agency_count += 1;
            }
            Choice::Bottom => {
                lives_lost += bottom;
                potential_saved += top as i64;
                agency_count += 1;
            }
            Choice::Unset => {
                potential_saved -= (top as i64 - bottom as i64).abs();
            }
        }
    }

    let agency = round2(if decisions.is_empty() {
        0.0
    } else {
        agency_count as f64 / decisions.len() as f64
    });
    let compassion = round2(if max_casualties == 0 {
        0.0
    } else {
        1.0 - 2.0 * (lives_lost as f64 / max_casualties as f64)
    });

    let verdict = Verdict::classify(agency, compassion);
    RunReport {
        verdict,
        tagline: verdict.tagline().to_string(),
        lives_lost,
        potential_saved,
        agency,
        compassion,
        summary: format!("{} — {}", verdict.label(), verdict.tagline()),
    }
}

/// Convenience wrapper over a sequencer-produced [`RunLog`].
pub fn analyse_records(log: &RunLog) -> RunReport {
    let inputs: Vec<DecisionInput> = log.records().iter().map(DecisionInput::from).collect();
    analyse(&inputs)
}

/// Two decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

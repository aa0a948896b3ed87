//! Lane identifiers, recorded choices and the append-only decision log.

use schemars::JsonSchema;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// One of the two parallel tracks a vehicle can occupy past the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Lane {
    Top,
    Bottom,
}

impl Lane {
    pub fn opposite(self) -> Self {
        match self {
            Lane::Top => Lane::Bottom,
            Lane::Bottom => Lane::Top,
        }
    }
}

/// Recorded operator input for a round.
///
/// `Unset` marks the absence of deliberate input; the lane the vehicle
/// physically took in that case is tracked on the vehicle state, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Choice {
    Top,
    Bottom,
    #[default]
    Unset,
}

impl Choice {
    pub fn is_deliberate(self) -> bool {
        !matches!(self, Choice::Unset)
    }

    pub fn lane(self) -> Option<Lane> {
        match self {
            Choice::Top => Some(Lane::Top),
            Choice::Bottom => Some(Lane::Bottom),
            Choice::Unset => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Choice::Top => "T",
            Choice::Bottom => "B",
            Choice::Unset => "Unset",
        }
    }
}

impl From<Lane> for Choice {
    fn from(lane: Lane) -> Self {
        match lane {
            Lane::Top => Choice::Top,
            Lane::Bottom => Choice::Bottom,
        }
    }
}

// Wire format follows the decision-log convention: "T" / "B" tags, anything
// else (including absent fields, handled by Default) reads as Unset.
impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(match tag.as_deref() {
            Some("T") | Some("Top") | Some("top") => Choice::Top,
            Some("B") | Some("Bottom") | Some("bottom") => Choice::Bottom,
            _ => Choice::Unset,
        })
    }
}

/// One committed round. Appended to [`RunLog`] at the commitment instant and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionRecord {
    pub level_index: u32,
    pub top_count: u32,
    pub bottom_count: u32,
    #[schemars(with = "String")]
    pub choice: Choice,
}

/// Ordered, append-only decision history for a full run.
///
/// Persists across rounds; cleared only by an explicit full-run reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunLog {
    records: Vec<DecisionRecord>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: DecisionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

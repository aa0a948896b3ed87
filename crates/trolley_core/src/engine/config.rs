//! Central tuning constants for the simulation.
//!
//! All track landmarks, vehicle kinematics and victim layout numbers live
//! here so a host application can rebalance the game from one place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Lane;

/// Longitudinal landmarks and lateral offsets of the track.
///
/// The track runs left to right: mainline, a blend into two branches, a
/// straight branch span holding the victims, and a symmetric blend back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackConfig {
    /// Vehicle spawn position.
    pub start_x: f64,
    /// Where the lane choice becomes binding and the approach blend begins.
    pub gate_entry_x: f64,
    /// Where the lanes reach full separation.
    pub branch_start_x: f64,
    /// Where the lanes begin converging again.
    pub branch_end_x: f64,
    /// Where both lanes have re-joined the mainline.
    pub merge_exit_x: f64,
    /// End of the visible span; the round completes here.
    pub end_x: f64,
    /// Lateral offset of the mainline.
    pub mainline_offset: f64,
    /// Lateral offset of the top branch.
    pub top_offset: f64,
    /// Lateral offset of the bottom branch.
    pub bottom_offset: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            gate_entry_x: 200.0,
            branch_start_x: 320.0,
            branch_end_x: 480.0,
            merge_exit_x: 600.0,
            end_x: 800.0,
            mainline_offset: 0.0,
            top_offset: -30.0,
            bottom_offset: 30.0,
        }
    }
}

impl TrackConfig {
    pub fn branch_offset(&self, lane: Lane) -> f64 {
        match lane {
            Lane::Top => self.top_offset,
            Lane::Bottom => self.bottom_offset,
        }
    }

    /// Midpoint of the straight branch span; victim slots center on it.
    pub fn branch_midpoint_x(&self) -> f64 {
        (self.branch_start_x + self.branch_end_x) / 2.0
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.end_x <= self.start_x {
            return Err(ConfigError::InvalidTrack(format!(
                "end_x ({}) must exceed start_x ({})",
                self.end_x, self.start_x
            )));
        }
        if self.gate_entry_x > self.end_x {
            return Err(ConfigError::InvalidTrack(format!(
                "gate_entry_x ({}) must not exceed end_x ({})",
                self.gate_entry_x, self.end_x
            )));
        }
        Ok(())
    }
}

/// What happens when the last level finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum SequenceEndPolicy {
    /// Stop after the last level; further ticks are no-ops.
    #[default]
    Halt,
    /// Restart from the first level, keeping the run log.
    Wrap,
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    pub track: TrackConfig,
    /// Longitudinal distance covered per tick once the round is armed.
    pub vehicle_speed: f64,
    /// Half-length of the vehicle's forward hit zone.
    pub hit_zone_half_length: f64,
    /// Half-length of a victim footprint.
    pub victim_half_length: f64,
    /// Longitudinal spacing between victim slots on a branch.
    pub victim_spacing: f64,
    #[serde(default)]
    pub sequence_end: SequenceEndPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            track: TrackConfig::default(),
            vehicle_speed: 2.0,
            hit_zone_half_length: 8.0,
            victim_half_length: 6.0,
            victim_spacing: 24.0,
            sequence_end: SequenceEndPolicy::Halt,
        }
    }
}

impl EngineConfig {
    /// Single pass through the level sequence, then halt.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Arcade-style endless mode: the sequence wraps around forever.
    pub fn endless() -> Self {
        Self {
            sequence_end: SequenceEndPolicy::Wrap,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.vehicle_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(self.vehicle_speed));
        }
        self.track.validate()
    }
}

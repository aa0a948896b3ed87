//! Per-round victim configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable per-round configuration: how many victims stand on each lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Level {
    pub top_count: u32,
    pub bottom_count: u32,
}

impl Level {
    pub fn new(top_count: u32, bottom_count: u32) -> Self {
        Self {
            top_count,
            bottom_count,
        }
    }

    /// Validated construction from signed counts, for boundaries where the
    /// numbers arrive untyped (JSON, CLI arguments).
    pub fn from_signed(top: i64, bottom: i64) -> Result<Self, ConfigError> {
        if top < 0 || bottom < 0 {
            return Err(ConfigError::NegativeVictimCount { top, bottom });
        }
        Ok(Self {
            top_count: top as u32,
            bottom_count: bottom as u32,
        })
    }

    pub fn total(&self) -> u32 {
        self.top_count + self.bottom_count
    }
}

/// The stock level sequence used when the caller does not supply one.
pub fn default_campaign() -> Vec<Level> {
    vec![
        Level::new(1, 5),
        Level::new(5, 1),
        Level::new(3, 3),
        Level::new(0, 4),
        Level::new(2, 7),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signed_accepts_valid_counts() {
        let level = Level::from_signed(1, 5).unwrap();
        assert_eq!(level.top_count, 1);
        assert_eq!(level.bottom_count, 5);
        assert_eq!(level.total(), 6);
    }

    #[test]
    fn test_from_signed_rejects_negative_counts() {
        let err = Level::from_signed(-1, 5).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeVictimCount { top: -1, bottom: 5 }
        ));
        assert!(Level::from_signed(0, -3).is_err());
    }

    #[test]
    fn test_zero_counts_are_valid() {
        let level = Level::from_signed(0, 0).unwrap();
        assert_eq!(level.total(), 0);
    }

    #[test]
    fn test_default_campaign_is_nonempty() {
        assert!(!default_campaign().is_empty());
    }
}

//! Maps the vehicle's position and committed lane onto victim strikes.

use tracing::debug;

use crate::engine::config::EngineConfig;
use crate::engine::victims::VictimSet;
use crate::models::Lane;

/// Footprint-overlap strike detection. Taking the committed [`Lane`] by
/// value makes the uncommitted case unrepresentable: victims on the other
/// lane can never be struck because the vehicle occupies exactly one
/// lateral line at any longitudinal position.
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    hit_zone_half_length: f64,
    victim_half_length: f64,
}

impl CollisionDetector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            hit_zone_half_length: config.hit_zone_half_length,
            victim_half_length: config.victim_half_length,
        }
    }

    /// Apply strikes for the vehicle at longitudinal position `x` on the
    /// committed `lane`. Idempotent: already-struck victims are skipped, so
    /// lingering in the overlap zone never double-counts. Returns the number
    /// of victims newly struck by this update.
    pub fn update(&self, victims: &mut VictimSet, lane: Lane, x: f64) -> u32 {
        let reach = self.hit_zone_half_length + self.victim_half_length;
        let hits: Vec<u32> = victims
            .on_lane(lane)
            .filter(|v| !v.struck && (v.x - x).abs() <= reach)
            .map(|v| v.id)
            .collect();
        let mut newly_struck = 0;
        for id in hits {
            if victims.strike(id) {
                newly_struck += 1;
                debug!(victim = id, ?lane, x, "victim struck");
            }
        }
        newly_struck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    fn detector() -> CollisionDetector {
        CollisionDetector::new(&EngineConfig::default())
    }

    #[test]
    fn test_strike_requires_overlap() {
        let mut set = VictimSet::from_level(&Level::new(0, 1), 400.0, 24.0);
        let d = detector();
        assert_eq!(d.update(&mut set, Lane::Bottom, 300.0), 0);
        // reach = 8 + 6 = 14
        assert_eq!(d.update(&mut set, Lane::Bottom, 386.0), 1);
        assert!(set.victims()[0].struck);
    }

    #[test]
    fn test_uncommitted_lane_is_never_struck() {
        let mut set = VictimSet::from_level(&Level::new(1, 1), 400.0, 24.0);
        let d = detector();
        // Drive the whole span on the bottom lane.
        let mut x = 0.0;
        while x < 800.0 {
            d.update(&mut set, Lane::Bottom, x);
            x += 2.0;
        }
        assert!(set.on_lane(Lane::Top).all(|v| !v.struck));
        assert!(set.on_lane(Lane::Bottom).all(|v| v.struck));
    }

    #[test]
    fn test_reoverlap_does_not_double_count() {
        let mut set = VictimSet::from_level(&Level::new(0, 1), 400.0, 24.0);
        let d = detector();
        assert_eq!(d.update(&mut set, Lane::Bottom, 400.0), 1);
        assert_eq!(d.update(&mut set, Lane::Bottom, 401.0), 0);
        assert_eq!(d.update(&mut set, Lane::Bottom, 400.0), 0);
        assert_eq!(set.struck_count(), 1);
    }

    #[test]
    fn test_sweep_strikes_every_slot_once() {
        let mut set = VictimSet::from_level(&Level::new(0, 4), 400.0, 24.0);
        let d = detector();
        let mut total = 0;
        let mut x = 0.0;
        while x < 800.0 {
            total += d.update(&mut set, Lane::Bottom, x);
            x += 2.0;
        }
        assert_eq!(total, 4);
        assert_eq!(set.struck_count(), 4);
    }
}

//! Per-round victim population and strike bookkeeping.

use serde::Serialize;

use crate::models::{Lane, Level};

/// An entity standing on a lane. Its world position is fixed when the round
/// starts; `struck` flips false to true at most once and never reverts.
#[derive(Debug, Clone, Serialize)]
pub struct Victim {
    pub id: u32,
    pub lane: Lane,
    pub slot_index: u32,
    /// Longitudinal world position.
    pub x: f64,
    pub struck: bool,
}

/// The victims of one round. The set is fixed for the round's lifetime:
/// nothing is added or removed until the sequencer discards it on reset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VictimSet {
    victims: Vec<Victim>,
    struck_count: u32,
}

impl VictimSet {
    /// Populate from the active level. Slots line up on each branch,
    /// centered on the branch midpoint with fixed spacing.
    pub fn from_level(level: &Level, midpoint_x: f64, spacing: f64) -> Self {
        let mut victims = Vec::with_capacity(level.total() as usize);
        let mut id = 0;
        for (lane, count) in [
            (Lane::Top, level.top_count),
            (Lane::Bottom, level.bottom_count),
        ] {
            for slot in 0..count {
                victims.push(Victim {
                    id,
                    lane,
                    slot_index: slot,
                    x: slot_position(midpoint_x, spacing, slot, count),
                    struck: false,
                });
                id += 1;
            }
        }
        Self {
            victims,
            struck_count: 0,
        }
    }

    pub fn victims(&self) -> &[Victim] {
        &self.victims
    }

    pub fn len(&self) -> usize {
        self.victims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.victims.is_empty()
    }

    pub fn on_lane(&self, lane: Lane) -> impl Iterator<Item = &Victim> {
        self.victims.iter().filter(move |v| v.lane == lane)
    }

    pub fn struck_count(&self) -> u32 {
        self.struck_count
    }

    pub fn spared_count(&self) -> u32 {
        self.victims.len() as u32 - self.struck_count
    }

    /// Mark the victim struck. Returns true only on the false-to-true edge;
    /// striking an already-struck victim changes nothing and does not touch
    /// the counter.
    ///
    /// # Panics
    /// On an unknown id: the caller holds a stale reference to a previous
    /// round's victim, which is a programmer error.
    pub fn strike(&mut self, id: u32) -> bool {
        let victim = self
            .victims
            .iter_mut()
            .find(|v| v.id == id)
            .unwrap_or_else(|| panic!("unknown victim id {id}"));
        if victim.struck {
            return false;
        }
        victim.struck = true;
        self.struck_count += 1;
        true
    }
}

fn slot_position(midpoint_x: f64, spacing: f64, slot: u32, count: u32) -> f64 {
    midpoint_x + (slot as f64 - (count - 1) as f64 / 2.0) * spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_matches_level() {
        let set = VictimSet::from_level(&Level::new(2, 3), 400.0, 24.0);
        assert_eq!(set.len(), 5);
        assert_eq!(set.on_lane(Lane::Top).count(), 2);
        assert_eq!(set.on_lane(Lane::Bottom).count(), 3);
        assert!(set.victims().iter().all(|v| !v.struck));
    }

    #[test]
    fn test_single_victim_sits_on_midpoint() {
        let set = VictimSet::from_level(&Level::new(1, 0), 400.0, 24.0);
        assert_eq!(set.victims()[0].x, 400.0);
    }

    #[test]
    fn test_slots_center_on_midpoint() {
        let set = VictimSet::from_level(&Level::new(0, 3), 400.0, 24.0);
        let xs: Vec<f64> = set.on_lane(Lane::Bottom).map(|v| v.x).collect();
        assert_eq!(xs, vec![376.0, 400.0, 424.0]);
    }

    #[test]
    fn test_empty_level_yields_empty_set() {
        let set = VictimSet::from_level(&Level::new(0, 0), 400.0, 24.0);
        assert!(set.is_empty());
        assert_eq!(set.spared_count(), 0);
    }

    #[test]
    fn test_strike_is_idempotent() {
        let mut set = VictimSet::from_level(&Level::new(1, 1), 400.0, 24.0);
        assert!(set.strike(0));
        assert_eq!(set.struck_count(), 1);
        assert!(!set.strike(0));
        assert_eq!(set.struck_count(), 1);
        assert_eq!(set.spared_count(), 1);
    }

    #[test]
    #[should_panic(expected = "unknown victim id")]
    fn test_strike_unknown_id_panics() {
        let mut set = VictimSet::from_level(&Level::new(1, 0), 400.0, 24.0);
        set.strike(99);
    }
}

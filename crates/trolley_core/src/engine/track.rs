//! Parametric path model: lateral offset as a function of longitudinal
//! position and chosen lane. Pure and deterministic; rendering consumes it
//! read-only, the sequencer never mutates it.

use crate::engine::config::TrackConfig;
use crate::models::Lane;

#[derive(Debug, Clone)]
pub struct TrackGeometry {
    track: TrackConfig,
}

impl TrackGeometry {
    pub fn new(track: TrackConfig) -> Self {
        Self { track }
    }

    pub fn track(&self) -> &TrackConfig {
        &self.track
    }

    /// Lateral offset of the path at `x` for the given `lane`.
    ///
    /// Piecewise: mainline before the gate entry and after the merge exit,
    /// the lane's branch offset inside the branch span, and a cubic blend
    /// across the two transition spans. The value is continuous at every
    /// boundary; a transition span of zero or negative length collapses to
    /// a step.
    pub fn lateral_offset(&self, x: f64, lane: Lane) -> f64 {
        let t = &self.track;
        let branch = t.branch_offset(lane);
        if x < t.gate_entry_x {
            t.mainline_offset
        } else if x < t.branch_start_x {
            blend(
                t.mainline_offset,
                branch,
                progress(x, t.gate_entry_x, t.branch_start_x),
            )
        } else if x <= t.branch_end_x {
            branch
        } else if x < t.merge_exit_x {
            blend(
                branch,
                t.mainline_offset,
                progress(x, t.branch_end_x, t.merge_exit_x),
            )
        } else {
            t.mainline_offset
        }
    }
}

/// Normalized progress across `[from_x, to_x]`, clamped to `[0, 1]`.
/// A span of zero or negative length yields 1.0 (step, no division).
#[inline]
fn progress(x: f64, from_x: f64, to_x: f64) -> f64 {
    let span = to_x - from_x;
    if span <= 0.0 {
        1.0
    } else {
        ((x - from_x) / span).clamp(0.0, 1.0)
    }
}

/// Cubic smoothstep blend: matches the endpoints exactly and has zero
/// lateral velocity at both, so the path has no kink entering or leaving a
/// transition.
#[inline]
fn blend(from: f64, to: f64, t: f64) -> f64 {
    let s = t * t * (3.0 - 2.0 * t);
    from + (to - from) * s
}

//! Passive production and manual harvest.
//!
//! `advance` is the single integration path: the fixed tick calls it with
//! damping 1.0 and offline reconciliation calls it once with the offline
//! damping factor.

use tracing::warn;

use crate::error::EngineError;

use super::state::{PlayerState, Tier};

/// Amount credited to each tier by one `advance` call, in `Tier::all()` order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Yield {
    pub gains: [f64; 4],
}

impl Yield {
    pub fn of(&self, tier: Tier) -> f64 {
        self.gains[tier_index(tier)]
    }
}

/// Integrate production over `delta_seconds` and stamp `now_ms`.
///
/// Negative or non-finite deltas are clock skew and count as zero; the
/// stamp still moves forward (never backwards).
pub fn advance(state: &mut PlayerState, delta_seconds: f64, damping: f64, now_ms: i64) -> Yield {
    let dt = clamp_elapsed(delta_seconds);
    let damping = if damping.is_finite() { damping.clamp(0.0, 1.0) } else { 0.0 };
    let mult = state.production_multiplier();

    let mut out = Yield::default();
    if dt > 0.0 && damping > 0.0 {
        for tier in Tier::all() {
            let gain = state.generators(*tier) as f64 * mult * dt * damping;
            state.credit(*tier, gain);
            out.gains[tier_index(*tier)] = gain;
        }
    }
    state.stamp(now_ms);
    out
}

/// One manual click: `1 × production multiplier` drops. Returns the amount.
pub fn harvest(state: &mut PlayerState) -> f64 {
    let gain = state.production_multiplier();
    state.credit(Tier::Drops, gain);
    gain
}

/// Units produced per second for `tier` at the current multipliers.
pub fn rate(state: &PlayerState, tier: Tier) -> f64 {
    state.generators(tier) as f64 * state.production_multiplier()
}

/// Map skewed elapsed time to zero.
pub(crate) fn clamp_elapsed(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds >= 0.0 {
        seconds
    } else {
        let err = EngineError::ClockSkew {
            elapsed_seconds: seconds,
        };
        warn!(error = %err, "Elapsed time rejected");
        0.0
    }
}

fn tier_index(tier: Tier) -> usize {
    match tier {
        Tier::Drops => 0,
        Tier::Chill => 1,
        Tier::Insp => 2,
        Tier::Chillverse => 3,
    }
}

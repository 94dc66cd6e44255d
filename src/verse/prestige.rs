//! The three-layer prestige ladder.
//!
//! Each layer converts a lifetime total into a permanent multiplier and
//! wipes the tiers beneath it. Because the gating total is part of the
//! wipe, a layer falls back to locked the moment it triggers and unlocks
//! again only once the total is re-earned.

use tracing::info;

use crate::config::{LayerTuning, Tuning};
use crate::error::EngineError;

use super::state::{Layer, PlayerState};

/// Result of a successful prestige.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prestige {
    pub layer: Layer,
    /// Lifetime total that was converted.
    pub converted: f64,
    /// Factor the layer's multiplier was multiplied by.
    pub factor: f64,
    /// The layer's multiplier afterwards.
    pub multiplier: f64,
}

/// Whether `layer` can trigger right now.
pub fn is_eligible(state: &PlayerState, layer: Layer, tuning: &Tuning) -> bool {
    state.total(layer.gate()) >= tuning.layer(layer).threshold
}

/// Multiplier factor a trigger would grant now, or `None` while locked.
pub fn pending_factor(state: &PlayerState, layer: Layer, tuning: &Tuning) -> Option<f64> {
    if is_eligible(state, layer, tuning) {
        Some(factor_for(state.total(layer.gate()), tuning.layer(layer)))
    } else {
        None
    }
}

/// `1 + (total / divisor) ^ exponent`, saturated to a finite value.
pub fn factor_for(total: f64, curve: &LayerTuning) -> f64 {
    let f = 1.0 + (total / curve.divisor).powf(curve.exponent);
    if f.is_finite() {
        f.max(1.0)
    } else {
        f64::MAX
    }
}

/// Trigger `layer`. Below threshold this is a no-op returning
/// `PrestigeNotEligible`; the ledger is untouched.
pub fn prestige(state: &mut PlayerState, layer: Layer, tuning: &Tuning) -> Result<Prestige, EngineError> {
    let curve = tuning.layer(layer);
    let converted = state.total(layer.gate());
    if converted < curve.threshold {
        return Err(EngineError::PrestigeNotEligible {
            layer,
            total: converted,
            threshold: curve.threshold,
        });
    }

    let factor = factor_for(converted, curve);
    state.apply_multiplier_gain(layer, factor);
    state.reset_tiers_up_to(layer, tuning);

    info!(
        layer = layer.name(),
        converted,
        factor,
        multiplier = state.multiplier(layer),
        "Prestige triggered"
    );

    Ok(Prestige {
        layer,
        converted,
        factor,
        multiplier: state.multiplier(layer),
    })
}

//! Tuning constants for the economy, the prestige ladder and the session
//! cadence.
//!
//! Every value has a default that reproduces the shipped balance. Hosts can
//! override any top-level field with a partial JSON document; nested
//! generator and layer blocks must be given whole.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::verse::state::{Layer, Tier};

/// Cost curve of one generator type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorTuning {
    /// Cost of the first unit, and the cost restored by a prestige reset.
    pub base_cost: f64,
    /// Multiplicative cost growth applied after every purchase.
    pub growth: f64,
    /// Round the next cost down to an integer after growth.
    pub floor_cost: bool,
}

/// Gate and reward curve of one prestige layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerTuning {
    /// Lifetime total required before the layer can trigger.
    pub threshold: f64,
    /// The gating total is divided by this before exponentiation.
    pub divisor: f64,
    /// Exponent of the reward curve, in (0, 1].
    pub exponent: f64,
}

/// All tunable numbers in one place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub flake: GeneratorTuning,
    pub chill_gen: GeneratorTuning,
    pub revel: GeneratorTuning,
    pub verse: GeneratorTuning,

    pub cold: LayerTuning,
    pub insp: LayerTuning,
    pub script: LayerTuning,

    /// Longest absence credited by offline reconciliation (48 h).
    pub offline_cap_seconds: f64,
    /// Fraction of the active production rate earned while away.
    pub offline_damping: f64,

    /// Fixed simulation step.
    pub tick_ms: f64,
    /// Longest wall-clock frame fed to the fixed-step clock; longer gaps are
    /// left to offline reconciliation.
    pub max_frame_ms: f64,
    /// Minimum wall time between two saves.
    pub save_interval_ms: i64,

    /// Chill debited by one conversion.
    pub convert_cost: f64,
    /// Diamonds promised by one conversion (paid out externally).
    pub convert_diamonds: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            flake: GeneratorTuning {
                base_cost: 10.0,
                growth: 1.6,
                floor_cost: true,
            },
            chill_gen: GeneratorTuning {
                base_cost: 100.0,
                growth: 1.8,
                floor_cost: true,
            },
            revel: GeneratorTuning {
                base_cost: 1e6,
                growth: 2.1,
                floor_cost: false,
            },
            verse: GeneratorTuning {
                base_cost: 1e12,
                growth: 2.5,
                floor_cost: false,
            },
            cold: LayerTuning {
                threshold: 1e21,
                divisor: 1e18,
                exponent: 0.3,
            },
            insp: LayerTuning {
                threshold: 1e30,
                divisor: 1e24,
                exponent: 0.25,
            },
            script: LayerTuning {
                threshold: 1e40,
                divisor: 1e32,
                exponent: 0.2,
            },
            offline_cap_seconds: 48.0 * 3600.0,
            offline_damping: 0.5,
            tick_ms: 100.0,
            max_frame_ms: 500.0,
            save_interval_ms: 60_000,
            convert_cost: 1000.0,
            convert_diamonds: 100,
        }
    }
}

impl Tuning {
    /// Cost curve for the generator that produces `tier`.
    pub fn generator(&self, tier: Tier) -> &GeneratorTuning {
        match tier {
            Tier::Drops => &self.flake,
            Tier::Chill => &self.chill_gen,
            Tier::Insp => &self.revel,
            Tier::Chillverse => &self.verse,
        }
    }

    pub fn layer(&self, layer: Layer) -> &LayerTuning {
        match layer {
            Layer::Cold => &self.cold,
            Layer::Insp => &self.insp,
            Layer::Script => &self.script,
        }
    }

    /// Fixed tick length in seconds.
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms / 1000.0
    }

    /// Parse overrides over the defaults and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidTuning(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the ledger invariants.
    pub fn validate(&self) -> Result<(), EngineError> {
        for tier in Tier::all() {
            let g = self.generator(*tier);
            if !(g.base_cost.is_finite() && g.base_cost > 0.0) {
                return Err(invalid(format!("{tier:?} base cost must be positive")));
            }
            if !(g.growth.is_finite() && g.growth > 1.0) {
                return Err(invalid(format!("{tier:?} growth must exceed 1")));
            }
        }
        for layer in Layer::all() {
            let l = self.layer(*layer);
            if !(l.threshold.is_finite() && l.threshold > 0.0) {
                return Err(invalid(format!("{layer:?} threshold must be positive")));
            }
            if !(l.divisor.is_finite() && l.divisor > 0.0) {
                return Err(invalid(format!("{layer:?} divisor must be positive")));
            }
            if !(l.exponent > 0.0 && l.exponent <= 1.0) {
                return Err(invalid(format!("{layer:?} exponent must be in (0, 1]")));
            }
        }
        if !(self.offline_cap_seconds.is_finite() && self.offline_cap_seconds >= 0.0) {
            return Err(invalid("offline cap must be non-negative".into()));
        }
        if !(0.0..=1.0).contains(&self.offline_damping) {
            return Err(invalid("offline damping must be in [0, 1]".into()));
        }
        if !(self.tick_ms.is_finite() && self.tick_ms > 0.0) {
            return Err(invalid("tick length must be positive".into()));
        }
        if !(self.max_frame_ms.is_finite() && self.max_frame_ms >= self.tick_ms) {
            return Err(invalid("max frame must be at least one tick".into()));
        }
        if self.save_interval_ms < 0 {
            return Err(invalid("save interval must be non-negative".into()));
        }
        if !(self.convert_cost.is_finite() && self.convert_cost > 0.0) {
            return Err(invalid("convert cost must be positive".into()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> EngineError {
    EngineError::InvalidTuning(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn default_curves_match_shipped_balance() {
        let t = Tuning::default();
        assert!((t.flake.growth - 1.6).abs() < f64::EPSILON);
        assert!(t.flake.floor_cost && t.chill_gen.floor_cost);
        assert!(!t.revel.floor_cost && !t.verse.floor_cost);
        assert!((t.offline_cap_seconds - 172_800.0).abs() < f64::EPSILON);
        assert!((t.tick_seconds() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let t = Tuning::from_json_str(r#"{ "offline_damping": 0.25, "save_interval_ms": 5000 }"#)
            .unwrap();
        assert!((t.offline_damping - 0.25).abs() < f64::EPSILON);
        assert_eq!(t.save_interval_ms, 5000);
        assert_eq!(t.flake, Tuning::default().flake);
        assert_eq!(t.script, Tuning::default().script);
    }

    #[test]
    fn nested_block_replaces_whole_curve() {
        let t = Tuning::from_json_str(
            r#"{ "revel": { "base_cost": 500.0, "growth": 3.0, "floor_cost": true } }"#,
        )
        .unwrap();
        assert!((t.revel.base_cost - 500.0).abs() < f64::EPSILON);
        assert!(t.revel.floor_cost);
    }

    #[test]
    fn growth_at_or_below_one_is_rejected() {
        let err = Tuning::from_json_str(
            r#"{ "flake": { "base_cost": 10.0, "growth": 1.0, "floor_cost": true } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTuning(_)));
    }

    #[test]
    fn exponent_above_one_is_rejected() {
        let mut t = Tuning::default();
        t.insp.exponent = 1.5;
        assert!(t.validate().is_err());
    }

    #[test]
    fn damping_out_of_range_is_rejected() {
        let mut t = Tuning::default();
        t.offline_damping = 1.5;
        assert!(t.validate().is_err());
    }

    #[test]
    fn malformed_json_is_invalid_tuning() {
        assert!(matches!(
            Tuning::from_json_str("not json"),
            Err(EngineError::InvalidTuning(_))
        ));
    }
}

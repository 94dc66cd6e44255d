//! Player ledger: the four currency tiers, their generators, and the
//! permanent prestige multipliers.

use std::collections::BTreeSet;

use crate::config::Tuning;
use crate::error::EngineError;

/// Finite value a current balance saturates to instead of overflowing.
pub const OVERFLOW_SENTINEL: f64 = 1e100;

/// The four nested currencies, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Drops,
    Chill,
    Insp,
    Chillverse,
}

impl Tier {
    /// All tiers in ladder order.
    pub fn all() -> &'static [Tier] {
        &[Tier::Drops, Tier::Chill, Tier::Insp, Tier::Chillverse]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Drops => "Drops",
            Tier::Chill => "Chill",
            Tier::Insp => "Insp",
            Tier::Chillverse => "ChillVerse",
        }
    }

    /// Display name of the generator bought with (and producing) this tier.
    pub fn generator_name(&self) -> &'static str {
        match self {
            Tier::Drops => "Flake",
            Tier::Chill => "Chill Gen",
            Tier::Insp => "Revel",
            Tier::Chillverse => "Verse",
        }
    }
}

/// The three prestige layers, in ascending order of reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Cold,
    Insp,
    Script,
}

impl Layer {
    pub fn all() -> &'static [Layer] {
        &[Layer::Cold, Layer::Insp, Layer::Script]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Cold => "Cold",
            Layer::Insp => "Insp",
            Layer::Script => "Script",
        }
    }

    /// Tier whose lifetime total gates this layer.
    pub fn gate(&self) -> Tier {
        match self {
            Layer::Cold => Tier::Drops,
            Layer::Insp => Tier::Chill,
            Layer::Script => Tier::Insp,
        }
    }

    /// Tiers whose balances, totals, generators and costs this layer resets.
    pub fn reset_scope(&self) -> &'static [Tier] {
        match self {
            Layer::Cold => &[Tier::Drops],
            Layer::Insp => &[Tier::Drops, Tier::Chill],
            Layer::Script => &[Tier::Drops, Tier::Chill, Tier::Insp],
        }
    }
}

/// Full ledger of one player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Display name.
    pub name: String,
    /// Opaque stable id from the identity provider.
    pub player_id: String,

    pub drops: f64,
    pub total_drops: f64,
    pub flakes: u64,
    pub flake_cost: f64,

    pub chill: f64,
    pub total_chill: f64,
    pub chill_gen: u64,
    pub chill_gen_cost: f64,

    pub insp: f64,
    pub total_insp: f64,
    pub revel: u64,
    pub revel_cost: f64,

    /// Terminal currency; it is its own lifetime total and survives every reset.
    pub chillverse: f64,
    pub verse: u64,
    pub verse_cost: f64,

    pub cold_mult: f64,
    pub insp_mult: f64,
    pub script_mult: f64,

    /// Unlocked achievement ids. Only ever grows.
    pub achievements: BTreeSet<u32>,
    /// Epoch millis of the last production integration; 0 = never observed.
    pub last_update_ms: i64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl PlayerState {
    /// A fresh ledger with the configured starting costs.
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            name: String::new(),
            player_id: String::new(),
            drops: 0.0,
            total_drops: 0.0,
            flakes: 0,
            flake_cost: tuning.flake.base_cost,
            chill: 0.0,
            total_chill: 0.0,
            chill_gen: 0,
            chill_gen_cost: tuning.chill_gen.base_cost,
            insp: 0.0,
            total_insp: 0.0,
            revel: 0,
            revel_cost: tuning.revel.base_cost,
            chillverse: 0.0,
            verse: 0,
            verse_cost: tuning.verse.base_cost,
            cold_mult: 1.0,
            insp_mult: 1.0,
            script_mult: 1.0,
            achievements: BTreeSet::new(),
            last_update_ms: 0,
        }
    }

    // ── Read accessors ─────────────────────────────────────────

    pub fn balance(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Drops => self.drops,
            Tier::Chill => self.chill,
            Tier::Insp => self.insp,
            Tier::Chillverse => self.chillverse,
        }
    }

    /// Lifetime total of a tier. Chillverse has no separate total.
    pub fn total(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Drops => self.total_drops,
            Tier::Chill => self.total_chill,
            Tier::Insp => self.total_insp,
            Tier::Chillverse => self.chillverse,
        }
    }

    pub fn generators(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Drops => self.flakes,
            Tier::Chill => self.chill_gen,
            Tier::Insp => self.revel,
            Tier::Chillverse => self.verse,
        }
    }

    /// Price of the next generator of this tier.
    pub fn cost(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Drops => self.flake_cost,
            Tier::Chill => self.chill_gen_cost,
            Tier::Insp => self.revel_cost,
            Tier::Chillverse => self.verse_cost,
        }
    }

    pub fn multiplier(&self, layer: Layer) -> f64 {
        match layer {
            Layer::Cold => self.cold_mult,
            Layer::Insp => self.insp_mult,
            Layer::Script => self.script_mult,
        }
    }

    /// Product of the three prestige multipliers; every production path
    /// scales by this.
    pub fn production_multiplier(&self) -> f64 {
        let m = self.cold_mult * self.insp_mult * self.script_mult;
        if m.is_finite() {
            m.max(1.0)
        } else {
            f64::MAX
        }
    }

    // ── Mutators ───────────────────────────────────────────────

    /// Add `amount` to a tier's balance and lifetime total.
    ///
    /// Non-positive and NaN amounts are ignored. A balance that would
    /// overflow (including an infinite amount) saturates to
    /// [`OVERFLOW_SENTINEL`]; a total saturates to `f64::MAX` so it never
    /// moves backwards.
    pub fn credit(&mut self, tier: Tier, amount: f64) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        let (balance, total) = match tier {
            Tier::Drops => (&mut self.drops, Some(&mut self.total_drops)),
            Tier::Chill => (&mut self.chill, Some(&mut self.total_chill)),
            Tier::Insp => (&mut self.insp, Some(&mut self.total_insp)),
            Tier::Chillverse => (&mut self.chillverse, None),
        };
        *balance = saturate(*balance + amount, OVERFLOW_SENTINEL);
        if let Some(total) = total {
            *total = saturate(*total + amount, f64::MAX);
        }
    }

    /// Remove `amount` from a tier's balance. Totals are untouched.
    pub fn debit(&mut self, tier: Tier, amount: f64) -> Result<(), EngineError> {
        let available = self.balance(tier);
        if !(amount.is_finite() && amount >= 0.0) || amount > available {
            return Err(EngineError::InsufficientFunds {
                tier,
                needed: amount,
                available,
            });
        }
        let balance = self.balance_mut(tier);
        *balance = (*balance - amount).max(0.0);
        Ok(())
    }

    pub fn set_generator_cost(&mut self, tier: Tier, cost: f64) {
        let cost = saturate(cost, f64::MAX);
        match tier {
            Tier::Drops => self.flake_cost = cost,
            Tier::Chill => self.chill_gen_cost = cost,
            Tier::Insp => self.revel_cost = cost,
            Tier::Chillverse => self.verse_cost = cost,
        }
    }

    pub fn increment_generator(&mut self, tier: Tier) {
        let count = match tier {
            Tier::Drops => &mut self.flakes,
            Tier::Chill => &mut self.chill_gen,
            Tier::Insp => &mut self.revel,
            Tier::Chillverse => &mut self.verse,
        };
        *count = count.saturating_add(1);
    }

    /// Multiply a layer's multiplier by `factor`. Factors below 1 or not
    /// finite are ignored, so multipliers never shrink through this path.
    pub fn apply_multiplier_gain(&mut self, layer: Layer, factor: f64) {
        if !(factor.is_finite() && factor >= 1.0) {
            return;
        }
        let mult = match layer {
            Layer::Cold => &mut self.cold_mult,
            Layer::Insp => &mut self.insp_mult,
            Layer::Script => &mut self.script_mult,
        };
        *mult = saturate(*mult * factor, f64::MAX);
    }

    /// Zero everything below and including `layer`'s gate tier and restore
    /// base costs. A Script reset also returns the Cold and Insp multipliers
    /// to 1. Chillverse, verse and the Script multiplier are never touched.
    pub fn reset_tiers_up_to(&mut self, layer: Layer, tuning: &Tuning) {
        for tier in layer.reset_scope() {
            match tier {
                Tier::Drops => {
                    self.drops = 0.0;
                    self.total_drops = 0.0;
                    self.flakes = 0;
                }
                Tier::Chill => {
                    self.chill = 0.0;
                    self.total_chill = 0.0;
                    self.chill_gen = 0;
                }
                Tier::Insp => {
                    self.insp = 0.0;
                    self.total_insp = 0.0;
                    self.revel = 0;
                }
                Tier::Chillverse => {}
            }
            self.set_generator_cost(*tier, tuning.generator(*tier).base_cost);
        }
        if layer == Layer::Script {
            self.cold_mult = 1.0;
            self.insp_mult = 1.0;
        }
    }

    /// Move `last_update_ms` forward to `now_ms`; never backwards.
    pub fn stamp(&mut self, now_ms: i64) {
        self.last_update_ms = self.last_update_ms.max(now_ms);
    }

    fn balance_mut(&mut self, tier: Tier) -> &mut f64 {
        match tier {
            Tier::Drops => &mut self.drops,
            Tier::Chill => &mut self.chill,
            Tier::Insp => &mut self.insp,
            Tier::Chillverse => &mut self.chillverse,
        }
    }
}

/// Replace a non-finite result with `ceiling`.
fn saturate(value: f64, ceiling: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        ceiling
    }
}

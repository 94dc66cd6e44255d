//! Fixed achievement catalogue and its evaluator.
//!
//! Conditions are pure functions of the ledger. The unlocked set only grows:
//! a condition that later turns false (a balance spent, a multiplier reset by
//! Script) never removes an id already granted.

use tracing::info;

use super::state::{Layer, PlayerState, Tier};

/// Id of the leaderboard achievement, granted by the session after a save.
pub const TOP_LEADERBOARD: u32 = 15;

/// What must hold for an achievement to unlock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Condition {
    /// Lifetime total of a tier reaches a threshold.
    TotalAtLeast(Tier, f64),
    /// Generator count of a tier reaches a threshold.
    GeneratorsAtLeast(Tier, u64),
    /// A layer's multiplier exceeds a value (i.e. the layer has triggered).
    MultiplierAbove(Layer, f64),
    /// Product of all three multipliers reaches a value.
    CombinedMultiplierAtLeast(f64),
    /// Current balance of a tier reaches a threshold.
    BalanceAtLeast(Tier, f64),
    /// Never true from the ledger; granted by a collaborator.
    External,
}

impl Condition {
    pub fn is_met(&self, state: &PlayerState) -> bool {
        match *self {
            Condition::TotalAtLeast(tier, n) => state.total(tier) >= n,
            Condition::GeneratorsAtLeast(tier, n) => state.generators(tier) >= n,
            Condition::MultiplierAbove(layer, m) => state.multiplier(layer) > m,
            Condition::CombinedMultiplierAtLeast(m) => {
                state.cold_mult * state.insp_mult * state.script_mult >= m
            }
            Condition::BalanceAtLeast(tier, n) => state.balance(tier) >= n,
            Condition::External => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Achievement {
    pub id: u32,
    pub name: &'static str,
    pub icon: &'static str,
    pub condition: Condition,
}

const fn ach(id: u32, name: &'static str, icon: &'static str, condition: Condition) -> Achievement {
    Achievement {
        id,
        name,
        icon,
        condition,
    }
}

pub static ACHIEVEMENTS: [Achievement; 15] = [
    ach(1, "Click 1k Drops", "💧", Condition::TotalAtLeast(Tier::Drops, 1e3)),
    ach(2, "First Flake", "❄", Condition::GeneratorsAtLeast(Tier::Drops, 1)),
    ach(3, "1e12 Drops", "🌊", Condition::TotalAtLeast(Tier::Drops, 1e12)),
    ach(4, "First Cold Prestige", "🧊", Condition::MultiplierAbove(Layer::Cold, 1.0)),
    ach(5, "10 Flakes", "🌨", Condition::GeneratorsAtLeast(Tier::Drops, 10)),
    ach(6, "1e9 Chill", "😎", Condition::TotalAtLeast(Tier::Chill, 1e9)),
    ach(7, "First Chill Gen", "⚙", Condition::GeneratorsAtLeast(Tier::Chill, 1)),
    ach(8, "1e18 Chill", "🥶", Condition::TotalAtLeast(Tier::Chill, 1e18)),
    ach(9, "First Insp Prestige", "💡", Condition::MultiplierAbove(Layer::Insp, 1.0)),
    ach(10, "5 Revels", "🎉", Condition::GeneratorsAtLeast(Tier::Insp, 5)),
    ach(11, "1e30 Insp", "✨", Condition::TotalAtLeast(Tier::Insp, 1e30)),
    ach(12, "1e50 ChillVerse", "🌌", Condition::TotalAtLeast(Tier::Chillverse, 1e50)),
    ach(13, "5x All Prestiges", "👑", Condition::CombinedMultiplierAtLeast(1e10)),
    ach(14, "Big Offline Gain", "💤", Condition::BalanceAtLeast(Tier::Drops, 1e10)),
    ach(TOP_LEADERBOARD, "Top 3 Leaderboard", "🏆", Condition::External),
];

/// Catalogue entry for `id`.
pub fn find(id: u32) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Evaluate every condition and add newly met ids. Returns the new ids in
/// catalogue order.
pub fn refresh(state: &mut PlayerState) -> Vec<u32> {
    let mut unlocked = Vec::new();
    for a in &ACHIEVEMENTS {
        if state.achievements.contains(&a.id) || !a.condition.is_met(state) {
            continue;
        }
        state.achievements.insert(a.id);
        info!(id = a.id, name = a.name, "Achievement unlocked");
        unlocked.push(a.id);
    }
    unlocked
}

/// Grant an id directly. Unknown or already-held ids are ignored; returns
/// whether the set grew.
pub fn grant(state: &mut PlayerState, id: u32) -> bool {
    let Some(a) = find(id) else {
        return false;
    };
    if !state.achievements.insert(id) {
        return false;
    }
    info!(id, name = a.name, "Achievement granted");
    true
}

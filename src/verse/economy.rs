//! Generator purchases with escalating costs.
//!
//! Each tier buys its own generator with its own currency. The two lower
//! tiers floor the next cost to an integer after growth; the two upper tiers
//! keep the exact product. The regimes drift apart quickly, so the flag
//! lives in [`GeneratorTuning`](crate::config::GeneratorTuning) rather than
//! being inferred.

use tracing::debug;

use crate::config::{GeneratorTuning, Tuning};
use crate::error::EngineError;

use super::state::{PlayerState, Tier};

/// Result of a successful purchase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Purchase {
    pub tier: Tier,
    /// Currency debited.
    pub paid: f64,
    /// Generator count after the purchase.
    pub owned: u64,
    /// Price of the next unit.
    pub next_cost: f64,
}

pub fn can_afford(state: &PlayerState, tier: Tier) -> bool {
    state.balance(tier) >= state.cost(tier)
}

/// Buy one generator of `tier`. On `Err` the ledger is unchanged.
pub fn purchase(state: &mut PlayerState, tier: Tier, tuning: &Tuning) -> Result<Purchase, EngineError> {
    let cost = state.cost(tier);
    state.debit(tier, cost)?;
    state.increment_generator(tier);
    let next_cost = escalate(cost, tuning.generator(tier));
    state.set_generator_cost(tier, next_cost);

    debug!(
        generator = tier.generator_name(),
        owned = state.generators(tier),
        paid = cost,
        next_cost = state.cost(tier),
        "Generator purchased"
    );

    Ok(Purchase {
        tier,
        paid: cost,
        owned: state.generators(tier),
        next_cost: state.cost(tier),
    })
}

/// Price after one more purchase at `cost`.
///
/// Floored curves bump by at least one unit so the cost always strictly
/// rises, even for tiny configured base costs.
pub fn escalate(cost: f64, curve: &GeneratorTuning) -> f64 {
    let grown = cost * curve.growth;
    if !grown.is_finite() {
        return f64::MAX;
    }
    if curve.floor_cost {
        grown.floor().max(cost + 1.0)
    } else {
        grown
    }
}

/// Price of the unit bought after `n` purchases from `base`.
pub fn cost_after(base: f64, curve: &GeneratorTuning, n: u32) -> f64 {
    (0..n).fold(base, |cost, _| escalate(cost, curve))
}

//! Idle Verses progression engine.
//!
//! [`VerseEngine`] owns one player's ledger and is the surface the renderer
//! and the sync layer call into. Every mutator is synchronous and is
//! followed by an achievement refresh.

pub mod achievements;
pub mod economy;
pub mod offline;
pub mod prestige;
pub mod production;
pub mod save;
pub mod state;

#[cfg(test)]
mod simulator;

use serde_json::Value;
use tracing::debug;

use crate::config::Tuning;
use crate::error::EngineError;
use crate::format::format_number;

use economy::Purchase;
use offline::OfflineReport;
use prestige::Prestige;
use save::PlayerRecord;
use state::{Layer, PlayerState, Tier};

/// Display name used in messages when the player has not set one.
pub const DEFAULT_NAME: &str = "Player";

/// Result of a successful chill conversion. The reward is paid out by
/// whoever handles the message; the engine only debits.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub chill_spent: f64,
    pub diamonds: u32,
    pub message: String,
}

pub struct VerseEngine {
    state: PlayerState,
    tuning: Tuning,
}

impl VerseEngine {
    /// Fresh ledger for a new player.
    pub fn new(tuning: Tuning) -> Self {
        Self {
            state: PlayerState::new(&tuning),
            tuning,
        }
    }

    pub fn from_state(state: PlayerState, tuning: Tuning) -> Self {
        Self { state, tuning }
    }

    /// Hydrate from a stored record. See [`save::decode`].
    pub fn decode(record: &Value, tuning: Tuning) -> Result<Self, EngineError> {
        let state = save::decode(record, &tuning)?;
        Ok(Self { state, tuning })
    }

    pub fn encode(&self) -> PlayerRecord {
        save::encode(&self.state)
    }

    /// Read-only view for the renderer.
    pub fn snapshot(&self) -> &PlayerState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn set_identity(&mut self, name: &str, player_id: &str) {
        self.state.name = name.to_string();
        self.state.player_id = player_id.to_string();
    }

    // ── Actions ────────────────────────────────────────────────

    /// Advance production by `delta_seconds` at full rate and stamp `now_ms`.
    /// Returns ids unlocked by this step.
    pub fn tick(&mut self, delta_seconds: f64, now_ms: i64) -> Vec<u32> {
        production::advance(&mut self.state, delta_seconds, 1.0, now_ms);
        self.refresh_achievements()
    }

    /// Manual click. Returns the drops credited.
    pub fn harvest(&mut self) -> f64 {
        let gain = production::harvest(&mut self.state);
        self.refresh_achievements();
        gain
    }

    pub fn purchase(&mut self, tier: Tier) -> Result<Purchase, EngineError> {
        let p = economy::purchase(&mut self.state, tier, &self.tuning)?;
        self.refresh_achievements();
        Ok(p)
    }

    pub fn prestige(&mut self, layer: Layer) -> Result<Prestige, EngineError> {
        let p = prestige::prestige(&mut self.state, layer, &self.tuning)?;
        self.refresh_achievements();
        Ok(p)
    }

    /// Spend the configured chill amount for an external diamond reward.
    pub fn convert(&mut self) -> Result<Conversion, EngineError> {
        let cost = self.tuning.convert_cost;
        self.state.debit(Tier::Chill, cost)?;

        let name = if self.state.name.trim().is_empty() {
            DEFAULT_NAME
        } else {
            self.state.name.as_str()
        };
        let diamonds = self.tuning.convert_diamonds;
        let message = format!(
            "{name}, you have converted {} Chill to {diamonds} Diamonds.",
            format_number(cost)
        );
        debug!(chill_spent = cost, diamonds, "Chill converted");

        self.refresh_achievements();
        Ok(Conversion {
            chill_spent: cost,
            diamonds,
            message,
        })
    }

    /// Catch up on time spent away. Call once per load.
    pub fn reconcile_offline(&mut self, now_ms: i64) -> Option<OfflineReport> {
        let report = offline::reconcile(&mut self.state, now_ms, &self.tuning);
        self.refresh_achievements();
        report
    }

    pub fn refresh_achievements(&mut self) -> Vec<u32> {
        achievements::refresh(&mut self.state)
    }

    pub fn grant_achievement(&mut self, id: u32) -> bool {
        achievements::grant(&mut self.state, id)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn can_afford(&self, tier: Tier) -> bool {
        economy::can_afford(&self.state, tier)
    }

    pub fn can_prestige(&self, layer: Layer) -> bool {
        prestige::is_eligible(&self.state, layer, &self.tuning)
    }

    /// Multiplier factor `prestige(layer)` would grant now.
    pub fn prestige_gain(&self, layer: Layer) -> Option<f64> {
        prestige::pending_factor(&self.state, layer, &self.tuning)
    }

    pub fn can_convert(&self) -> bool {
        self.state.chill >= self.tuning.convert_cost
    }

    /// Per-second output of `tier` at current multipliers.
    pub fn rate(&self, tier: Tier) -> f64 {
        production::rate(&self.state, tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> VerseEngine {
        VerseEngine::new(Tuning::default())
    }

    #[test]
    fn buy_first_flake_then_tick() {
        let mut e = engine();
        for _ in 0..10 {
            e.harvest();
        }
        let p = e.purchase(Tier::Drops).unwrap();
        assert_eq!(p.owned, 1);
        let s = e.snapshot();
        assert!((s.drops - 0.0).abs() < f64::EPSILON);
        assert_eq!(s.flakes, 1);
        assert!((s.flake_cost - 16.0).abs() < f64::EPSILON);
        assert!(s.achievements.contains(&2));

        e.tick(0.1, 1_000);
        assert!((e.snapshot().drops - 0.1).abs() < 1e-12);
        assert_eq!(e.snapshot().last_update_ms, 1_000);
    }

    #[test]
    fn failed_purchase_leaves_state_unchanged() {
        let mut e = engine();
        e.harvest();
        let before = e.snapshot().clone();
        assert!(e.purchase(Tier::Drops).is_err());
        assert_eq!(e.snapshot(), &before);
    }

    #[test]
    fn tick_reports_new_unlocks() {
        let mut s = PlayerState::default();
        s.flakes = 1000;
        let mut e = VerseEngine::from_state(s, Tuning::default());
        let unlocked = e.tick(1.0, 5);
        assert!(unlocked.contains(&1));
        assert!(!e.tick(1.0, 6).contains(&1));
    }

    #[test]
    fn prestige_below_threshold_is_refused() {
        let mut e = engine();
        assert!(!e.can_prestige(Layer::Cold));
        assert!(e.prestige_gain(Layer::Cold).is_none());
        assert!(matches!(
            e.prestige(Layer::Cold),
            Err(EngineError::PrestigeNotEligible { .. })
        ));
    }

    #[test]
    fn cold_prestige_unlocks_achievement() {
        let mut s = PlayerState::default();
        s.total_drops = 1e21;
        let mut e = VerseEngine::from_state(s, Tuning::default());
        assert_eq!(e.refresh_achievements(), vec![1, 3]);
        assert!(e.can_prestige(Layer::Cold));
        let gain = e.prestige_gain(Layer::Cold).unwrap();
        let p = e.prestige(Layer::Cold).unwrap();
        assert!((p.factor - gain).abs() < f64::EPSILON);
        assert!(e.snapshot().achievements.contains(&4));
        // Total drops achievements earned before the reset are kept.
        assert!(e.snapshot().achievements.contains(&3));
    }

    #[test]
    fn convert_needs_a_thousand_chill() {
        let mut s = PlayerState::default();
        s.chill = 999.0;
        let mut e = VerseEngine::from_state(s, Tuning::default());
        assert!(!e.can_convert());
        let before = e.snapshot().clone();
        assert!(matches!(
            e.convert(),
            Err(EngineError::InsufficientFunds { tier: Tier::Chill, .. })
        ));
        assert_eq!(e.snapshot(), &before);
    }

    #[test]
    fn convert_debits_exactly_and_names_player() {
        let mut s = PlayerState::default();
        s.name = "Rin".into();
        s.chill = 2500.0;
        s.total_chill = 2500.0;
        let mut e = VerseEngine::from_state(s, Tuning::default());
        let c = e.convert().unwrap();
        assert!((e.snapshot().chill - 1500.0).abs() < f64::EPSILON);
        assert!((e.snapshot().total_chill - 2500.0).abs() < f64::EPSILON);
        assert_eq!(c.diamonds, 100);
        assert_eq!(c.message, "Rin, you have converted 1.00e3 Chill to 100 Diamonds.");
    }

    #[test]
    fn convert_message_defaults_name() {
        let mut s = PlayerState::default();
        s.chill = 1000.0;
        let mut e = VerseEngine::from_state(s, Tuning::default());
        assert!(e.convert().unwrap().message.starts_with("Player, "));
    }

    #[test]
    fn offline_then_refresh() {
        let mut s = PlayerState::default();
        s.flakes = 5;
        s.last_update_ms = 1_000_000;
        let mut e = VerseEngine::from_state(s, Tuning::default());
        let r = e.reconcile_offline(1_000_000 + 10_000_000).unwrap();
        assert!((r.gains.of(Tier::Drops) - 25_000.0).abs() < 1e-6);
        assert!(e.snapshot().achievements.contains(&1));
        assert!(e.reconcile_offline(1_000_000 + 10_000_000).is_none());
    }

    #[test]
    fn encode_decode_through_engine() {
        let mut e = engine();
        e.set_identity("Aki", "15559990000");
        for _ in 0..25 {
            e.harvest();
        }
        e.purchase(Tier::Drops).unwrap();
        e.tick(0.1, 42);
        let value = serde_json::to_value(e.encode()).unwrap();
        let restored = VerseEngine::decode(&value, Tuning::default()).unwrap();
        assert_eq!(restored.snapshot(), e.snapshot());
    }
}

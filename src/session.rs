//! One player's running game: the engine, the fixed-step clock, and the
//! throttled save to a [`PlayerStore`].
//!
//! The host drives it with `frame(now)` from its render loop. Simulation
//! never waits on persistence: store failures are logged and dropped.

use tracing::{info, warn};

use crate::config::Tuning;
use crate::error::EngineError;
use crate::leaderboard::{LeaderboardEntry, TOP_N};
use crate::profile::Profile;
use crate::store::PlayerStore;
use crate::time::GameTime;
use crate::verse::achievements::TOP_LEADERBOARD;
use crate::verse::offline::OfflineReport;
use crate::verse::{save, VerseEngine};

/// How the ledger was obtained at start.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// No stored record for this player.
    Fresh,
    /// Stored record decoded; `offline` is the catch-up that was applied.
    Restored { offline: Option<OfflineReport> },
    /// Stored record was unusable and a fresh ledger replaced it.
    Reset(EngineError),
}

pub struct Session<S: PlayerStore> {
    engine: VerseEngine,
    store: S,
    profile: Profile,
    clock: GameTime,
    last_save_ms: Option<i64>,
    outcome: LoadOutcome,
}

impl<S: PlayerStore> Session<S> {
    /// Load the player's record (or start fresh), apply offline progress
    /// and evaluate achievements.
    ///
    /// Fails only when `tuning` does not validate; store and record problems
    /// are recovered from and reported through [`Session::outcome`].
    pub fn start(
        store: S,
        tuning: Tuning,
        profile: Profile,
        now_ms: i64,
    ) -> Result<Self, EngineError> {
        tuning.validate()?;

        let stored = match store.read(&profile.player_id) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, player = %profile.player_id, "Store read failed; starting fresh");
                None
            }
        };

        let (mut engine, restored) = match stored {
            None => (VerseEngine::new(tuning), Err(None)),
            Some(text) => match save::decode_str(&text, &tuning) {
                Ok(state) => (VerseEngine::from_state(state, tuning), Ok(())),
                Err(e) => {
                    warn!(error = %e, player = %profile.player_id, "Discarding unreadable save");
                    (VerseEngine::new(tuning), Err(Some(e)))
                }
            },
        };

        engine.set_identity(&profile.name, &profile.player_id);
        let offline = engine.reconcile_offline(now_ms);

        let outcome = match restored {
            Ok(()) => LoadOutcome::Restored { offline },
            Err(None) => LoadOutcome::Fresh,
            Err(Some(e)) => LoadOutcome::Reset(e),
        };
        info!(player = %profile.player_id, outcome = ?outcome, "Session started");

        let clock = GameTime::new(engine.tuning().tick_ms, engine.tuning().max_frame_ms);
        Ok(Self {
            engine,
            store,
            profile,
            clock,
            last_save_ms: None,
            outcome,
        })
    }

    /// Advance by however many fixed ticks the wall clock allows, then save
    /// if the throttle permits. Returns the ticks run.
    pub fn frame(&mut self, now_ms: i64) -> u32 {
        let ticks = self.clock.update(now_ms as f64);
        let dt = self.engine.tuning().tick_seconds();
        for _ in 0..ticks {
            self.engine.tick(dt, now_ms);
        }
        self.persist(now_ms, false);
        ticks
    }

    /// Return from a suspension (hidden tab, app in background). The gap is
    /// credited as offline time rather than as a burst of ticks.
    pub fn resume(&mut self, now_ms: i64) -> Option<OfflineReport> {
        self.clock.reset();
        self.engine.reconcile_offline(now_ms)
    }

    /// Write the record and leaderboard entry unless a save happened within
    /// the throttle window. `force` skips the throttle (e.g. on page hide).
    /// Returns whether a save was attempted.
    pub fn persist(&mut self, now_ms: i64, force: bool) -> bool {
        let interval = self.engine.tuning().save_interval_ms;
        if !force && self.last_save_ms.is_some_and(|t| now_ms - t < interval) {
            return false;
        }
        self.last_save_ms = Some(now_ms);

        let id = self.profile.player_id.clone();
        match save::encode_string(self.engine.snapshot()) {
            Ok(json) => {
                if let Err(e) = self.store.write(&id, &json) {
                    warn!(error = %e, player = %id, "Save failed");
                }
            }
            Err(e) => warn!(error = %e, player = %id, "Save encoding failed"),
        }

        let key = self.profile.leaderboard_key();
        let entry = LeaderboardEntry::from_state(self.engine.snapshot());
        if let Err(e) = self.store.write_leaderboard(&key, &entry) {
            warn!(error = %e, key = %key, "Leaderboard update failed");
        }

        match self.store.top_leaderboard(TOP_N) {
            Ok(top) if top.iter().any(|(k, _)| *k == key) => {
                self.engine.grant_achievement(TOP_LEADERBOARD);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Leaderboard read failed"),
        }
        true
    }

    pub fn engine(&self) -> &VerseEngine {
        &self.engine
    }

    /// For player actions (harvest, purchase, prestige, convert).
    pub fn engine_mut(&mut self) -> &mut VerseEngine {
        &mut self.engine
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn total_ticks(&self) -> u64 {
        self.clock.total_ticks
    }

    /// Hand back the store, e.g. to start the next session on it.
    pub fn into_store(self) -> S {
        self.store
    }
}

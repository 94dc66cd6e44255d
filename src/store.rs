//! Persistence collaborators.
//!
//! The engine never depends on a write succeeding. Stores hand back raw JSON
//! text so that decoding, and its fallback to a fresh ledger, stays in one
//! place.

use std::collections::{BTreeMap, HashMap};

use crate::error::EngineError;
use crate::leaderboard::{self, LeaderboardEntry};

/// Prefix of every key this crate writes.
pub const KEY_PREFIX: &str = "idleVerses";

pub trait PlayerStore {
    /// Stored record text for `player_id`, if any.
    fn read(&self, player_id: &str) -> Result<Option<String>, EngineError>;

    fn write(&mut self, player_id: &str, record: &str) -> Result<(), EngineError>;

    fn write_leaderboard(&mut self, key: &str, entry: &LeaderboardEntry) -> Result<(), EngineError>;

    /// Best `n` leaderboard entries with their keys, ranked.
    fn top_leaderboard(&self, n: usize) -> Result<Vec<(String, LeaderboardEntry)>, EngineError>;
}

/// In-process store for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
    board: BTreeMap<String, LeaderboardEntry>,
    /// Make every write fail, to exercise fire-and-forget paths.
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record verbatim, bypassing `fail_writes`.
    pub fn insert_raw(&mut self, player_id: &str, record: &str) {
        self.records.insert(player_id.to_string(), record.to_string());
    }

    pub fn leaderboard_len(&self) -> usize {
        self.board.len()
    }

    fn check_writable(&self) -> Result<(), EngineError> {
        if self.fail_writes {
            Err(EngineError::Store("memory store is read-only".into()))
        } else {
            Ok(())
        }
    }
}

impl PlayerStore for MemoryStore {
    fn read(&self, player_id: &str) -> Result<Option<String>, EngineError> {
        Ok(self.records.get(player_id).cloned())
    }

    fn write(&mut self, player_id: &str, record: &str) -> Result<(), EngineError> {
        self.check_writable()?;
        self.records.insert(player_id.to_string(), record.to_string());
        Ok(())
    }

    fn write_leaderboard(&mut self, key: &str, entry: &LeaderboardEntry) -> Result<(), EngineError> {
        self.check_writable()?;
        self.board.insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn top_leaderboard(&self, n: usize) -> Result<Vec<(String, LeaderboardEntry)>, EngineError> {
        let all: Vec<(String, LeaderboardEntry)> =
            self.board.iter().map(|(k, e)| (k.clone(), e.clone())).collect();
        Ok(leaderboard::top_n(&all, n))
    }
}

/// Browser `localStorage` store. Player records live under
/// `idleVerses:<id>`; the leaderboard is one JSON map under
/// `idleVerses:leaderboard`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// `None` when the page has no window or storage is disabled.
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }

    fn player_key(player_id: &str) -> String {
        format!("{KEY_PREFIX}:{player_id}")
    }

    fn board_key() -> String {
        format!("{KEY_PREFIX}:leaderboard")
    }

    fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        self.storage
            .get_item(key)
            .map_err(|e| EngineError::Store(format!("localStorage read failed: {e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| EngineError::Store(format!("localStorage write failed: {e:?}")))
    }

    fn load_board(&self) -> Result<BTreeMap<String, LeaderboardEntry>, EngineError> {
        match self.get(&Self::board_key())? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                EngineError::Store(format!("leaderboard unreadable: {e}"))
            }),
            None => Ok(BTreeMap::new()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl PlayerStore for LocalStorageStore {
    fn read(&self, player_id: &str) -> Result<Option<String>, EngineError> {
        self.get(&Self::player_key(player_id))
    }

    fn write(&mut self, player_id: &str, record: &str) -> Result<(), EngineError> {
        self.set(&Self::player_key(player_id), record)
    }

    fn write_leaderboard(&mut self, key: &str, entry: &LeaderboardEntry) -> Result<(), EngineError> {
        // A corrupt board is replaced rather than blocking every save.
        let mut board = self.load_board().unwrap_or_default();
        board.insert(key.to_string(), entry.clone());
        let json = serde_json::to_string(&board).map_err(|e| EngineError::Store(e.to_string()))?;
        self.set(&Self::board_key(), &json)
    }

    fn top_leaderboard(&self, n: usize) -> Result<Vec<(String, LeaderboardEntry)>, EngineError> {
        let all: Vec<(String, LeaderboardEntry)> = self.load_board()?.into_iter().collect();
        Ok(leaderboard::top_n(&all, n))
    }
}

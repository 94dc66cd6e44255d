//! Public leaderboard projection of a player record.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::verse::state::PlayerState;

/// How many entries the leaderboard shows.
pub const TOP_N: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub chillverse: f64,
    pub last_update: i64,
}

impl LeaderboardEntry {
    pub fn from_state(state: &PlayerState) -> Self {
        Self {
            name: state.name.clone(),
            chillverse: state.chillverse,
            last_update: state.last_update_ms,
        }
    }
}

/// Highest chillverse first; ties go to the most recently updated entry.
pub fn rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.chillverse
        .total_cmp(&a.chillverse)
        .then_with(|| b.last_update.cmp(&a.last_update))
}

/// The best `n` keyed entries, ranked.
pub fn top_n<K: Clone>(entries: &[(K, LeaderboardEntry)], n: usize) -> Vec<(K, LeaderboardEntry)> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|(_, a), (_, b)| rank(a, b));
    ranked.truncate(n);
    ranked
}

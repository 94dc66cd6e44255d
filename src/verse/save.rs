//! Persistence codec for the player ledger.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current record format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format still loadable. Only bump on a
//!   breaking change (a field removed or its meaning changed).
//!
//! Records written before versioning have no `version` field and are read
//! as version 1. Decoding is field-by-field: a missing or mistyped field
//! takes its default and the rest of the record still loads.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::Tuning;
use crate::error::EngineError;

use super::state::PlayerState;

/// Record format written by [`encode`].
pub const SAVE_VERSION: u32 = 2;

/// Oldest record format [`decode`] accepts.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Version assumed for records without a `version` field.
const LEGACY_VERSION: u32 = 1;

/// Stored shape of one player, in the camelCase layout the remote store and
/// the leaderboard readers expect.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub version: u32,
    pub name: String,
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

    pub chillverse: f64,
    pub verse: u64,
    pub verse_cost: f64,

    pub cold_mult: f64,
    pub insp_mult: f64,
    pub script_mult: f64,

    /// Ascending.
    pub achievements: Vec<u32>,
    pub last_update: i64,
}

/// Copy every ledger field into a record.
pub fn encode(state: &PlayerState) -> PlayerRecord {
    PlayerRecord {
        version: SAVE_VERSION,
        name: state.name.clone(),
        player_id: state.player_id.clone(),
        drops: state.drops,
        total_drops: state.total_drops,
        flakes: state.flakes,
        flake_cost: state.flake_cost,
        chill: state.chill,
        total_chill: state.total_chill,
        chill_gen: state.chill_gen,
        chill_gen_cost: state.chill_gen_cost,
        insp: state.insp,
        total_insp: state.total_insp,
        revel: state.revel,
        revel_cost: state.revel_cost,
        chillverse: state.chillverse,
        verse: state.verse,
        verse_cost: state.verse_cost,
        cold_mult: state.cold_mult,
        insp_mult: state.insp_mult,
        script_mult: state.script_mult,
        achievements: state.achievements.iter().copied().collect(),
        last_update: state.last_update_ms,
    }
}

/// Encode straight to JSON text.
pub fn encode_string(state: &PlayerState) -> Result<String, EngineError> {
    serde_json::to_string(&encode(state)).map_err(|e| EngineError::Store(e.to_string()))
}

/// Parse JSON text and decode it. Unparsable text is `CorruptSave`.
pub fn decode_str(json: &str, tuning: &Tuning) -> Result<PlayerState, EngineError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| EngineError::CorruptSave(e.to_string()))?;
    decode(&value, tuning)
}

/// Rebuild a ledger from a stored record.
///
/// Only a record that is not a JSON object, or one whose version is older
/// than [`MIN_COMPATIBLE_VERSION`], fails; the caller then starts fresh. An
/// unreadable `version` is treated as absent.
pub fn decode(record: &Value, tuning: &Tuning) -> Result<PlayerState, EngineError> {
    let Some(obj) = record.as_object() else {
        return Err(EngineError::CorruptSave(format!(
            "expected an object, found {}",
            kind_of(record)
        )));
    };

    let version = match obj.get("version") {
        None | Some(Value::Null) => LEGACY_VERSION,
        Some(v) => match v.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(v) => v,
            None => {
                debug!(value = %v, "Unreadable save version; reading as legacy");
                LEGACY_VERSION
            }
        },
    };
    if version < MIN_COMPATIBLE_VERSION {
        return Err(EngineError::CorruptSave(format!(
            "save version {version} is older than {MIN_COMPATIBLE_VERSION}"
        )));
    }
    if version > SAVE_VERSION {
        warn!(version, current = SAVE_VERSION, "Save written by a newer format; reading known fields");
    } else if version < SAVE_VERSION {
        debug!(version, current = SAVE_VERSION, "Migrating older save");
    }

    let d = PlayerState::new(tuning);
    let f = Fields(obj);

    Ok(PlayerState {
        name: f.string("name").unwrap_or(d.name),
        player_id: f
            .string("playerId")
            .or_else(|| f.string("phone"))
            .unwrap_or(d.player_id),

        drops: f.amount("drops").unwrap_or(d.drops),
        total_drops: f.amount("totalDrops").unwrap_or(d.total_drops),
        flakes: f.count("flakes").unwrap_or(d.flakes),
        flake_cost: f.cost("flakeCost").unwrap_or(d.flake_cost),

        chill: f.amount("chill").unwrap_or(d.chill),
        total_chill: f.amount("totalChill").unwrap_or(d.total_chill),
        chill_gen: f.count("chillGen").unwrap_or(d.chill_gen),
        chill_gen_cost: f.cost("chillGenCost").unwrap_or(d.chill_gen_cost),

        insp: f.amount("insp").unwrap_or(d.insp),
        total_insp: f.amount("totalInsp").unwrap_or(d.total_insp),
        revel: f.count("revel").unwrap_or(d.revel),
        revel_cost: f.cost("revelCost").unwrap_or(d.revel_cost),

        chillverse: f.amount("chillverse").unwrap_or(d.chillverse),
        verse: f.count("verse").unwrap_or(d.verse),
        verse_cost: f.cost("verseCost").unwrap_or(d.verse_cost),

        cold_mult: f.multiplier("coldMult").unwrap_or(d.cold_mult),
        insp_mult: f.multiplier("inspMult").unwrap_or(d.insp_mult),
        script_mult: f.multiplier("scriptMult").unwrap_or(d.script_mult),

        achievements: f.id_set("achievements"),
        last_update_ms: f.timestamp("lastUpdate").unwrap_or(d.last_update_ms),
    })
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Typed, validating reads over one record. Each reader returns `None` for
/// a missing field or a value of the wrong shape.
struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn rejected(&self, key: &str) {
        if let Some(v) = self.get(key) {
            debug!(field = key, value = %v, "Ignoring malformed save field");
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => {
                self.rejected(key);
                None
            }
        }
    }

    fn float(&self, key: &str, valid: impl Fn(f64) -> bool) -> Option<f64> {
        match self.get(key)?.as_f64() {
            Some(x) if x.is_finite() && valid(x) => Some(x),
            _ => {
                self.rejected(key);
                None
            }
        }
    }

    /// Balance or lifetime total: finite and non-negative.
    fn amount(&self, key: &str) -> Option<f64> {
        self.float(key, |x| x >= 0.0)
    }

    fn cost(&self, key: &str) -> Option<f64> {
        self.float(key, |x| x > 0.0)
    }

    fn multiplier(&self, key: &str) -> Option<f64> {
        self.float(key, |x| x >= 1.0)
    }

    /// Generator count. Integral floats (`5.0`) are accepted.
    fn count(&self, key: &str) -> Option<u64> {
        let v = self.get(key)?;
        if let Some(n) = v.as_u64() {
            return Some(n);
        }
        match v.as_f64() {
            Some(x) if x >= 0.0 && x.fract() == 0.0 && x < u64::MAX as f64 => Some(x as u64),
            _ => {
                self.rejected(key);
                None
            }
        }
    }

    fn timestamp(&self, key: &str) -> Option<i64> {
        let v = self.get(key)?;
        if let Some(n) = v.as_i64() {
            return (n >= 0).then_some(n);
        }
        match v.as_f64() {
            Some(x) if x >= 0.0 && x.is_finite() && x < i64::MAX as f64 => Some(x.floor() as i64),
            _ => {
                self.rejected(key);
                None
            }
        }
    }

    /// A list of ids becomes a set; entries that are not small
    /// non-negative integers are skipped. Any other shape is the empty set.
    fn id_set(&self, key: &str) -> BTreeSet<u32> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|i| i.as_u64().and_then(|n| u32::try_from(n).ok()))
                .collect(),
            Some(_) => {
                self.rejected(key);
                BTreeSet::new()
            }
            None => BTreeSet::new(),
        }
    }
}

//! Idle Verses: progression engine for a four-tier idle game.
//!
//! Drops, Chill, Insp and ChillVerse are produced by generators bought with
//! the same currency, and three prestige layers (Cold, Insp, Script) trade
//! lifetime totals for permanent multipliers. [`verse::VerseEngine`] is the
//! engine; [`session::Session`] runs it against a clock and a store.

pub mod config;
pub mod error;
pub mod format;
pub mod leaderboard;
pub mod profile;
pub mod session;
pub mod store;
pub mod time;
pub mod verse;

pub use config::Tuning;
pub use error::EngineError;
pub use profile::Profile;
pub use session::{LoadOutcome, Session};
pub use store::{MemoryStore, PlayerStore};
pub use verse::state::{Layer, PlayerState, Tier};
pub use verse::VerseEngine;

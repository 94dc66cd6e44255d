//! Error taxonomy for the progression engine.
//!
//! Nothing here is fatal. Every variant describes a request the engine
//! refused or a value it clamped; the ledger is unchanged whenever an
//! operation returns `Err`.

use crate::verse::state::{Layer, Tier};

/// Errors surfaced by engine operations and their collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A purchase or conversion cost more than the current balance.
    #[error("insufficient {tier:?}: need {needed}, have {available}")]
    InsufficientFunds {
        /// Currency that was short.
        tier: Tier,
        /// Amount the operation required.
        needed: f64,
        /// Balance at the time of the request.
        available: f64,
    },

    /// A prestige layer was triggered below its threshold.
    #[error("{layer:?} prestige locked: lifetime total {total} below {threshold}")]
    PrestigeNotEligible {
        /// Layer that was requested.
        layer: Layer,
        /// Current value of the gating lifetime total.
        total: f64,
        /// Threshold the total must reach.
        threshold: f64,
    },

    /// A stored record could not be decoded at all.
    #[error("corrupt save: {0}")]
    CorruptSave(String),

    /// Elapsed time was negative or not finite.
    #[error("clock skew: elapsed {elapsed_seconds}s treated as zero")]
    ClockSkew {
        /// The rejected elapsed time.
        elapsed_seconds: f64,
    },

    /// Login input did not yield a usable identity.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Tuning overrides were unparsable or out of range.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// A persistence collaborator failed.
    #[error("store error: {0}")]
    Store(String),
}

impl EngineError {
    /// Whether the session can carry on after this error.
    ///
    /// The core degrades every failure to a no-op or a clamped value, so
    /// this only returns false for configuration errors raised before a
    /// session exists.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EngineError::InvalidTuning(_))
    }
}

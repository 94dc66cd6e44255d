//! Catch-up production for time spent away.

use tracing::{info, warn};

use crate::config::Tuning;
use crate::error::EngineError;

use super::production::{self, Yield};
use super::state::{PlayerState, Tier};

/// What one reconciliation credited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OfflineReport {
    /// Wall time since the last stamp.
    pub elapsed_seconds: f64,
    /// Time actually credited after the cap.
    pub credited_seconds: f64,
    pub damping: f64,
    pub gains: Yield,
}

/// Credit production for the time between `last_update_ms` and `now_ms`.
///
/// The elapsed time is capped at `offline_cap_seconds` and scaled by
/// `offline_damping`. Because `advance` stamps `now_ms`, a second call in
/// the same load sees zero elapsed time and returns `None`. A ledger that
/// was never stamped is stamped without any credit.
pub fn reconcile(state: &mut PlayerState, now_ms: i64, tuning: &Tuning) -> Option<OfflineReport> {
    if state.last_update_ms == 0 {
        state.stamp(now_ms);
        return None;
    }

    let elapsed_seconds = (now_ms as f64 - state.last_update_ms as f64) / 1000.0;
    if elapsed_seconds <= 0.0 {
        if elapsed_seconds < 0.0 {
            let err = EngineError::ClockSkew { elapsed_seconds };
            warn!(
                error = %err,
                last_update_ms = state.last_update_ms,
                now_ms,
                "Stored stamp is in the future; no offline credit"
            );
        }
        return None;
    }

    let credited_seconds = elapsed_seconds.min(tuning.offline_cap_seconds);
    let gains = production::advance(state, credited_seconds, tuning.offline_damping, now_ms);

    info!(
        elapsed_seconds,
        credited_seconds,
        drops = gains.of(Tier::Drops),
        "Offline progress applied"
    );

    Some(OfflineReport {
        elapsed_seconds,
        credited_seconds,
        damping: tuning.offline_damping,
        gains,
    })
}

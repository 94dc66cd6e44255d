//! Fixed-timestep game clock using an accumulator pattern, plus the wall
//! clock used to stamp the ledger.
//!
//! The host calls `update()` once per frame with a wall-clock timestamp.
//! GameTime converts that into a whole number of fixed ticks so production
//! stays deterministic no matter how irregular the frames are.

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Longest frame accepted before clamping
    max_frame_ms: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ms_per_tick: f64, max_frame_ms: f64) -> Self {
        Self {
            ms_per_tick,
            max_frame_ms,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp. Returns the number of fixed ticks to run.
    ///
    /// Frames longer than `max_frame_ms` are clamped; a backgrounded tab is
    /// caught up by offline reconciliation, not by a burst of ticks.
    /// A timestamp that runs backwards counts as a zero-length frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => {
                let d = now_ms - prev;
                if d.is_finite() {
                    d.clamp(0.0, self.max_frame_ms)
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Forget the previous frame, e.g. after the session was suspended.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_timestamp = None;
    }
}

/// Milliseconds since the Unix epoch from the platform clock.
#[cfg(target_arch = "wasm32")]
pub fn epoch_millis() -> i64 {
    js_sys::Date::now() as i64
}

/// Milliseconds since the Unix epoch from the platform clock.
#[cfg(not(target_arch = "wasm32"))]
pub fn epoch_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

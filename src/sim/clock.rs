//! Pause-adjusted simulation clock
//!
//! The host passes a wall-clock timestamp (ms) into every tick. Entities never
//! read the wall clock themselves; they receive `sim_now`, which is the wall
//! clock minus all time spent paused. Every timer therefore behaves as if no
//! time passed during a pause.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    /// Total milliseconds spent paused so far
    pause_offset_ms: u64,
    /// Wall-clock time the current pause began, if paused
    paused_at: Option<u64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pause-adjusted time for a wall-clock timestamp
    pub fn sim_time(&self, wall_ms: u64) -> u64 {
        wall_ms.saturating_sub(self.pause_offset_ms)
    }

    pub fn pause_offset_ms(&self) -> u64 {
        self.pause_offset_ms
    }

    pub fn pause(&mut self, wall_ms: u64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(wall_ms);
        }
    }

    /// End the current pause, returning how long it lasted
    pub fn resume(&mut self, wall_ms: u64) -> u64 {
        match self.paused_at.take() {
            Some(start) => {
                let paused_for = wall_ms.saturating_sub(start);
                self.pause_offset_ms += paused_for;
                paused_for
            }
            None => 0,
        }
    }
}

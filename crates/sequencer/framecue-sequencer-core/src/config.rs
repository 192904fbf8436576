//! Core configuration for framecue-sequencer-core.

use serde::{Deserialize, Serialize};

/// Configuration for a render run.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Frames per second; converts authored seconds into frames.
    pub fps: u32,

    /// Optional total-frame budget for bounded renders. `advance()` on the
    /// clock fails with `ClockExhausted` once this many frames have run.
    pub max_frames: Option<u64>,

    /// Upper bound on immediately-complete ops a single procedure may
    /// cascade through within one tick. Exceeding it is `ScheduleCorruption`
    /// (guards zero-duration authoring loops).
    pub max_cascade_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            max_frames: None,
            max_cascade_per_tick: 256,
        }
    }
}

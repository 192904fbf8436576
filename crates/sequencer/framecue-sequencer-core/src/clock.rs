//! Frame clock: the authoritative source of the current frame index.
//!
//! One instance per render run, owned by the engine. Frames only move
//! forward, one per scheduling step; a new run gets a new clock.

use serde::{Deserialize, Serialize};

use crate::error::SequencerError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameClock {
    current: u64,
    fps: u32,
    /// Total-frame budget for bounded renders; `None` runs unbounded.
    max_frames: Option<u64>,
}

impl FrameClock {
    pub fn new(fps: u32, max_frames: Option<u64>) -> Self {
        debug_assert!(fps > 0, "fps must be positive");
        Self {
            current: 0,
            fps: fps.max(1),
            max_frames,
        }
    }

    /// Current frame index, non-mutating.
    #[inline]
    pub fn now(&self) -> u64 {
        self.current
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Consume the current frame and move to the next one. Returns the
    /// frame index that was just consumed, or `ClockExhausted` once the
    /// configured budget has been spent.
    pub fn advance(&mut self) -> Result<u64, SequencerError> {
        if let Some(max) = self.max_frames {
            if self.current >= max {
                return Err(SequencerError::ClockExhausted { budget: max });
            }
        }
        let frame = self.current;
        self.current += 1;
        Ok(frame)
    }

    /// Authoring convenience: seconds to whole frames at this clock's fps,
    /// rounded to nearest.
    #[inline]
    pub fn frames(&self, seconds: f32) -> u64 {
        (seconds * self.fps as f32).round().max(0.0) as u64
    }
}

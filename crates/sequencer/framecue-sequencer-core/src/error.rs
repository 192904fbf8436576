//! Error types for the sequencing engine.
//!
//! All failures here are local and synchronous; none are retried, because
//! authoring errors are deterministic and a retry reproduces the same
//! failure. The isolation boundary is one scheduled task: a task-level
//! error cancels that task and unrelated tasks keep running.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SequencerError {
    /// Malformed interpolation input (fewer than two knots, knots not
    /// strictly increasing, or mismatched range lengths). Always an
    /// authoring bug.
    #[error("degenerate interpolation range: {reason}")]
    DegenerateRange { reason: String },

    /// Two concurrently-active operations wrote one property in one tick.
    /// Debug builds fail the offending task fast; release builds log a
    /// warning and keep last-writer-wins order.
    #[error("conflicting write to '{path}' at frame {frame}")]
    ConflictingWrite { path: String, frame: u64 },

    /// The render exceeded its configured total-frame budget.
    #[error("frame budget exhausted after {budget} frames")]
    ClockExhausted { budget: u64 },

    /// A procedure yielded a node the scheduler cannot honor (unknown
    /// target, reserved extrapolation, runaway zero-duration cascade).
    /// Indicates an authoring/engine mismatch.
    #[error("schedule corruption: {reason}")]
    ScheduleCorruption { reason: String },
}

impl SequencerError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        SequencerError::DegenerateRange {
            reason: reason.into(),
        }
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        SequencerError::ScheduleCorruption {
            reason: reason.into(),
        }
    }
}

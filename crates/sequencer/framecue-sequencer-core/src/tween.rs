//! Tween operation: a timed interpolation of one property from a start to
//! an end value over a whole number of frames.
//!
//! The authored spec is immutable; runtime progress (activation frame,
//! captured start value) lives in the scheduler's op state. When `from` is
//! `None` the live property value is captured once at activation, the way
//! scene scripts tween "from wherever the node currently is".

use serde::{Deserialize, Serialize};

use framecue_api_core::{lerp_value, PropPath, Value};

use crate::ease::Easing;
use crate::error::SequencerError;
use crate::interp::{interpolate, InterpOptions};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub target: PropPath,
    /// Explicit start value, or `None` to capture the live value at
    /// activation.
    #[serde(default)]
    pub from: Option<Value>,
    pub to: Value,
    /// Duration in frames; zero commits `to` and completes on the start
    /// frame.
    pub duration: u64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub extrapolate: InterpOptions,
}

impl Tween {
    /// Tween from an explicit start value.
    pub fn new(target: PropPath, from: Value, to: Value, duration: u64) -> Self {
        Self {
            target,
            from: Some(from),
            to,
            duration,
            easing: Easing::default(),
            extrapolate: InterpOptions::CLAMP,
        }
    }

    /// Tween from the live property value, captured at activation.
    pub fn to(target: PropPath, to: Value, duration: u64) -> Self {
        Self {
            target,
            from: None,
            to,
            duration,
            easing: Easing::default(),
            extrapolate: InterpOptions::CLAMP,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn extrapolate(mut self, opts: InterpOptions) -> Self {
        self.extrapolate = opts;
        self
    }

    /// True iff the operation's frame range has fully elapsed.
    #[inline]
    pub fn is_complete(&self, elapsed: u64) -> bool {
        elapsed >= self.duration
    }

    /// Value at `elapsed` frames into the operation, interpolating the
    /// normalized progress through the easing curve and scaling into
    /// `[from, to]`. `from` is the resolved start value.
    pub fn value_at(&self, elapsed: u64, from: &Value) -> Result<Value, SequencerError> {
        if from.kind() != self.to.kind() {
            return Err(SequencerError::corrupt(format!(
                "tween endpoints for '{}' have mismatched kinds ({:?} -> {:?})",
                self.target,
                from.kind(),
                self.to.kind()
            )));
        }
        if self.duration == 0 {
            return Ok(self.to.clone());
        }
        let t = interpolate(
            elapsed as f32,
            &[0.0, self.duration as f32],
            &[0.0, 1.0],
            self.extrapolate,
        )?;
        Ok(lerp_value(from, &self.to, self.easing.apply(t)))
    }
}

//! Piecewise-linear interpolation over frame knots.
//!
//! `interpolate` is pure and deterministic: identical inputs produce
//! bit-identical outputs, which the tests rely on. Time enters as an f32
//! frame coordinate; the engine passes whole-frame values but authored
//! knots may be arbitrary strictly-increasing floats.

use serde::{Deserialize, Serialize};

use crate::error::SequencerError;

/// Behavior outside the knot range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolate {
    /// Saturate to the nearest endpoint value.
    #[default]
    Clamp,
    /// Extend the edge segment's slope unbounded.
    Extend,
    /// Reserved; requesting it is an authoring error.
    Wrap,
}

/// Per-side extrapolation options.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpOptions {
    #[serde(default)]
    pub left: Extrapolate,
    #[serde(default)]
    pub right: Extrapolate,
}

impl InterpOptions {
    pub const CLAMP: InterpOptions = InterpOptions {
        left: Extrapolate::Clamp,
        right: Extrapolate::Clamp,
    };

    pub fn extend() -> Self {
        Self {
            left: Extrapolate::Extend,
            right: Extrapolate::Extend,
        }
    }
}

fn validate(input_range: &[f32], output_range: &[f32]) -> Result<(), SequencerError> {
    if input_range.len() < 2 {
        return Err(SequencerError::degenerate(format!(
            "input range needs at least 2 knots, got {}",
            input_range.len()
        )));
    }
    if input_range.len() != output_range.len() {
        return Err(SequencerError::degenerate(format!(
            "input range has {} knots but output range has {}",
            input_range.len(),
            output_range.len()
        )));
    }
    for w in input_range.windows(2) {
        if !(w[0] < w[1]) || !w[0].is_finite() || !w[1].is_finite() {
            return Err(SequencerError::degenerate(format!(
                "input knots must be finite and strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
    }
    Ok(())
}

/// Map `x` through parallel `input_range`/`output_range` knot sequences with
/// piecewise-linear segments between bracketing knots.
pub fn interpolate(
    x: f32,
    input_range: &[f32],
    output_range: &[f32],
    opts: InterpOptions,
) -> Result<f32, SequencerError> {
    validate(input_range, output_range)?;

    let n = input_range.len();
    let first = input_range[0];
    let last = input_range[n - 1];

    if x < first {
        return match opts.left {
            Extrapolate::Clamp => Ok(output_range[0]),
            Extrapolate::Extend => Ok(segment(x, input_range, output_range, 0)),
            Extrapolate::Wrap => Err(SequencerError::corrupt(
                "wrap extrapolation is reserved and not implemented",
            )),
        };
    }
    if x > last {
        return match opts.right {
            Extrapolate::Clamp => Ok(output_range[n - 1]),
            Extrapolate::Extend => Ok(segment(x, input_range, output_range, n - 2)),
            Extrapolate::Wrap => Err(SequencerError::corrupt(
                "wrap extrapolation is reserved and not implemented",
            )),
        };
    }

    // Linear scan for the bracketing segment (knot lists are short;
    // binary search is not worth it).
    for i in 0..(n - 1) {
        if x >= input_range[i] && x <= input_range[i + 1] {
            return Ok(segment(x, input_range, output_range, i));
        }
    }
    // Unreachable after the range checks above; saturate for safety.
    Ok(output_range[n - 1])
}

/// Evaluate the linear segment `[i, i+1]` at `x` (not clamped).
#[inline]
fn segment(x: f32, input_range: &[f32], output_range: &[f32], i: usize) -> f32 {
    let x0 = input_range[i];
    let x1 = input_range[i + 1];
    let y0 = output_range[i];
    let y1 = output_range[i + 1];
    let t = (x - x0) / (x1 - x0);
    y0 + (y1 - y0) * t
}

//! Easing curves: monotone maps [0,1] -> [0,1] applied to a tween's
//! normalized progress before it scales into the output range.
//!
//! `Bezier` uses cubic-bezier timing control points (x1, y1, x2, y2) and
//! inverts the x-curve by bisection, the same scheme CSS/animation tools
//! use for `cubic-bezier(...)` timing.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Identity; with Extend extrapolation the raw progress passes through
    /// unclamped.
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// Cubic-bezier timing control points (x1, y1, x2, y2).
    Bezier([f32; 4]),
}

impl Easing {
    /// Apply the curve to normalized progress. Non-linear curves clamp
    /// into [0,1] first; `Linear` passes out-of-range progress through so
    /// `Extrapolate::Extend` keeps its meaning.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::QuadIn => {
                let t = t.clamp(0.0, 1.0);
                t * t
            }
            Easing::QuadOut => {
                let t = t.clamp(0.0, 1.0);
                1.0 - (1.0 - t) * (1.0 - t)
            }
            Easing::QuadInOut => {
                let t = t.clamp(0.0, 1.0);
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Easing::CubicIn => {
                let t = t.clamp(0.0, 1.0);
                t * t * t
            }
            Easing::CubicOut => {
                let t = t.clamp(0.0, 1.0);
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::CubicInOut => {
                let t = t.clamp(0.0, 1.0);
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Easing::Bezier([x1, y1, x2, y2]) => bezier_ease_t(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    // Fast path: Bezier(0,0,1,1) is exactly linear -> eased t == t
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn endpoints_are_fixed() {
        for ease in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
            Easing::Bezier([0.42, 0.0, 0.58, 1.0]),
        ] {
            approx(ease.apply(0.0), 0.0, 1e-5);
            approx(ease.apply(1.0), 1.0, 1e-5);
        }
    }

    #[test]
    fn curves_are_monotone() {
        for ease in [
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
            Easing::Bezier([0.42, 0.0, 0.58, 1.0]),
        ] {
            let mut prev = ease.apply(0.0);
            for i in 1..=64 {
                let next = ease.apply(i as f32 / 64.0);
                assert!(next >= prev - 1e-5, "{ease:?} not monotone at step {i}");
                prev = next;
            }
        }
    }

    #[test]
    fn cubic_in_out_midpoint() {
        approx(Easing::CubicInOut.apply(0.5), 0.5, 1e-6);
        approx(Easing::CubicIn.apply(0.5), 0.125, 1e-6);
        approx(Easing::CubicOut.apply(0.5), 0.875, 1e-6);
    }

    #[test]
    fn linear_passes_extend_progress_through() {
        assert_eq!(Easing::Linear.apply(1.5), 1.5);
        assert_eq!(Easing::CubicIn.apply(1.5), 1.0);
    }

    #[test]
    fn identity_bezier_fast_path() {
        let b = Easing::Bezier([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(b.apply(0.37), 0.37);
    }
}

//! Declarative operation trees: tween/delay leaves composed by
//! sequential/parallel/stagger/repeat combinators.
//!
//! An `Op` is an immutable authored description. Procedures yield a fresh
//! tree per suspension point; trees are never shared or mutated after
//! construction (runtime cursors live in `stepping`). Durations are fully
//! determined by the tree, so completion frames are computed analytically;
//! `None` means unbounded (an infinite repeat somewhere in the tree).

use serde::{Deserialize, Serialize};

use crate::error::SequencerError;
use crate::interp::Extrapolate;
use crate::tween::Tween;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Op {
    /// Timed interpolation leaf.
    Tween(Tween),
    /// Pure pacing leaf; consumes frames, touches nothing.
    Delay { frames: u64 },
    /// Children strictly in order; at most one active at a time.
    Sequential { children: Vec<Op> },
    /// All children start together; completes when every child has (join).
    Parallel { children: Vec<Op> },
    /// Child i starts `i * delay_frames` after the combinator; join over
    /// all offset children.
    Stagger { delay_frames: u64, children: Vec<Op> },
    /// Re-runs a structurally fresh copy of the child; `cycles: None`
    /// repeats forever and only ends by cancellation.
    Repeat {
        child: Box<Op>,
        #[serde(default)]
        cycles: Option<u64>,
    },
}

/// Chain ops strictly in order.
pub fn sequential(children: Vec<Op>) -> Op {
    Op::Sequential { children }
}

/// Run ops logically concurrently; completes when all have completed.
pub fn parallel(children: Vec<Op>) -> Op {
    Op::Parallel { children }
}

/// Run ops concurrently with per-child start offsets of `delay_frames`.
pub fn stagger(delay_frames: u64, children: Vec<Op>) -> Op {
    Op::Stagger {
        delay_frames,
        children,
    }
}

/// Repeat `op` a fixed number of cycles.
pub fn repeat(op: Op, cycles: u64) -> Op {
    Op::Repeat {
        child: Box::new(op),
        cycles: Some(cycles),
    }
}

/// Repeat `op` until the owning task is cancelled.
pub fn repeat_forever(op: Op) -> Op {
    Op::Repeat {
        child: Box::new(op),
        cycles: None,
    }
}

/// Consume frames without touching any property.
pub fn delay(frames: u64) -> Op {
    Op::Delay { frames }
}

impl From<Tween> for Op {
    fn from(tween: Tween) -> Self {
        Op::Tween(tween)
    }
}

impl Op {
    /// Total frames this tree takes from its start frame to completion;
    /// `None` if it never completes on its own.
    pub fn duration_frames(&self) -> Option<u64> {
        match self {
            Op::Tween(t) => Some(t.duration),
            Op::Delay { frames } => Some(*frames),
            Op::Sequential { children } => {
                let mut total: u64 = 0;
                for child in children {
                    total = total.checked_add(child.duration_frames()?)?;
                }
                Some(total)
            }
            Op::Parallel { children } => {
                let mut max = 0u64;
                for child in children {
                    max = max.max(child.duration_frames()?);
                }
                Some(max)
            }
            Op::Stagger {
                delay_frames,
                children,
            } => {
                let mut max = 0u64;
                for (i, child) in children.iter().enumerate() {
                    let offset = delay_frames.checked_mul(i as u64)?;
                    max = max.max(offset.checked_add(child.duration_frames()?)?);
                }
                Some(max)
            }
            Op::Repeat { child, cycles } => {
                let cycles = (*cycles)?;
                child.duration_frames()?.checked_mul(cycles)
            }
        }
    }

    /// Validate authoring invariants that are cheaper to reject up front
    /// than to hit mid-render.
    pub fn validate(&self) -> Result<(), SequencerError> {
        match self {
            Op::Tween(t) => {
                if t.extrapolate.left == Extrapolate::Wrap
                    || t.extrapolate.right == Extrapolate::Wrap
                {
                    return Err(SequencerError::corrupt(format!(
                        "tween '{}' requests reserved wrap extrapolation",
                        t.target
                    )));
                }
                if let Some(from) = &t.from {
                    if from.kind() != t.to.kind() {
                        return Err(SequencerError::corrupt(format!(
                            "tween '{}' endpoints have mismatched kinds",
                            t.target
                        )));
                    }
                }
                Ok(())
            }
            Op::Delay { .. } => Ok(()),
            Op::Sequential { children }
            | Op::Parallel { children }
            | Op::Stagger { children, .. } => {
                for child in children {
                    child.validate()?;
                }
                Ok(())
            }
            Op::Repeat { child, cycles } => {
                if cycles.is_none() && child.duration_frames() == Some(0) {
                    return Err(SequencerError::corrupt(
                        "infinite repeat of a zero-duration child never advances",
                    ));
                }
                child.validate()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecue_api_core::{PropPath, Value};

    fn tw(path: &str, frames: u64) -> Op {
        Op::Tween(Tween::new(
            PropPath::parse(path).unwrap(),
            Value::f(0.0),
            Value::f(1.0),
            frames,
        ))
    }

    #[test]
    fn sequential_sums_and_parallel_joins() {
        let seq = sequential(vec![tw("a/x.o", 20), delay(10), tw("a/x.o", 15)]);
        assert_eq!(seq.duration_frames(), Some(45));
        let par = parallel(vec![tw("a/x.o", 10), tw("a/y.o", 20)]);
        assert_eq!(par.duration_frames(), Some(20));
    }

    #[test]
    fn stagger_offsets_last_child() {
        let op = stagger(5, vec![tw("a/x.o", 3), tw("a/y.o", 3), tw("a/z.o", 3)]);
        assert_eq!(op.duration_frames(), Some(13));
    }

    #[test]
    fn repeat_multiplies_and_infinite_is_unbounded() {
        let op = repeat(tw("a/x.o", 4), 3);
        assert_eq!(op.duration_frames(), Some(12));
        let forever = repeat_forever(tw("a/x.o", 4));
        assert_eq!(forever.duration_frames(), None);
        let nested = sequential(vec![tw("a/x.o", 2), forever]);
        assert_eq!(nested.duration_frames(), None);
    }

    #[test]
    fn empty_combinators_are_zero_frames() {
        assert_eq!(sequential(vec![]).duration_frames(), Some(0));
        assert_eq!(parallel(vec![]).duration_frames(), Some(0));
        assert_eq!(stagger(7, vec![]).duration_frames(), Some(0));
        assert_eq!(repeat(delay(5), 0).duration_frames(), Some(0));
    }

    #[test]
    fn validate_rejects_infinite_zero_repeat() {
        assert!(repeat_forever(delay(0)).validate().is_err());
        assert!(repeat_forever(delay(1)).validate().is_ok());
    }

    #[test]
    fn serde_roundtrip_tagged_by_kind() {
        let op = sequential(vec![tw("intro/title.opacity", 20), delay(10)]);
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""kind":"sequential""#));
        assert!(json.contains(r#""kind":"tween""#));
        let back: Op = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}

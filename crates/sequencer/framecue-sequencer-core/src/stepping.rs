//! Per-frame evaluation of an activated op tree.
//!
//! `OpState` is the saved local state behind a task's current suspension
//! point: the immutable authored tree plus the little runtime data a pure
//! elapsed-frame traversal cannot derive (captured tween start values,
//! the live cycle of a repeat). Timing itself stays analytic: every node's
//! completion frame follows from the tree, so evaluation at a given
//! elapsed frame is deterministic and ticks never drift.
//!
//! Traversal order is depth-first in authored order; that is the engine's
//! documented commit order within one task.

use framecue_api_core::Value;

use crate::error::SequencerError;
use crate::ids::{PropId, TaskId};
use crate::ops::Op;
use crate::outputs::{Outputs, SequencerEvent};
use crate::property::PropertyBook;
use crate::tween::Tween;

/// Mutable context for one task's traversal of one tick.
pub(crate) struct CommitCx<'a> {
    pub book: &'a mut PropertyBook,
    pub outputs: &'a mut Outputs,
    pub task: TaskId,
    pub frame: u64,
}

impl CommitCx<'_> {
    /// Apply the conflict policy around a property commit: debug builds
    /// fail fast, release builds warn and keep last-writer-wins order.
    fn commit(&mut self, id: PropId, value: Value, closing: bool) -> Result<(), SequencerError> {
        match self.book.commit(id, value, self.task, closing, self.frame) {
            Ok(()) => Ok(()),
            Err(err @ SequencerError::ConflictingWrite { .. }) => {
                if cfg!(debug_assertions) {
                    Err(err)
                } else {
                    if let SequencerError::ConflictingWrite { path, frame } = &err {
                        log::warn!("conflicting write to '{path}' at frame {frame}");
                        self.outputs.push_event(SequencerEvent::ConflictingWrite {
                            path: path.clone(),
                            frame: *frame,
                        });
                    }
                    Ok(())
                }
            }
            Err(err) => Err(err),
        }
    }
}

/// Runtime state of one activated op tree.
#[derive(Debug)]
pub(crate) enum OpState {
    Tween {
        spec: Tween,
        target: PropId,
        /// Start value resolved at activation (explicit `from`, or the live
        /// property value captured on the first evaluation).
        resolved_from: Option<Value>,
    },
    Delay {
        frames: u64,
    },
    Sequential {
        children: Vec<OpState>,
    },
    Parallel {
        children: Vec<OpState>,
    },
    Stagger {
        delay_frames: u64,
        children: Vec<OpState>,
    },
    Repeat {
        proto: Op,
        cycles: Option<u64>,
        current: Box<OpState>,
        cycle_idx: u64,
    },
}

impl OpState {
    /// Build runtime state for an authored tree, resolving tween targets
    /// against the book. Unknown targets are an authoring/engine mismatch.
    pub(crate) fn build(op: Op, book: &PropertyBook) -> Result<Self, SequencerError> {
        match op {
            Op::Tween(spec) => {
                let target = book.resolve(&spec.target).ok_or_else(|| {
                    SequencerError::corrupt(format!(
                        "tween targets unregistered property '{}'",
                        spec.target
                    ))
                })?;
                let resolved_from = spec.from.clone();
                Ok(OpState::Tween {
                    spec,
                    target,
                    resolved_from,
                })
            }
            Op::Delay { frames } => Ok(OpState::Delay { frames }),
            Op::Sequential { children } => Ok(OpState::Sequential {
                children: build_children(children, book)?,
            }),
            Op::Parallel { children } => Ok(OpState::Parallel {
                children: build_children(children, book)?,
            }),
            Op::Stagger {
                delay_frames,
                children,
            } => Ok(OpState::Stagger {
                delay_frames,
                children: build_children(children, book)?,
            }),
            Op::Repeat { child, cycles } => {
                let current = Box::new(Self::build((*child).clone(), book)?);
                Ok(OpState::Repeat {
                    proto: *child,
                    cycles,
                    current,
                    cycle_idx: 0,
                })
            }
        }
    }

    /// Frames from this node's start to completion; `None` if unbounded.
    pub(crate) fn total(&self) -> Option<u64> {
        match self {
            OpState::Tween { spec, .. } => Some(spec.duration),
            OpState::Delay { frames } => Some(*frames),
            OpState::Sequential { children } => {
                let mut total: u64 = 0;
                for child in children {
                    total = total.checked_add(child.total()?)?;
                }
                Some(total)
            }
            OpState::Parallel { children } => {
                let mut max = 0u64;
                for child in children {
                    max = max.max(child.total()?);
                }
                Some(max)
            }
            OpState::Stagger {
                delay_frames,
                children,
            } => {
                let mut max = 0u64;
                for (i, child) in children.iter().enumerate() {
                    let offset = delay_frames.checked_mul(i as u64)?;
                    max = max.max(offset.checked_add(child.total()?)?);
                }
                Some(max)
            }
            OpState::Repeat {
                cycles, current, ..
            } => current.total()?.checked_mul((*cycles)?),
        }
    }

    /// Evaluate at `elapsed` frames since this node started: commit any
    /// active tween values, and report whether the node has completed.
    pub(crate) fn eval(&mut self, elapsed: u64, cx: &mut CommitCx) -> Result<bool, SequencerError> {
        match self {
            OpState::Tween {
                spec,
                target,
                resolved_from,
            } => {
                if resolved_from.is_none() {
                    let live = cx.book.value(*target).cloned().ok_or_else(|| {
                        SequencerError::corrupt(format!(
                            "property '{}' vanished from the book",
                            spec.target
                        ))
                    })?;
                    *resolved_from = Some(live);
                }
                let from = resolved_from.clone().ok_or_else(|| {
                    SequencerError::corrupt("tween start value failed to resolve")
                })?;
                let complete = spec.is_complete(elapsed);
                if elapsed <= spec.duration {
                    let value = spec.value_at(elapsed, &from)?;
                    // The terminal-frame commit is a closing write: a
                    // successor in program order may overwrite it.
                    cx.commit(*target, value, complete)?;
                }
                Ok(complete)
            }

            OpState::Delay { frames } => Ok(elapsed >= *frames),

            OpState::Sequential { children } => {
                let mut offset = 0u64;
                for child in children.iter_mut() {
                    if elapsed < offset {
                        return Ok(false);
                    }
                    match child.total() {
                        Some(d) => {
                            if elapsed <= offset + d {
                                child.eval(elapsed - offset, cx)?;
                            }
                            offset += d;
                        }
                        None => {
                            // An unbounded child blocks its successors.
                            child.eval(elapsed - offset, cx)?;
                            return Ok(false);
                        }
                    }
                }
                Ok(elapsed >= offset)
            }

            OpState::Parallel { children } => {
                let mut complete = true;
                for child in children.iter_mut() {
                    match child.total() {
                        Some(d) => {
                            if elapsed <= d {
                                child.eval(elapsed, cx)?;
                            }
                            if elapsed < d {
                                complete = false;
                            }
                        }
                        None => {
                            child.eval(elapsed, cx)?;
                            complete = false;
                        }
                    }
                }
                Ok(complete)
            }

            OpState::Stagger {
                delay_frames,
                children,
            } => {
                let mut complete = true;
                for (i, child) in children.iter_mut().enumerate() {
                    let offset = delay_frames.checked_mul(i as u64).ok_or_else(|| {
                        SequencerError::corrupt("stagger offset overflows the frame counter")
                    })?;
                    if elapsed < offset {
                        complete = false;
                        continue;
                    }
                    let local = elapsed - offset;
                    match child.total() {
                        Some(d) => {
                            if local <= d {
                                child.eval(local, cx)?;
                            }
                            if local < d {
                                complete = false;
                            }
                        }
                        None => {
                            child.eval(local, cx)?;
                            complete = false;
                        }
                    }
                }
                Ok(complete)
            }

            OpState::Repeat {
                proto,
                cycles,
                current,
                cycle_idx,
            } => {
                let child_dur = match current.total() {
                    Some(d) => d,
                    None => {
                        // Unbounded child: the first cycle never ends.
                        current.eval(elapsed, cx)?;
                        return Ok(false);
                    }
                };
                if child_dur == 0 {
                    // Finite repeat of a zero-frame child collapses to a
                    // zero-frame op; the infinite case is rejected by
                    // Op::validate.
                    return Ok(cycles.is_some());
                }
                if let Some(n) = cycles {
                    if *n == 0 {
                        return Ok(true);
                    }
                    let total = child_dur.checked_mul(*n).ok_or_else(|| {
                        SequencerError::corrupt(
                            "repeat total duration overflows the frame counter",
                        )
                    })?;
                    if elapsed >= total {
                        // Land on the last cycle's end state.
                        if *cycle_idx != *n - 1 {
                            current.eval(child_dur, cx)?;
                            *current = Box::new(Self::build(proto.clone(), cx.book)?);
                            *cycle_idx = *n - 1;
                        }
                        current.eval(child_dur, cx)?;
                        return Ok(true);
                    }
                }
                let cycle = elapsed / child_dur;
                if cycle != *cycle_idx {
                    // Land the finished cycle's closing commit first, so
                    // the fresh copy captures the cycle's end state rather
                    // than a mid-cycle value.
                    current.eval(child_dur, cx)?;
                    // Structurally fresh copy each cycle: captured start
                    // values and nested repeat state reset to zero.
                    *current = Box::new(Self::build(proto.clone(), cx.book)?);
                    *cycle_idx = cycle;
                }
                current.eval(elapsed - cycle * child_dur, cx)?;
                Ok(false)
            }
        }
    }
}

fn build_children(children: Vec<Op>, book: &PropertyBook) -> Result<Vec<OpState>, SequencerError> {
    children
        .into_iter()
        .map(|child| OpState::build(child, book))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{delay, parallel, repeat, sequential, stagger};
    use framecue_api_core::PropPath;

    fn path(s: &str) -> PropPath {
        PropPath::parse(s).unwrap()
    }

    fn run_frames(
        state: &mut OpState,
        book: &mut PropertyBook,
        frames: std::ops::RangeInclusive<u64>,
    ) -> bool {
        let mut outputs = Outputs::default();
        let mut complete = false;
        for frame in frames {
            book.begin_tick();
            let mut cx = CommitCx {
                book: &mut *book,
                outputs: &mut outputs,
                task: TaskId(0),
                frame,
            };
            complete = state.eval(frame, &mut cx).unwrap();
        }
        complete
    }

    #[test]
    fn parallel_join_holds_early_finisher() {
        let mut book = PropertyBook::new();
        let a = book.register(path("s/a.o"), Value::f(0.0));
        let b = book.register(path("s/b.o"), Value::f(0.0));
        let op = parallel(vec![
            Tween::new(path("s/a.o"), Value::f(0.0), Value::f(1.0), 10).into(),
            Tween::new(path("s/b.o"), Value::f(0.0), Value::f(1.0), 20).into(),
        ]);
        let mut state = OpState::build(op, &book).unwrap();

        assert!(!run_frames(&mut state, &mut book, 0..=15));
        // A finished at frame 10 and holds its final value.
        assert_eq!(book.value(a), Some(&Value::f(1.0)));
        assert_eq!(book.value(b), Some(&Value::f(0.75)));
        assert!(run_frames(&mut state, &mut book, 16..=20));
        assert_eq!(book.value(b), Some(&Value::f(1.0)));
    }

    #[test]
    fn sequential_hand_off_captures_live_value() {
        let mut book = PropertyBook::new();
        let scale = book.register(path("s/n.scale"), Value::f(1.0));
        // chain(scale -> 1.1, scale -> 1.0), both from the live value.
        let op = sequential(vec![
            Tween::to(path("s/n.scale"), Value::f(1.1), 2).into(),
            Tween::to(path("s/n.scale"), Value::f(1.0), 2).into(),
        ]);
        let mut state = OpState::build(op, &book).unwrap();
        run_frames(&mut state, &mut book, 0..=1);
        assert_eq!(book.value(scale), Some(&Value::f(1.05)));
        run_frames(&mut state, &mut book, 2..=2);
        // Boundary frame: first tween closes at 1.1, second opens from it.
        assert_eq!(book.value(scale), Some(&Value::f(1.1)));
        assert!(run_frames(&mut state, &mut book, 3..=4));
        assert_eq!(book.value(scale), Some(&Value::f(1.0)));
    }

    #[test]
    fn repeat_cycle_boundary_closes_before_the_fresh_copy_captures() {
        let mut book = PropertyBook::new();
        let scale = book.register(path("s/n.scale"), Value::f(1.0));
        // From-capture pulse: up to 1.1 over 2, back to 1.0 over 2.
        let pulse = sequential(vec![
            Tween::to(path("s/n.scale"), Value::f(1.1), 2).into(),
            Tween::to(path("s/n.scale"), Value::f(1.0), 2).into(),
        ]);
        let mut state = OpState::build(repeat(pulse, 3), &book).unwrap();

        run_frames(&mut state, &mut book, 0..=1);
        assert_eq!(book.value(scale), Some(&Value::f(1.05)));
        // Cycle boundary: the finished cycle's closing commit lands at
        // 1.0 before the next cycle captures its start value, so the
        // second pulse rises from 1.0 again instead of drifting upward.
        run_frames(&mut state, &mut book, 2..=4);
        assert_eq!(book.value(scale), Some(&Value::f(1.0)));
        run_frames(&mut state, &mut book, 5..=5);
        assert_eq!(book.value(scale), Some(&Value::f(1.05)));

        assert!(run_frames(&mut state, &mut book, 6..=12));
        assert_eq!(book.value(scale), Some(&Value::f(1.0)));
    }

    #[test]
    fn overflowing_frame_math_is_schedule_corruption() {
        let mut book = PropertyBook::new();
        let mut huge_stagger =
            OpState::build(stagger(u64::MAX, vec![delay(1), delay(1), delay(1)]), &book).unwrap();
        let mut huge_repeat =
            OpState::build(repeat(delay(u64::MAX), 2), &book).unwrap();

        let mut outputs = Outputs::default();
        let mut cx = CommitCx {
            book: &mut book,
            outputs: &mut outputs,
            task: TaskId(0),
            frame: 0,
        };
        assert!(matches!(
            huge_stagger.eval(0, &mut cx),
            Err(SequencerError::ScheduleCorruption { .. })
        ));
        assert!(matches!(
            huge_repeat.eval(0, &mut cx),
            Err(SequencerError::ScheduleCorruption { .. })
        ));
    }

    #[test]
    fn unknown_target_is_schedule_corruption() {
        let book = PropertyBook::new();
        let op: Op = Tween::to(path("nowhere/n.o"), Value::f(1.0), 5).into();
        assert!(matches!(
            OpState::build(op, &book),
            Err(SequencerError::ScheduleCorruption { .. })
        ));
    }
}

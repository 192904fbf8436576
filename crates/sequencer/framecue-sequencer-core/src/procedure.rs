//! Scene procedures: suspension-based routines describing one animated
//! sequence as a series of yielded ops.
//!
//! Generator control flow is re-architected as an explicit resumption
//! point: the scheduler calls `next_op` when the previously yielded op
//! completes, and the implementor keeps whatever local state it needs
//! between yields. `Script` covers the common fully-declarative case.

use crate::ops::Op;

pub trait Procedure {
    /// Resume the procedure at its next suspension point. `frame` is the
    /// tick on which the previous op completed (or the mount frame for the
    /// first call). Return the next op to run, or `None` when the
    /// procedure has no more yields.
    fn next_op(&mut self, frame: u64) -> Option<Op>;
}

/// A fully-declarative procedure: a fixed list of ops yielded in order.
#[derive(Debug)]
pub struct Script {
    ops: std::vec::IntoIter<Op>,
}

impl Script {
    pub fn new(ops: Vec<Op>) -> Self {
        Self {
            ops: ops.into_iter(),
        }
    }

    /// A procedure that yields a single op tree.
    pub fn single(op: Op) -> Self {
        Self::new(vec![op])
    }
}

impl Procedure for Script {
    fn next_op(&mut self, _frame: u64) -> Option<Op> {
        self.ops.next()
    }
}

/// Closures work as procedures for frame-dependent authoring.
impl<F> Procedure for F
where
    F: FnMut(u64) -> Option<Op>,
{
    fn next_op(&mut self, frame: u64) -> Option<Op> {
        self(frame)
    }
}

//! Cooperative task scheduler.
//!
//! Single-threaded and frame-stepped: exactly one resumption point per
//! live task is evaluated per tick, in task registration order. There is
//! no preemption; every property mutation happens inside `run_step`.
//! A task only terminates by exhausting its procedure's yields or by
//! cancellation; an infinite repeat is stopped from outside.
//!
//! Fault isolation: an authoring error (degenerate range, corrupted node,
//! debug-build write conflict) cancels the offending task, reports it in
//! the outputs, and leaves unrelated tasks running.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::SequencerError;
use crate::ids::{IdAllocator, TaskId};
use crate::outputs::{Outputs, SequencerEvent};
use crate::procedure::Procedure;
use crate::property::PropertyBook;
use crate::stepping::{CommitCx, OpState};

/// Lifecycle of one scheduled task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Spawned, not yet stepped.
    Pending,
    /// Advancing within the current tick.
    Running,
    /// Waiting on its current op between ticks.
    Suspended,
    /// All yields consumed.
    Completed,
    /// Externally terminated; remaining commits suppressed, committed
    /// values not rolled back.
    Cancelled,
}

impl TaskState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Cancelled)
    }
}

struct ActiveOp {
    state: OpState,
    started_at: u64,
}

/// One top-level procedure plus its suspension point.
pub struct ScheduledTask {
    pub id: TaskId,
    /// Scene this task animates, when spawned from a timeline entry.
    pub scene: Option<String>,
    state: TaskState,
    procedure: Box<dyn Procedure>,
    current: Option<ActiveOp>,
}

impl ScheduledTask {
    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }
}

/// Executes scene procedures frame by frame.
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    ids: IdAllocator,
    max_cascade: usize,
}

impl Scheduler {
    pub fn new(cfg: &Config) -> Self {
        Self {
            tasks: Vec::new(),
            ids: IdAllocator::new(),
            max_cascade: cfg.max_cascade_per_tick,
        }
    }

    /// Register a procedure for execution starting at the next tick.
    pub fn spawn(&mut self, procedure: Box<dyn Procedure>, scene: Option<String>) -> TaskId {
        let id = self.ids.alloc_task();
        self.tasks.push(ScheduledTask {
            id,
            scene,
            state: TaskState::Pending,
            procedure,
            current: None,
        });
        id
    }

    /// Cooperative, immediate cancellation. Idempotent: cancelling a
    /// terminal task is a no-op.
    pub fn cancel(&mut self, id: TaskId, frame: u64, outputs: &mut Outputs) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            if !task.state.is_terminal() {
                task.state = TaskState::Cancelled;
                task.current = None;
                outputs.push_event(SequencerEvent::TaskCancelled { task: id, frame });
            }
        }
    }

    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.state)
    }

    /// True while any task still has work to do.
    pub fn has_live_tasks(&self) -> bool {
        self.tasks.iter().any(|t| !t.state.is_terminal())
    }

    /// Evaluate one tick: step every live task in registration order,
    /// cascading through same-tick completions. Task-level failures are
    /// contained (cancel + `TaskFailed` event); they never poison siblings.
    pub fn run_step(&mut self, frame: u64, book: &mut PropertyBook, outputs: &mut Outputs) {
        for i in 0..self.tasks.len() {
            let max_cascade = self.max_cascade;
            let task = &mut self.tasks[i];
            if let Err(err) = step_task(task, frame, book, outputs, max_cascade) {
                log::warn!("task {:?} failed at frame {frame}: {err}", task.id);
                task.state = TaskState::Cancelled;
                task.current = None;
                outputs.push_event(SequencerEvent::TaskFailed {
                    task: task.id,
                    frame,
                    message: err.to_string(),
                });
            }
        }
    }
}

fn step_task(
    task: &mut ScheduledTask,
    frame: u64,
    book: &mut PropertyBook,
    outputs: &mut Outputs,
    max_cascade: usize,
) -> Result<(), SequencerError> {
    if task.state.is_terminal() {
        return Ok(());
    }
    task.state = TaskState::Running;

    let mut completions = 0usize;
    loop {
        match task.current.as_mut() {
            None => {
                // Resume the procedure at its next suspension point.
                match task.procedure.next_op(frame) {
                    Some(op) => {
                        op.validate()?;
                        let state = OpState::build(op, book)?;
                        task.current = Some(ActiveOp {
                            state,
                            started_at: frame,
                        });
                    }
                    None => {
                        task.state = TaskState::Completed;
                        outputs.push_event(SequencerEvent::TaskCompleted {
                            task: task.id,
                            frame,
                        });
                        return Ok(());
                    }
                }
            }
            Some(active) => {
                let elapsed = frame - active.started_at;
                let mut cx = CommitCx {
                    book: &mut *book,
                    outputs: &mut *outputs,
                    task: task.id,
                    frame,
                };
                let complete = active.state.eval(elapsed, &mut cx)?;
                if !complete {
                    task.state = TaskState::Suspended;
                    return Ok(());
                }
                // Completed this tick: drop the op and cascade into the
                // next yield within the same tick.
                task.current = None;
                completions += 1;
                if completions > max_cascade {
                    return Err(SequencerError::corrupt(format!(
                        "procedure cascaded through more than {max_cascade} ops in one tick"
                    )));
                }
            }
        }
    }
}

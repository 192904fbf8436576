//! Engine: data ownership and the public stepping API.
//!
//! Owns the frame clock, the property book, the scheduler and the
//! timeline; one `step()` evaluates exactly one frame. Hosts register
//! property targets up front, add timeline entries (or spawn free-running
//! procedures), then call `step()` once per output frame and apply the
//! returned changes to their render objects.

use crate::clock::FrameClock;
use crate::config::Config;
use crate::error::SequencerError;
use crate::ids::{EntryId, PropId, TaskId};
use crate::outputs::{Change, Outputs};
use crate::procedure::Procedure;
use crate::property::PropertyBook;
use crate::schedule::{Scheduler, TaskState};
use crate::timeline::{SubtreeHost, Timeline, TimelineEntry};
use framecue_api_core::{PropPath, Value};

pub struct Engine {
    cfg: Config,
    clock: FrameClock,
    book: PropertyBook,
    scheduler: Scheduler,
    timeline: Timeline,
    outputs: Outputs,
    /// Events raised between steps (external cancellations); delivered
    /// with the next tick's outputs.
    pending: Outputs,
}

impl Engine {
    pub fn new(cfg: Config) -> Self {
        Self {
            clock: FrameClock::new(cfg.fps, cfg.max_frames),
            scheduler: Scheduler::new(&cfg),
            cfg,
            book: PropertyBook::new(),
            timeline: Timeline::new(),
            outputs: Outputs::default(),
            pending: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Next frame to be evaluated.
    #[inline]
    pub fn current_frame(&self) -> u64 {
        self.clock.now()
    }

    /// Authoring convenience: seconds to whole frames at the run's fps.
    #[inline]
    pub fn frames(&self, seconds: f32) -> u64 {
        self.clock.frames(seconds)
    }

    /// Declare a settable property target, returning its handle.
    pub fn register_property(&mut self, path: PropPath, initial: Value) -> PropId {
        self.book.register(path, initial)
    }

    pub fn property(&self, id: PropId) -> Option<&Value> {
        self.book.value(id)
    }

    pub fn property_by_path(&self, path: &PropPath) -> Option<&Value> {
        self.book.value_by_path(path)
    }

    /// Place a scene procedure on the global timeline.
    pub fn add_entry(&mut self, entry: TimelineEntry) -> EntryId {
        self.timeline.add(entry)
    }

    /// Task currently animating a timeline entry, if its window is open.
    pub fn entry_task(&self, entry: EntryId) -> Option<TaskId> {
        self.timeline.task_of(entry)
    }

    /// Run a procedure outside any timeline window, starting next tick.
    pub fn spawn(&mut self, procedure: Box<dyn Procedure>) -> TaskId {
        self.scheduler.spawn(procedure, None)
    }

    /// Cancel a task between ticks; the event rides the next outputs.
    pub fn cancel(&mut self, task: TaskId) {
        let frame = self.clock.now();
        self.scheduler.cancel(task, frame, &mut self.pending);
    }

    pub fn task_state(&self, task: TaskId) -> Option<TaskState> {
        self.scheduler.state(task)
    }

    pub fn has_live_tasks(&self) -> bool {
        self.scheduler.has_live_tasks()
    }

    /// Evaluate one frame: gate timeline windows, step every live task,
    /// and collect this tick's deduplicated property changes. Fails only
    /// on `ClockExhausted`; task-level faults are reported as events.
    pub fn step(&mut self, host: &mut dyn SubtreeHost) -> Result<&Outputs, SequencerError> {
        let frame = self.clock.advance()?;

        self.outputs.clear();
        self.outputs.events.append(&mut self.pending.events);
        self.book.begin_tick();

        // Window boundaries first: a scene whose window ended does not
        // commit on this frame, a scene whose window opened does.
        self.timeline
            .deactivate(frame, &mut self.scheduler, host, &mut self.outputs);
        self.timeline
            .activate(frame, &mut self.scheduler, host, &mut self.outputs);

        self.scheduler
            .run_step(frame, &mut self.book, &mut self.outputs);

        for (prop, task) in self.book.take_dirty() {
            if let Some(target) = self.book.get(prop) {
                self.outputs.push_change(Change {
                    task,
                    path: target.path.clone(),
                    value: target.value.clone(),
                });
            }
        }

        Ok(&self.outputs)
    }
}

//! Timeline: arranges independent scene procedures at fixed frame offsets
//! along one global timeline.
//!
//! The timeline only gates task lifetime by frame window; it never
//! interpolates. Mounting/unmounting of a scene's render subtree is an
//! external capability the host provides through `SubtreeHost`. Windows
//! may overlap or sit sequentially; authoring is trusted.

use crate::ids::{EntryId, IdAllocator, TaskId};
use crate::outputs::{Outputs, SequencerEvent};
use crate::procedure::Procedure;
use crate::schedule::Scheduler;

/// Render-subtree lifecycle callbacks the hosting renderer implements.
pub trait SubtreeHost {
    fn mount(&mut self, scene: &str);
    fn unmount(&mut self, scene: &str);
}

/// Host for headless runs and tests.
#[derive(Debug, Default)]
pub struct NoopHost;

impl SubtreeHost for NoopHost {
    fn mount(&mut self, _scene: &str) {}
    fn unmount(&mut self, _scene: &str) {}
}

/// One scene placed on the global timeline.
pub struct TimelineEntry {
    pub scene_id: String,
    pub start_frame: u64,
    pub duration_frames: u64,
    /// Taken when the entry activates; an entry runs at most once per run.
    procedure: Option<Box<dyn Procedure>>,
}

impl TimelineEntry {
    pub fn new(
        scene_id: impl Into<String>,
        start_frame: u64,
        duration_frames: u64,
        procedure: Box<dyn Procedure>,
    ) -> Self {
        Self {
            scene_id: scene_id.into(),
            start_frame,
            duration_frames,
            procedure: Some(procedure),
        }
    }

    /// Active window is `[start_frame, start_frame + duration_frames)`.
    #[inline]
    fn window_contains(&self, frame: u64) -> bool {
        frame >= self.start_frame && frame < self.start_frame + self.duration_frames
    }

    #[inline]
    fn window_ended(&self, frame: u64) -> bool {
        frame >= self.start_frame + self.duration_frames
    }
}

struct EntrySlot {
    id: EntryId,
    entry: TimelineEntry,
    task: Option<TaskId>,
}

/// Ordered set of timeline entries plus their live tasks.
#[derive(Default)]
pub struct Timeline {
    slots: Vec<EntrySlot>,
    ids: IdAllocator,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: TimelineEntry) -> EntryId {
        let id = self.ids.alloc_entry();
        self.slots.push(EntrySlot {
            id,
            entry,
            task: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Task currently animating an entry, if any.
    pub fn task_of(&self, id: EntryId) -> Option<TaskId> {
        self.slots.iter().find(|s| s.id == id).and_then(|s| s.task)
    }

    /// Cancel and unmount entries whose window has ended.
    pub fn deactivate(
        &mut self,
        frame: u64,
        scheduler: &mut Scheduler,
        host: &mut dyn SubtreeHost,
        outputs: &mut Outputs,
    ) {
        for slot in self.slots.iter_mut() {
            if slot.entry.window_ended(frame) {
                if let Some(task) = slot.task.take() {
                    scheduler.cancel(task, frame, outputs);
                    host.unmount(&slot.entry.scene_id);
                    outputs.push_event(SequencerEvent::SceneUnmounted {
                        scene: slot.entry.scene_id.clone(),
                        frame,
                    });
                }
            }
        }
    }

    /// Mount and spawn entries whose window contains `frame` and that have
    /// not run yet.
    pub fn activate(
        &mut self,
        frame: u64,
        scheduler: &mut Scheduler,
        host: &mut dyn SubtreeHost,
        outputs: &mut Outputs,
    ) {
        for slot in self.slots.iter_mut() {
            if slot.task.is_none() && slot.entry.window_contains(frame) {
                if let Some(procedure) = slot.entry.procedure.take() {
                    host.mount(&slot.entry.scene_id);
                    outputs.push_event(SequencerEvent::SceneMounted {
                        scene: slot.entry.scene_id.clone(),
                        frame,
                    });
                    slot.task = Some(scheduler.spawn(procedure, Some(slot.entry.scene_id.clone())));
                }
            }
        }
    }
}

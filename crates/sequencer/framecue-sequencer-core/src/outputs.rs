//! Output contracts from the engine.
//!
//! Outputs carry the deduplicated property changes of one tick plus a list
//! of semantic events. Hosts apply changes to their render objects (or pull
//! a `WriteBatch`) and transport events however they like.

use serde::{Deserialize, Serialize};

use framecue_api_core::{PropPath, Value, WriteBatch, WriteOp};

use crate::ids::TaskId;

/// One changed property target this tick (last writer wins).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub task: TaskId,
    pub path: PropPath,
    pub value: Value,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SequencerEvent {
    SceneMounted {
        scene: String,
        frame: u64,
    },
    SceneUnmounted {
        scene: String,
        frame: u64,
    },
    TaskCompleted {
        task: TaskId,
        frame: u64,
    },
    TaskCancelled {
        task: TaskId,
        frame: u64,
    },
    /// Two concurrently-active operations wrote one property (release-build
    /// surface of the conflict policy; debug builds fail the task instead).
    ConflictingWrite {
        path: String,
        frame: u64,
    },
    /// A task hit a fatal authoring error and was cancelled; unrelated
    /// tasks keep running.
    TaskFailed {
        task: TaskId,
        frame: u64,
        message: String,
    },
}

/// Outputs returned by Engine::step().
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<SequencerEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: SequencerEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Host-facing application form of this tick's changes.
    pub fn to_write_batch(&self) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for change in &self.changes {
            batch.push(WriteOp::new(change.path.clone(), change.value.clone()));
        }
        batch
    }
}
